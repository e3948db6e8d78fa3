//! The synthesis pipeline: detect, compute, emit.

use serde::Serialize;
use tracing::debug;

use crate::algorithm::{self, Algorithm};
use crate::emit::{self, EmitStrategy};

/// Result of synthesizing a WAT artifact from source text.
///
/// Immutable once produced: the `result` field is the ground truth the
/// emitted `wat` is guaranteed to evaluate to.
#[derive(Debug, Clone, Serialize)]
pub struct CodeArtifact {
    pub algorithm: Algorithm,
    pub input: u64,
    /// Signed 32-bit value, widened: the module computes in wasm `i32` and
    /// the reference computation mirrors that exactly.
    pub result: i64,
    pub wat: String,
}

/// Configured synthesizer. The only knob is the emission strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Synthesizer {
    strategy: EmitStrategy,
}

impl Synthesizer {
    pub fn new(strategy: EmitStrategy) -> Self {
        Self { strategy }
    }

    /// Synthesize an artifact from C-like source text.
    ///
    /// Total: unrecognized source yields a generic artifact rather than an
    /// error.
    pub fn synthesize(&self, source: &str) -> CodeArtifact {
        let algorithm = algorithm::detect(source);
        let input = algorithm::extract_input(source, algorithm);
        let result = algorithm::compute(algorithm, input);
        debug!(%algorithm, input, result, "synthesizing artifact");
        let wat = emit::emit(self.strategy, algorithm, input, result);
        CodeArtifact {
            algorithm,
            input,
            result,
            wat,
        }
    }
}

/// Synthesize with the default strategy.
pub fn synthesize(source: &str) -> CodeArtifact {
    Synthesizer::default().synthesize(source)
}
