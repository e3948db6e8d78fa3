//! # zkagent WAT Synthesizer
//!
//! Turns C-like source text into a textual WebAssembly (WAT) module whose
//! exported entry point evaluates to a pre-computed result.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Source text │ --> │  Detection   │ --> │  Reference   │ --> │   Emission   │
//! │  (C-like)   │     │ (+ input)    │     │ computation  │     │ (WAT module) │
//! └─────────────┘     └──────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! The emitted module is *not* a compilation of the source. The downstream
//! prover treats the artifact as an opaque computation and only depends on
//! its final number, so the synthesizer computes the true result here and
//! wraps it in a minimal module guaranteed to evaluate to it. Two emission
//! strategies exist:
//!
//! - [`EmitStrategy::LiteralResult`] - constant-folded arithmetic over
//!   literals, evaluating directly to the result.
//! - [`EmitStrategy::StructuredComputation`] - reproduces the algorithm's
//!   loop/branch structure over the same literal input, for artifacts that
//!   must visibly look like the algorithm.
//!
//! Synthesis is total: unrecognized source falls back to a generic artifact
//! with a fixed result.

mod algorithm;
mod emit;
mod synthesizer;

pub use algorithm::{compute, detect, extract_input, Algorithm, MAX_INPUT};
pub use emit::EmitStrategy;
pub use synthesizer::{synthesize, CodeArtifact, Synthesizer};
