//! Synthesize command - turn C-like source into a WAT artifact.

use std::fs;
use std::path::Path;

use zkagent_wat::{EmitStrategy, Synthesizer};

pub fn run(
    file: Option<&Path>,
    code: Option<&str>,
    literal: bool,
    output: Option<&Path>,
) -> miette::Result<()> {
    let source = match (file, code) {
        (Some(path), _) => fs::read_to_string(path)
            .map_err(|e| miette::miette!("Failed to read file: {}", e))?,
        (None, Some(code)) => code.to_string(),
        (None, None) => {
            return Err(miette::miette!("provide a file or --code"));
        }
    };

    let strategy = if literal {
        EmitStrategy::LiteralResult
    } else {
        EmitStrategy::StructuredComputation
    };

    let artifact = Synthesizer::new(strategy).synthesize(&source);

    eprintln!(
        "Algorithm: {} (input {}, result {})",
        artifact.algorithm, artifact.input, artifact.result
    );

    match output {
        Some(path) => {
            fs::write(path, &artifact.wat)
                .map_err(|e| miette::miette!("Failed to write output: {}", e))?;
            eprintln!("Wrote {} bytes to {}", artifact.wat.len(), path.display());
        }
        None => println!("{}", artifact.wat),
    }

    Ok(())
}
