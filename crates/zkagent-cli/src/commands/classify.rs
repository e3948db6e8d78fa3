//! Classify command - run the deterministic cascade on a single message.

use zkagent_ai::mint_proof_id;
use zkagent_intent::{classify, validate, ConversationContext};

pub fn run(message: &str, json: bool) -> miette::Result<()> {
    let mut ctx = ConversationContext::new();
    let proof_id = mint_proof_id();

    let Some(classification) = classify(message, &proof_id, &mut ctx) else {
        if json {
            println!("null");
        } else {
            println!("No actionable intent; this message would be answered conversationally.");
        }
        return Ok(());
    };

    if let Some(intent) = &classification.intent {
        if let Err(errors) = validate(intent) {
            for error in errors {
                eprintln!("warning: {error}");
            }
        }
    }

    if json {
        let out = serde_json::to_string_pretty(&classification)
            .map_err(|e| miette::miette!("Failed to serialize classification: {}", e))?;
        println!("{out}");
        return Ok(());
    }

    println!("{}\n", classification.response);
    if let Some(intent) = &classification.intent {
        println!("Function:  {}", intent.function.as_str());
        println!("Arguments: {:?}", intent.arguments);
        println!("Step size: {}", intent.step_size);
        println!("Explains:  {}", intent.explanation);
    } else {
        println!("No proof intent (direct action).");
    }

    Ok(())
}
