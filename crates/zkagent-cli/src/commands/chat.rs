//! Chat command - classify messages through the full two-stage engine.

use std::io::{self, BufRead, Write};

use zkagent_ai::{AssistConfig, IntentEngine, Turn};
use zkagent_intent::ConversationContext;

pub async fn run(message: Option<&str>) -> miette::Result<()> {
    let config = AssistConfig::from_env();
    let engine = IntentEngine::new(config);

    if engine.assisted() {
        println!("Assisted classification: enabled\n");
    } else {
        println!("Assisted classification: disabled (set OPENAI_API_KEY to enable)\n");
    }

    let mut ctx = ConversationContext::new();

    if let Some(message) = message {
        let turn = engine.chat(message, &mut ctx).await;
        print_turn(&turn)?;
        return Ok(());
    }

    // Interactive session: one context across all turns, so follow-ups like
    // "do the same on solana" and "verify my latest proof" resolve.
    println!("Type a message, or 'exit' to quit.\n");
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout()
            .flush()
            .map_err(|e| miette::miette!("Failed to flush stdout: {}", e))?;

        let mut line = String::new();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .map_err(|e| miette::miette!("Failed to read input: {}", e))?;
        if read == 0 {
            break;
        }

        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if message == "exit" || message == "quit" {
            break;
        }
        if message == "reset" {
            ctx.reset();
            println!("Session reset.\n");
            continue;
        }

        let turn = engine.chat(message, &mut ctx).await;
        print_turn(&turn)?;
    }

    Ok(())
}

fn print_turn(turn: &Turn) -> miette::Result<()> {
    println!("{}\n", turn.response);

    if let Some(intent) = &turn.intent {
        let json = serde_json::to_string_pretty(intent)
            .map_err(|e| miette::miette!("Failed to serialize intent: {}", e))?;
        println!("Intent:\n{json}\n");
    }

    let metadata = serde_json::to_string_pretty(&turn.metadata)
        .map_err(|e| miette::miette!("Failed to serialize metadata: {}", e))?;
    println!("Metadata:\n{metadata}\n");

    Ok(())
}
