//! Info command - show information about the zkagent installation.

use zkagent_ai::AssistConfig;

pub fn run() -> miette::Result<()> {
    println!("zkagent");
    println!("=======");
    println!();
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("Components:");
    println!("  zkagent-intent - Data model and deterministic rule cascade");
    println!("  zkagent-ai     - Assisted classification (chat completions)");
    println!("  zkagent-wat    - WAT synthesizer with pre-computed results");
    println!();

    let config = AssistConfig::from_env();
    println!("Assisted classification:");
    if config.is_valid() {
        println!("  Status: enabled");
        println!("  Model:  {}", config.model);
    } else {
        println!("  Status: disabled (set OPENAI_API_KEY to enable)");
    }
    println!();

    println!("Proof functions:");
    println!("  prove_kyc, prove_ai_content, prove_location, prove_custom,");
    println!("  list_proofs, verify");

    Ok(())
}
