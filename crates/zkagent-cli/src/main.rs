//! zkagent CLI - Command-line interface for the zkagent chat service.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

/// zkagent - intent classification and WAT synthesis for ZK proof requests
#[derive(Parser)]
#[command(name = "zkagent")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the intent engine (one-shot or interactive)
    Chat {
        /// Message to classify; omit for an interactive session
        message: Option<String>,
    },

    /// Classify a message through the deterministic cascade only
    Classify {
        /// Message to classify
        message: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Synthesize a WAT module from C-like source
    Synthesize {
        /// Input file
        file: Option<PathBuf>,
        /// Inline source instead of a file
        #[arg(long, conflicts_with = "file")]
        code: Option<String>,
        /// Emit a constant-folded module instead of a structured one
        #[arg(long)]
        literal: bool,
        /// Write the module here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show information about the zkagent installation
    Info,
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "warn" };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    match cli.command {
        Commands::Chat { message } => tokio::runtime::Runtime::new()
            .unwrap()
            .block_on(commands::chat::run(message.as_deref())),
        Commands::Classify { message, json } => commands::classify::run(&message, json),
        Commands::Synthesize {
            file,
            code,
            literal,
            output,
        } => commands::synthesize::run(file.as_deref(), code.as_deref(), literal, output.as_deref()),
        Commands::Info => commands::info::run(),
    }
}
