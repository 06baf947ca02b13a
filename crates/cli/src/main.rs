//! LightNavi CLI — the main entry point.
//!
//! Commands:
//! - `chat`     — Interactive session or single-message mode
//! - `extract`  — Show the context fragment an utterance yields
//! - `onboard`  — Write the default config file
//! - `doctor`   — Check config and service reachability

use clap::{Parser, Subcommand};

mod commands;
mod render;

#[derive(Parser)]
#[command(
    name = "lightnavi",
    about = "LightNavi — lighting fixture selection assistant",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Describe a space and get fixture candidates
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Print the context fragment extracted from TEXT as JSON
    Extract {
        /// The utterance to analyse
        text: String,
    },

    /// Initialize configuration
    Onboard,

    /// Diagnose configuration and service health
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so the transcript on stdout stays clean
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Chat { message } => commands::chat::run(message).await?,
        Commands::Extract { text } => commands::extract::run(&text)?,
        Commands::Onboard => commands::onboard::run()?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
