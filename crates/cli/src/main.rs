//! Vitae CLI, the main entry point.
//!
//! Commands:
//! - `init`    Write a starter config and background file
//! - `chat`    Interactive chat or single-message mode
//! - `serve`   Start the HTTP chat gateway
//! - `tools`   Show the tool descriptors sent to the model
//! - `doctor`  Diagnose configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "vitae",
    about = "Vitae: a chat agent that answers questions about your career",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of ~/.vitae/config.toml
    #[arg(short, long, global = true, env = "VITAE_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter config and background file
    Init,

    /// Chat as a visitor would
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Start the HTTP chat gateway
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show the tools the model can call
    Tools {
        /// Print the raw JSON descriptors
        #[arg(long)]
        json: bool,
    },

    /// Diagnose configuration
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Init => commands::init::run(config_path).await?,
        Commands::Chat { message } => commands::chat::run(config_path, message).await?,
        Commands::Serve { port } => commands::serve::run(config_path, port).await?,
        Commands::Tools { json } => commands::tools::run(json)?,
        Commands::Doctor => commands::doctor::run(config_path).await?,
    }

    Ok(())
}
