//! Parley CLI: the main entry point.
//!
//! Commands:
//! - `onboard`: Write the default config and create the data directory
//! - `session`: Drive one conversation from a script or stdin
//! - `tools`: List a domain's tool catalogue
//! - `history`: Show recent entries from a domain's log
//! - `context`: Print the opening reference to the last session
//! - `status`: Show configuration and log locations
//! - `doctor`: Diagnose configuration and log health

use clap::{Parser, Subcommand};
use parley_core::domain::Domain;
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "parley",
    about = "Parley — slot-filling sessions for voice agents",
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
    /// Initialize configuration and data directory
    Onboard,

    /// Run a conversation: one `tool_name {json-args}` call per line
    Session {
        /// Conversation domain (order, check-in, lead)
        #[arg(short, long)]
        domain: Domain,

        /// Read calls from a file instead of stdin
        #[arg(short, long)]
        script: Option<PathBuf>,

        /// Print every event as a JSON line
        #[arg(long)]
        json: bool,
    },

    /// List the tools available in a domain
    Tools {
        #[arg(short, long)]
        domain: Domain,
    },

    /// Show recent log entries
    History {
        #[arg(short, long)]
        domain: Domain,

        /// Look-back window (defaults to `[history] window_days`)
        #[arg(long)]
        days: Option<i64>,
    },

    /// Print the opening context a new conversation would start with
    Context {
        #[arg(short, long)]
        domain: Domain,
    },

    /// Show configuration and log status
    Status,

    /// Diagnose configuration and log health
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so that session output stays clean on stdout
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Session {
            domain,
            script,
            json,
        } => commands::session::run(domain, script, json).await?,
        Commands::Tools { domain } => commands::tools::run(domain).await?,
        Commands::History { domain, days } => commands::history::run(domain, days).await?,
        Commands::Context { domain } => commands::context::run(domain).await?,
        Commands::Status => commands::status::run().await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
