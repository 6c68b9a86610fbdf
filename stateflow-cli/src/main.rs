mod handlers;

use anyhow::Result;
use clap::{Parser, Subcommand};
use stateflow_core::services::logging::LogLevel;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stateflow")]
#[command(version)]
#[command(about = "Configurable workflow engine: define state machines, run instances over HTTP")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the workflow API server
    Serve {
        /// Server bind address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Server port
        #[arg(long, default_value = "8687")]
        port: u16,

        /// Persist workflows to a JSON store at this path (in-memory when omitted)
        #[arg(long)]
        store: Option<PathBuf>,

        /// Log level (error, warn, info, debug, trace)
        #[arg(long, default_value = "info")]
        log_level: LogLevel,
    },

    /// Validate a workflow definition file without starting a server
    ///
    /// The file may be JSON or YAML (by extension). Exits non-zero when the
    /// definition is invalid.
    Validate {
        /// Path to the definition file
        file: PathBuf,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            store,
            log_level,
        } => handlers::handle_serve(host, port, store, log_level).await,
        Commands::Validate { file, json } => handlers::handle_validate(&file, json),
    }
}
