//! farmascan: classify and replay MyFarmacia scan payloads
//!
//! - **classify**: run one payload through sanitization and classification
//! - **replay**: drive a scan screen controller from a recorded event log
//! - **config**: show the resolved configuration

use anyhow::Result;
use clap::{Parser, Subcommand};
use farmascan_logging::{init_logging, LogConfig};
use std::path::PathBuf;
use std::process::ExitCode;

mod cli;

#[derive(Parser, Debug)]
#[command(name = "farmascan", version, about = "Scan payload classifier for MyFarmacia")]
struct Cli {
    /// Enable verbose logging (info/debug to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to $FARMASCAN_HOME/config.toml)
    #[arg(long, global = true, env = "FARMASCAN_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify a single decoded payload
    Classify {
        /// Decoded payload text
        payload: String,

        /// Symbology reported by the scanner
        #[arg(short = 's', long, default_value = "qr")]
        symbology: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replay a JSONL log of scan screen events
    Replay {
        /// Event log file ("-" or omitted for stdin)
        input: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the resolved configuration
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    fn wants_json(&self) -> bool {
        match self {
            Commands::Classify { json, .. } => *json,
            Commands::Replay { json, .. } => *json,
            Commands::Config { json } => *json,
        }
    }
}

fn run_command(cli: Cli) -> Result<()> {
    let resolved = cli::config::resolve(cli.config.as_deref())?;
    match cli.command {
        Commands::Classify {
            payload,
            symbology,
            json,
        } => cli::classify::run(
            cli::classify::ClassifyArgs {
                payload,
                symbology,
                json,
            },
            &resolved.config,
        ),
        Commands::Replay { input, json } => {
            cli::replay::run(cli::replay::ReplayArgs { input, json }, &resolved.config)
        }
        Commands::Config { json } => cli::config::run(cli::config::ConfigArgs { json }, &resolved),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let json_mode = cli.command.wants_json();

    if let Err(err) = init_logging(LogConfig {
        app_name: "farmascan",
        verbose: cli.verbose,
    }) {
        eprintln!("Warning: failed to initialize logging: {:#}", err);
    }

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if json_mode {
                cli::error::print_json_error(&err);
            } else {
                eprintln!("Error: {:#}", err);
            }
            ExitCode::from(1)
        }
    }
}
