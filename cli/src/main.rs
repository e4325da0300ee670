//! CLI entry point for the stock market simulator.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use stocksim_cli::commands;
use stocksim_cli::config::Config;
use stocksim_cli::error::Error;

#[derive(Parser)]
#[command(name = "stocksim")]
#[command(about = "Educational stock market game: trade with virtual cash")]
#[command(version)]
struct Cli {
    /// Path to stocksim.toml
    #[arg(long, default_value = "stocksim.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start an interactive trading session
    Play,

    /// Show the saved day, cash and holdings
    Status,

    /// Erase the saved game and start over
    Reset {
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            process::exit(1);
        }
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .format_timestamp_secs()
    .init();

    let result = match cli.command {
        Command::Play => commands::play(&config),
        Command::Status => commands::status(&config),
        Command::Reset { force } => commands::reset(&config, force),
    };

    if let Err(e) = result {
        match &e {
            Error::Aborted(msg) => {
                eprintln!("{msg}");
                process::exit(0);
            }
            _ => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        }
    }
}
