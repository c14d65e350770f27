//! Pinpoint CLI - Command-line interface for Pinpoint point selection

mod commands;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use commands::{config, replay};

#[derive(Parser)]
#[command(name = "pinpoint")]
#[command(about = "Headless driver for the vertex point selection mode", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a pointer trace against a headless surface and print the selection
    Replay {
        /// Path to trace file
        trace: String,

        /// Point selection config file
        #[arg(long)]
        config: Option<String>,
    },

    /// Print the effective point selection config
    Config {
        /// Config file to load instead of the defaults
        #[arg(long)]
        config: Option<String>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Replay { trace, config } => replay::run(replay::ReplayArgs { trace, config }),
        Commands::Config { config } => config::run(config.as_deref()),
    }
}
