//! CLI argument parsing definitions

use aviation_load_config::{LogLevel, Stage};
use aviation_load_scenarios::EntryPointKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate load against one service boundary
    Run {
        /// Entry point: aircraft, flights, router, gateway, auth
        #[arg(value_name = "ENTRY")]
        entry: EntryPointKind,

        /// Ramp stage as <duration>:<target>, repeatable (example: --stage 30s:5 --stage 1m:10)
        #[arg(long = "stage", value_name = "STAGE")]
        stages: Vec<Stage>,

        /// Virtual users active before the first stage ramps
        #[arg(long, value_name = "N")]
        start_vus: Option<usize>,

        /// Pause after every iteration (example: 500ms)
        #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
        think_time: Option<Duration>,

        /// Write the run summary as JSON to this path
        #[arg(long, value_name = "PATH")]
        summary_json: Option<PathBuf>,
    },

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        config_cmd: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print or write a sample configuration with every default spelled out
    Sample {
        /// Output file path (stdout when omitted)
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },

    /// Validate a configuration file together with environment overrides
    Validate {
        /// Path to the configuration file (defaults to --config)
        #[arg(long, value_name = "PATH")]
        config_file: Option<PathBuf>,
    },
}
