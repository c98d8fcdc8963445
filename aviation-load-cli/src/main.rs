mod cli;

use anyhow::{Context, Result};
use aviation_load_config::{ConfigLoader, LoadTestConfig, LogLevel, Stage};
use aviation_load_logging::init_logging;
use aviation_load_runner::LoadRunner;
use aviation_load_scenarios::EntryPointKind;
use clap::Parser;
use cli::{Cli, Commands, ConfigCommands};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Load configuration from file (if given) plus environment overrides
fn load_config(config_path: Option<&PathBuf>) -> Result<LoadTestConfig> {
    let loader = ConfigLoader::new();

    match config_path {
        Some(path) => loader
            .from_file(path)
            .with_context(|| format!("Failed to load configuration from {:?}", path)),
        None => loader
            .from_env()
            .context("Failed to load configuration from environment"),
    }
}

/// Command-line overrides for the load profile
struct RunOverrides {
    stages: Vec<Stage>,
    start_vus: Option<usize>,
    think_time: Option<Duration>,
}

impl RunOverrides {
    fn apply(self, config: &mut LoadTestConfig) {
        if !self.stages.is_empty() {
            config.load.stages = self.stages;
        }
        if let Some(start_vus) = self.start_vus {
            config.load.start_vus = start_vus;
        }
        if let Some(think_time) = self.think_time {
            config.load.think_time = think_time;
        }
    }
}

async fn handle_run(
    mut config: LoadTestConfig,
    entry: EntryPointKind,
    overrides: RunOverrides,
    summary_json: Option<&Path>,
) -> Result<()> {
    overrides.apply(&mut config);
    config
        .validate_all()
        .context("Invalid load profile after command-line overrides")?;

    info!(
        entry = %entry,
        duration = ?config.load.total_duration(),
        max_vus = config.load.max_target(),
        "Running load test"
    );

    let runner = LoadRunner::new(config);
    let summary = runner
        .run(Arc::from(entry.entry_point()))
        .await
        .with_context(|| format!("Load run for '{}' failed", entry))?;

    println!("{}", summary);

    if let Some(path) = summary_json {
        let json = summary.to_json().context("Failed to serialize run summary")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write summary to {:?}", path))?;
        info!("Summary written to {:?}", path);
    }

    if summary.checks_failed() > 0 {
        warn!(failed = summary.checks_failed(), "Some checks failed");
    }

    Ok(())
}

/// Handle sample configuration generation
fn handle_config_sample(output: Option<&Path>, force: bool) -> Result<()> {
    let sample = LoadTestConfig::generate_sample();

    let Some(output) = output else {
        print!("{}", sample);
        return Ok(());
    };

    if output.exists() && !force {
        return Err(anyhow::anyhow!(
            "Output file already exists: {:?}. Use --force to overwrite.",
            output
        ));
    }
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context("Failed to create output directory")?;
    }
    fs::write(output, sample).with_context(|| format!("Failed to write {:?}", output))?;

    println!("✅ Sample configuration written to {:?}", output);
    Ok(())
}

/// Handle configuration validation
fn handle_config_validate(config_file: Option<&PathBuf>) -> Result<()> {
    if let Some(path) = config_file {
        if !path.exists() {
            return Err(anyhow::anyhow!("Configuration file not found: {:?}", path));
        }
    }

    match load_config(config_file) {
        Ok(_config) => {
            println!("✅ Configuration is valid");
            Ok(())
        }
        Err(e) => {
            println!("❌ Configuration validation failed: {:#}", e);
            error!("Configuration validation failed: {:#}", e);
            Err(e)
        }
    }
}

fn apply_log_level(config: &mut LoadTestConfig, level: Option<LogLevel>) {
    if let Some(level) = level {
        config.logging.level = level;
        config.logging.filter = None;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // `config validate` reports its own load errors
    if let Commands::Config {
        config_cmd: ConfigCommands::Validate { config_file },
    } = &cli.command
    {
        return handle_config_validate(config_file.as_ref().or(cli.config.as_ref()));
    }
    if let Commands::Config {
        config_cmd: ConfigCommands::Sample { output, force },
    } = &cli.command
    {
        return handle_config_sample(output.as_deref(), *force);
    }

    let mut config = load_config(cli.config.as_ref())?;
    apply_log_level(&mut config, cli.log_level);
    init_logging(&config.logging)?;

    match cli.command {
        Commands::Run {
            entry,
            stages,
            start_vus,
            think_time,
            summary_json,
        } => {
            let overrides = RunOverrides {
                stages,
                start_vus,
                think_time,
            };
            handle_run(config, entry, overrides, summary_json.as_deref()).await
        }
        Commands::Config { .. } => Ok(()),
    }
}
