use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;

use loadrisk::config::AppConfig;
use loadrisk::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use loadrisk::report;
use loadrisk::source::{FileLogSource, LogSource, MergedLogSource};
use loadrisk::{LoadRiskError, RiskEngine};

/// loadrisk - Training load risk monitoring
///
/// Turns logged workouts into a daily load signal and reports the
/// acute:chronic workload ratio (ACWR) and injury-risk zone per athlete.
#[derive(Parser)]
#[command(name = "loadrisk")]
#[command(version)]
#[command(about = "Training load ACWR risk monitoring", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log level (error, warn, info, debug, trace), overrides the config file
    #[arg(long, value_name = "LEVEL", global = true)]
    log_level: Option<LogLevel>,

    /// Log format (pretty, json, compact), overrides the config file
    #[arg(long, value_name = "FORMAT", global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Current ACWR and risk zone for one athlete
    Current {
        /// Workout log file (CSV or JSON)
        #[arg(short, long)]
        logs: Option<PathBuf>,

        /// Athlete ID
        #[arg(short, long)]
        athlete: String,

        /// Anchor date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        today: Option<NaiveDate>,
    },

    /// ACWR history and recent daily load for one athlete
    History {
        /// Workout log file (CSV or JSON)
        #[arg(short, long)]
        logs: Option<PathBuf>,

        /// Athlete ID
        #[arg(short, long)]
        athlete: String,

        /// Anchor date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        today: Option<NaiveDate>,
    },

    /// Weekly miles, ACWR and zone for a roster
    Roster {
        /// Workout log file (CSV or JSON)
        #[arg(short, long)]
        logs: Option<PathBuf>,

        /// Athlete IDs (every athlete in the logs when omitted)
        #[arg(short, long)]
        athlete: Vec<String>,

        /// Anchor date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        today: Option<NaiveDate>,
    },

    /// Show or initialize the configuration file
    Config {
        /// Write a default configuration file
        #[arg(long)]
        init: bool,

        /// Print the effective configuration
        #[arg(long)]
        show: bool,
    },
}

/// Configuration for this invocation.
///
/// `config --init` starts from defaults, so its target file may not exist yet.
fn load_config(cli: &Cli) -> Result<AppConfig> {
    if matches!(cli.command, Commands::Config { init: true, .. }) {
        return Ok(AppConfig::default());
    }

    match cli.config.as_deref() {
        Some(path) => AppConfig::load_from_file(path),
        None => Ok(AppConfig::load_or_default()),
    }
}

/// Logging settings from the config file, overridden by command line flags
fn log_config(cli: &Cli, config: &AppConfig) -> LogConfig {
    config
        .logging
        .clone()
        .with_overrides(cli.log_level, cli.log_format, cli.verbose)
}

/// Log files opened for one command
struct OpenedLogs {
    source: Box<dyn LogSource>,
    athlete_ids: Vec<String>,
}

/// Open the log file from the command line or config, merged with the
/// personal log file when one is configured
fn open_logs(logs: Option<PathBuf>, config: &AppConfig) -> Result<OpenedLogs> {
    let path = logs
        .or_else(|| config.source.logs_path.clone())
        .context("No log file given; pass --logs or set source.logs_path in the config")?;

    let scheduled = FileLogSource::open(&path).map_err(LoadRiskError::from)?;
    let mut athlete_ids = scheduled.athlete_ids();

    let source: Box<dyn LogSource> = match &config.source.personal_logs_path {
        Some(personal) => {
            let personal = FileLogSource::open(personal).map_err(LoadRiskError::from)?;
            athlete_ids.extend(personal.athlete_ids());
            athlete_ids.sort();
            athlete_ids.dedup();
            Box::new(MergedLogSource::new(scheduled, personal))
        }
        None => Box::new(scheduled),
    };

    Ok(OpenedLogs {
        source,
        athlete_ids,
    })
}

fn local_today(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| chrono::Local::now().date_naive())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() {
    if let Err(err) = run(Cli::parse()) {
        match err.downcast_ref::<LoadRiskError>() {
            Some(risk_err) => eprintln!("{} {}", "Error:".red().bold(), risk_err.user_message()),
            None => eprintln!("{} {:#}", "Error:".red().bold(), err),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    init_logging(&log_config(&cli, &config))?;

    execute(cli, &config).map_err(|err| {
        log_failure(&err);
        err
    })
}

/// Record a failed command at the severity of its error
fn log_failure(err: &anyhow::Error) {
    match err.downcast_ref::<LoadRiskError>() {
        Some(risk_err) if risk_err.severity().to_tracing_level() == tracing::Level::WARN => {
            tracing::warn!(error = %risk_err, "Command failed")
        }
        Some(risk_err) => tracing::error!(error = %risk_err, "Command failed"),
        None => tracing::error!(error = ?err, "Command failed"),
    }
}

fn execute(cli: Cli, config: &AppConfig) -> Result<()> {
    match cli.command {
        Commands::Current {
            logs,
            athlete,
            today,
        } => {
            let opened = open_logs(logs, config)?;
            let engine = RiskEngine::with_config(opened.source, config.engine.clone())?;
            let result = engine.current_acwr(&athlete, local_today(today))?;

            if cli.json {
                print_json(&result)?;
            } else {
                print!("{}", report::render_current(&athlete, &result));
            }
        }

        Commands::History {
            logs,
            athlete,
            today,
        } => {
            let opened = open_logs(logs, config)?;
            let engine = RiskEngine::with_config(opened.source, config.engine.clone())?;
            let history = engine.acwr_history(&athlete, local_today(today))?;

            if cli.json {
                print_json(&history)?;
            } else {
                print!("{}", report::render_history(&athlete, &history));
            }
        }

        Commands::Roster {
            logs,
            athlete,
            today,
        } => {
            let opened = open_logs(logs, config)?;
            let athletes = if athlete.is_empty() {
                opened.athlete_ids
            } else {
                athlete
            };

            let engine = RiskEngine::with_config(opened.source, config.engine.clone())?;
            let summary = engine.roster_summary(&athletes, local_today(today))?;

            if cli.json {
                print_json(&summary)?;
            } else {
                print!("{}", report::render_roster(&summary));
            }
        }

        Commands::Config { init, show } => {
            if init {
                let path = cli.config.unwrap_or_else(AppConfig::default_config_path);
                AppConfig::default().save_to_file(&path)?;
                println!("{} {}", "✓ Wrote default configuration to".green(), path.display());
            }
            if show || !init {
                println!("{}", toml::to_string_pretty(config)?);
            }
        }
    }

    Ok(())
}
