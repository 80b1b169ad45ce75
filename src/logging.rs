//! Structured logging for loadrisk
//!
//! Everything is written to stderr so stdout carries only command output.
//! A JSON log file can be added on top, optionally rotated daily.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
    Registry,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: LogLevel,

    /// Stderr format (pretty, json, compact)
    pub format: LogFormat,

    /// Additional JSON log file
    pub file_path: Option<PathBuf>,

    /// Rotate the log file daily
    pub rotation: bool,

    /// Log query spans as they open and close
    pub include_spans: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            format: LogFormat::Pretty,
            file_path: None,
            rotation: true,
            include_spans: false,
        }
    }
}

impl LogConfig {
    /// Apply command line overrides; each `-v` raises the level one step
    pub fn with_overrides(
        mut self,
        level: Option<LogLevel>,
        format: Option<LogFormat>,
        verbosity: u8,
    ) -> Self {
        self.level = level.unwrap_or(self.level).raised_by(verbosity);
        if let Some(format) = format {
            self.format = format;
        }
        self
    }
}

/// Log level, quietest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    const ALL: [LogLevel; 5] = [
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// The level `verbosity` steps louder, capped at trace
    pub fn raised_by(self, verbosity: u8) -> Self {
        let index = (self as usize + verbosity as usize).min(Self::ALL.len() - 1);
        Self::ALL[index]
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        if name == "warning" {
            return Ok(LogLevel::Warn);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|level| level.as_str() == name)
            .ok_or_else(|| format!("Invalid log level: {}", s))
    }
}

/// Stderr output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable with colors
    Pretty,
    /// One JSON object per event
    Json,
    /// Single-line events
    Compact,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(format!("Invalid log format: {}", s)),
        }
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Fails if a
/// subscriber is already installed or the log file cannot be opened.
pub fn init_logging(config: &LogConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("loadrisk={}", config.level)));

    let mut layers = vec![stderr_layer(config)];
    if let Some(path) = &config.file_path {
        layers.push(file_layer(path, config)?);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()?;

    tracing::debug!(
        level = %config.level,
        format = ?config.format,
        file = ?config.file_path,
        "Logging initialized"
    );

    Ok(())
}

fn span_events(config: &LogConfig) -> FmtSpan {
    if config.include_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    }
}

fn stderr_layer(config: &LogConfig) -> BoxedLayer {
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(span_events(config));

    match config.format {
        LogFormat::Pretty => layer.with_line_number(true).boxed(),
        LogFormat::Json => layer.json().with_current_span(config.include_spans).boxed(),
        LogFormat::Compact => layer.compact().boxed(),
    }
}

fn file_layer(path: &Path, config: &LogConfig) -> anyhow::Result<BoxedLayer> {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let layer = tracing_subscriber::fmt::layer()
        .json()
        .with_ansi(false)
        .with_target(true)
        .with_current_span(config.include_spans)
        .with_span_events(span_events(config));

    if config.rotation {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("loadrisk.log");
        Ok(layer
            .with_writer(tracing_appender::rolling::daily(dir, file_name))
            .boxed())
    } else {
        let file = fs::OpenOptions::new().create(true).append(true).open(path)?;
        Ok(layer.with_writer(Mutex::new(file)).boxed())
    }
}
