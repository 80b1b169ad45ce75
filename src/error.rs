//! Unified error hierarchy for loadrisk
//!
//! The load pipeline itself never fails. Errors come from the log source
//! (surfaced as "data unavailable") and from configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for all loadrisk operations
#[derive(Debug, Error)]
pub enum LoadRiskError {
    /// The log source could not deliver workout logs
    #[error("Data unavailable: {0}")]
    DataUnavailable(#[from] SourceError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Failures reported by a log source
#[derive(Debug, Error)]
pub enum SourceError {
    /// Backing store could not be reached
    #[error("{source_name} unreachable: {reason}")]
    Unreachable { source_name: String, reason: String },

    /// Log file missing
    #[error("Log file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Log file format not recognized
    #[error("Unsupported log format: {format}")]
    UnsupportedFormat { format: String },

    /// Log file could not be parsed
    #[error("Parse error in {format}: {reason}")]
    Parse { format: String, reason: String },

    /// A single record could not be decoded
    #[error("Invalid record at line {line}: {reason}")]
    InvalidRecord { line: u64, reason: String },
}

/// Result type alias for loadrisk operations
pub type Result<T> = std::result::Result<T, LoadRiskError>;

impl LoadRiskError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, LoadRiskError::DataUnavailable(SourceError::Unreachable { .. }))
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            LoadRiskError::DataUnavailable(SourceError::Unreachable { .. }) => ErrorSeverity::Error,
            LoadRiskError::DataUnavailable(SourceError::InvalidRecord { .. }) => {
                ErrorSeverity::Warning
            }
            LoadRiskError::DataUnavailable(_) => ErrorSeverity::Error,
            LoadRiskError::Configuration(_) => ErrorSeverity::Critical,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            LoadRiskError::DataUnavailable(SourceError::Unreachable { source_name, .. }) => {
                format!(
                    "Workout logs are unavailable right now ({}). Please try again later.",
                    source_name
                )
            }
            LoadRiskError::DataUnavailable(SourceError::FileNotFound { path }) => {
                format!("Could not find workout log file: {}", path.display())
            }
            LoadRiskError::DataUnavailable(SourceError::UnsupportedFormat { format }) => {
                format!("Workout logs must be CSV or JSON, got '{}'", format)
            }
            LoadRiskError::Configuration(reason) => {
                format!("Invalid configuration: {}", reason)
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Critical system error requiring immediate attention
    Critical,
    /// Error that prevents operation but system can continue
    Error,
    /// Warning that doesn't prevent operation
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical => tracing::Level::ERROR,
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_errors_become_data_unavailable() {
        let err: LoadRiskError = SourceError::Unreachable {
            source_name: "team-db".to_string(),
            reason: "timeout".to_string(),
        }
        .into();

        assert!(matches!(err, LoadRiskError::DataUnavailable(_)));
        assert!(err.to_string().starts_with("Data unavailable"));
    }

    #[test]
    fn test_error_severity() {
        let err = LoadRiskError::DataUnavailable(SourceError::InvalidRecord {
            line: 3,
            reason: "bad date".to_string(),
        });
        assert_eq!(err.severity(), ErrorSeverity::Warning);

        let err = LoadRiskError::Configuration("chronic span exceeds window".to_string());
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.severity().to_tracing_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_error_retryable() {
        let err = LoadRiskError::DataUnavailable(SourceError::Unreachable {
            source_name: "team-db".to_string(),
            reason: "timeout".to_string(),
        });
        assert!(err.is_retryable());

        let err = LoadRiskError::DataUnavailable(SourceError::FileNotFound {
            path: PathBuf::from("logs.csv"),
        });
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_user_messages() {
        let err = LoadRiskError::DataUnavailable(SourceError::FileNotFound {
            path: PathBuf::from("logs.csv"),
        });
        assert!(err.user_message().contains("Could not find"));

        let err = LoadRiskError::Configuration("acute span too long".to_string());
        assert!(err.user_message().contains("acute span too long"));
    }
}
