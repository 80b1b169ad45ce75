// Library interface for loadrisk modules
// This allows integration tests and benchmarks to access the core functionality

pub mod acwr;
pub mod config;
pub mod engine;
pub mod error;
pub mod ewma;
pub mod history;
pub mod load;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod roster;
pub mod source;
pub mod units;
pub mod zones;

// Re-export commonly used types for convenience
pub use acwr::{compute_acwr, AcwrCalculator};
pub use config::{AppConfig, EngineConfig};
pub use engine::RiskEngine;
pub use error::{LoadRiskError, Result, SourceError};
pub use ewma::{decay_for_span, ewma};
pub use history::{build_history, raw_trend, AcwrHistory, HistoryBuilder};
pub use load::{aggregate, DailyLoadSeries};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use models::*;
pub use pipeline::{analyze_athlete, AthleteAnalysis};
pub use roster::{compute_for_roster, RosterSummary};
pub use source::{DateRange, FileLogSource, InMemoryLogSource, LogSource, MergedLogSource};
pub use units::to_canonical_miles;
pub use zones::classify;
