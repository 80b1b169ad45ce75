//! Read-only risk queries over a log source
//!
//! Every query performs one fetch for the trailing window and recomputes
//! from scratch. Nothing is cached between calls.

use chrono::NaiveDate;
use tracing::{info, instrument, warn};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::history::{AcwrHistory, HistoryBuilder};
use crate::models::{AcwrResult, WorkoutLogSample};
use crate::pipeline::{analyze_athlete, AthleteAnalysis};
use crate::roster::RosterSummary;
use crate::source::{DateRange, LogSource};

/// Training-load risk queries for one log source
pub struct RiskEngine<S> {
    source: S,
    config: EngineConfig,
}

impl<S: LogSource> RiskEngine<S> {
    /// Create an engine with the default 35-day window and 7/28-day spans
    pub fn new(source: S) -> Self {
        Self {
            source,
            config: EngineConfig::default(),
        }
    }

    /// Create an engine with custom windows, rejecting inconsistent ones
    pub fn with_config(source: S, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { source, config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Current ratio, loads and zone for one athlete
    #[instrument(skip(self), fields(source = self.source.source_name()))]
    pub fn current_acwr(&self, athlete_id: &str, today: NaiveDate) -> Result<AcwrResult> {
        let analysis = self.analyze(athlete_id, today)?;

        info!(zone = %analysis.result.zone, acwr = ?analysis.result.acwr, "Current ratio computed");
        Ok(analysis.result)
    }

    /// Ratio history and raw load trend for one athlete
    #[instrument(skip(self), fields(source = self.source.source_name()))]
    pub fn acwr_history(&self, athlete_id: &str, today: NaiveDate) -> Result<AcwrHistory> {
        let analysis = self.analyze(athlete_id, today)?;
        let history = HistoryBuilder::with_config(self.config.clone()).history(&analysis.series);

        info!(points = history.points.len(), "Ratio history computed");
        Ok(history)
    }

    /// One row per athlete from a single shared fetch
    #[instrument(
        skip(self, athlete_ids),
        fields(source = self.source.source_name(), athletes = athlete_ids.len())
    )]
    pub fn roster_summary(
        &self,
        athlete_ids: &[String],
        today: NaiveDate,
    ) -> Result<RosterSummary> {
        let samples = self.fetch_window(athlete_ids, today)?;
        Ok(RosterSummary::compute(athlete_ids, samples, today, &self.config))
    }

    fn analyze(&self, athlete_id: &str, today: NaiveDate) -> Result<AthleteAnalysis> {
        let mut samples = self.fetch_window(&[athlete_id.to_string()], today)?;
        samples.retain(|sample| sample.athlete_id == athlete_id);

        Ok(analyze_athlete(&samples, today, &self.config))
    }

    fn fetch_window(
        &self,
        athlete_ids: &[String],
        today: NaiveDate,
    ) -> Result<Vec<WorkoutLogSample>> {
        let range = DateRange::trailing(today, self.config.window_days);

        self.source.fetch_logs(athlete_ids, &range).map_err(|err| {
            warn!(
                source = self.source.source_name(),
                error = %err,
                "Log source failed"
            );
            err.into()
        })
    }
}
