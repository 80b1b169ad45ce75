//! The per-athlete pipeline shared by single-athlete queries and roster batches

use chrono::NaiveDate;
use tracing::debug;

use crate::acwr::AcwrCalculator;
use crate::config::EngineConfig;
use crate::load::{aggregate_with_effort, DailyLoadSeries};
use crate::models::{AcwrResult, RosterEntry, WorkoutLogSample};

/// Everything derived from one athlete's logs for one anchor date
#[derive(Debug, Clone, PartialEq)]
pub struct AthleteAnalysis {
    pub series: DailyLoadSeries,
    pub result: AcwrResult,
}

impl AthleteAnalysis {
    /// Canonical miles over the trailing `days`
    pub fn weekly_miles(&self, days: usize) -> f64 {
        self.series.trailing_miles(days)
    }

    /// Condense into a roster row
    pub fn roster_entry(&self, config: &EngineConfig) -> RosterEntry {
        RosterEntry {
            weekly_miles: self.weekly_miles(config.weekly_days),
            acwr: self.result.acwr,
            zone: self.result.zone,
        }
    }
}

/// Aggregate one athlete's logs and compute the current ratio.
///
/// `samples` must belong to a single athlete. Load and mileage come out of
/// the same pass over the logs.
pub fn analyze_athlete(
    samples: &[WorkoutLogSample],
    today: NaiveDate,
    config: &EngineConfig,
) -> AthleteAnalysis {
    let series = aggregate_with_effort(samples, config.window_days, today, config.default_effort);
    let result = AcwrCalculator::with_config(config.clone()).compute(&series);

    debug!(
        samples = samples.len(),
        %today,
        zone = %result.zone,
        "Analyzed athlete logs"
    );

    AthleteAnalysis { series, result }
}
