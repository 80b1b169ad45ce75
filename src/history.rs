//! Historical ratio trend and short raw-load trend for charting

use serde::{Deserialize, Serialize};

use crate::acwr::AcwrCalculator;
use crate::config::EngineConfig;
use crate::ewma::ewma;
use crate::load::DailyLoadSeries;
use crate::models::{AcwrHistoryPoint, TrendPoint};

/// Ratio history plus the raw daily loads behind the most recent days
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcwrHistory {
    /// Ratio per eligible day, oldest first
    pub points: Vec<AcwrHistoryPoint>,

    /// Raw daily loads over the trend window, oldest first
    pub raw_trend: Vec<TrendPoint>,
}

/// Replays the ratio at every day that has a full chronic span behind it
pub struct HistoryBuilder {
    config: EngineConfig,
}

impl HistoryBuilder {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        HistoryBuilder { config }
    }

    /// Ratio for each index `i >= chronic_days - 1`.
    ///
    /// Acute smooths the `acute_days` ending at `i`, chronic the
    /// `chronic_days` ending at `i`. Days with zero chronic load are skipped.
    /// The minimum-data guard of the current snapshot does not apply here.
    pub fn build(&self, series: &DailyLoadSeries) -> Vec<AcwrHistoryPoint> {
        let loads = series.loads();
        let acute_span = self.config.acute_days.max(1);
        let chronic_span = self.config.chronic_days.max(1);
        let acute_decay = self.config.acute_decay();
        let chronic_decay = self.config.chronic_decay();

        series
            .days()
            .iter()
            .enumerate()
            .skip(chronic_span - 1)
            .filter_map(|(i, day)| {
                let acute = ewma(&loads[(i + 1).saturating_sub(acute_span)..=i], acute_decay);
                let chronic =
                    ewma(&loads[(i + 1).saturating_sub(chronic_span)..=i], chronic_decay);

                AcwrCalculator::ratio(acute, chronic).map(|acwr| AcwrHistoryPoint {
                    date: day.date,
                    acwr,
                })
            })
            .collect()
    }

    /// The last `trend_days` of raw daily load
    pub fn raw_trend(&self, series: &DailyLoadSeries) -> Vec<TrendPoint> {
        series
            .last_days(self.config.trend_days)
            .iter()
            .map(|day| TrendPoint {
                date: day.date,
                load: day.load,
            })
            .collect()
    }

    pub fn history(&self, series: &DailyLoadSeries) -> AcwrHistory {
        AcwrHistory {
            points: self.build(series),
            raw_trend: self.raw_trend(series),
        }
    }
}

impl Default for HistoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Ratio history with the default 7/28-day spans
pub fn build_history(series: &DailyLoadSeries) -> Vec<AcwrHistoryPoint> {
    HistoryBuilder::new().build(series)
}

/// The last 14 days of raw daily load
pub fn raw_trend(series: &DailyLoadSeries) -> Vec<TrendPoint> {
    HistoryBuilder::new().raw_trend(series)
}
