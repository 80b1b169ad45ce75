use rust_decimal::prelude::*;
use rust_decimal::RoundingStrategy;
use tracing::debug;

use crate::config::EngineConfig;
use crate::ewma::ewma;
use crate::load::DailyLoadSeries;
use crate::models::AcwrResult;
use crate::zones::classify;

/// Round to `dp` decimal places, half away from zero.
///
/// Rounding is done on the shortest decimal representation of the value, so
/// `1.005` rounds to `1.01` rather than to the binary neighbour below it.
/// Values outside the `Decimal` range fall back to scaled `f64::round`.
pub fn round_dp(value: f64, dp: u32) -> f64 {
    value
        .to_string()
        .parse::<Decimal>()
        .ok()
        .map(|d| d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or_else(|| {
            let scale = 10f64.powi(dp as i32);
            let scaled = value * scale;
            if scaled.is_finite() {
                scaled.round() / scale
            } else {
                value
            }
        })
}

/// Acute:chronic workload ratio calculator
pub struct AcwrCalculator {
    config: EngineConfig,
}

impl AcwrCalculator {
    /// Create new calculator with default configuration
    pub fn new() -> Self {
        AcwrCalculator {
            config: EngineConfig::default(),
        }
    }

    /// Create new calculator with custom configuration
    pub fn with_config(config: EngineConfig) -> Self {
        AcwrCalculator { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compute the current ratio from a dense daily load series.
    ///
    /// Below `min_data_days` non-zero days the result is insufficient. The
    /// acute load smooths the last `acute_days`, the chronic load smooths the
    /// whole series. A zero chronic load yields no ratio.
    pub fn compute(&self, series: &DailyLoadSeries) -> AcwrResult {
        let days_with_data = series.days_with_data();

        if days_with_data < self.config.min_data_days {
            debug!(
                days_with_data,
                required = self.config.min_data_days,
                "Not enough training days for a ratio"
            );
            return AcwrResult::insufficient(days_with_data);
        }

        let loads = series.loads();
        let acute_window = &loads[loads.len().saturating_sub(self.config.acute_days)..];

        let acute = ewma(acute_window, self.config.acute_decay());
        let chronic = ewma(&loads, self.config.chronic_decay());

        let acwr = Self::ratio(acute, chronic);

        debug!(acute, chronic, ?acwr, days_with_data, "Computed workload ratio");

        AcwrResult {
            acwr,
            acute_load: round_dp(acute, 1),
            chronic_load: round_dp(chronic, 1),
            zone: classify(acwr),
            days_with_data,
        }
    }

    /// Ratio of two already-smoothed loads, `None` when chronic load is zero
    pub fn ratio(acute: f64, chronic: f64) -> Option<f64> {
        (chronic > 0.0).then(|| round_dp(acute / chronic, 2))
    }
}

impl Default for AcwrCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute the current ratio with the default 7/28-day spans
pub fn compute_acwr(series: &DailyLoadSeries) -> AcwrResult {
    AcwrCalculator::new().compute(series)
}
