use crate::models::Zone;

/// Ratios below this are undertraining
pub const UNDERTRAINING_BELOW: f64 = 0.8;
/// Upper bound (inclusive) of the optimal band
pub const OPTIMAL_MAX: f64 = 1.3;
/// Upper bound (inclusive) of the caution band
pub const CAUTION_MAX: f64 = 1.5;
/// Upper bound (inclusive) of the danger band; anything above is critical
pub const DANGER_MAX: f64 = 2.0;

/// Classify an acute:chronic ratio into a risk zone.
///
/// Bands are evaluated in increasing order of risk and the first match wins:
/// - no ratio: insufficient
/// - `< 0.8`: undertraining
/// - `<= 1.3`: optimal
/// - `<= 1.5`: caution
/// - `<= 2.0`: danger
/// - above: critical
///
/// A NaN ratio falls through every comparison and lands in critical.
pub fn classify(acwr: Option<f64>) -> Zone {
    let Some(ratio) = acwr else {
        return Zone::Insufficient;
    };

    if ratio < UNDERTRAINING_BELOW {
        Zone::Undertraining
    } else if ratio <= OPTIMAL_MAX {
        Zone::Optimal
    } else if ratio <= CAUTION_MAX {
        Zone::Caution
    } else if ratio <= DANGER_MAX {
        Zone::Danger
    } else {
        Zone::Critical
    }
}
