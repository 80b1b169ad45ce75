//! Distance normalization to canonical miles

use crate::models::DistanceUnit;

/// Miles per kilometer
pub const MILES_PER_KM: f64 = 0.621371;

/// Convert a logged distance to miles.
///
/// Absent distances count as zero; an absent unit is treated as miles.
pub fn to_canonical_miles(value: Option<f64>, unit: Option<DistanceUnit>) -> f64 {
    let Some(value) = value else {
        return 0.0;
    };

    match unit {
        Some(DistanceUnit::Km) => value * MILES_PER_KM,
        Some(DistanceUnit::Mile) | None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_km_conversion() {
        let miles = to_canonical_miles(Some(10.0), Some(DistanceUnit::Km));
        assert!((miles - 6.21371).abs() < 0.0001);
    }

    #[test]
    fn test_miles_pass_through() {
        assert_eq!(to_canonical_miles(Some(5.0), Some(DistanceUnit::Mile)), 5.0);
        assert_eq!(to_canonical_miles(Some(5.0), None), 5.0);
    }

    #[test]
    fn test_missing_distance_is_zero() {
        assert_eq!(to_canonical_miles(None, Some(DistanceUnit::Km)), 0.0);
        assert_eq!(to_canonical_miles(None, None), 0.0);
    }
}
