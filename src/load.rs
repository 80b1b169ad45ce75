//! Daily load aggregation
//!
//! Folds irregular workout logs into a dense, calendar-contiguous series of
//! daily loads ending on the anchor date. Rest days are materialized as zero.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use crate::models::{DailyLoad, WorkoutLogSample};
use crate::units::to_canonical_miles;

/// Effort assumed when a log has distance but no effort level
pub const DEFAULT_EFFORT: i32 = 5;
pub const MIN_EFFORT: i32 = 1;
pub const MAX_EFFORT: i32 = 10;

/// A log reduced to what the load model needs, after clamping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SanitizedSample {
    pub date: NaiveDate,
    pub miles: f64,
    pub effort: i32,
}

impl SanitizedSample {
    pub fn load(&self) -> f64 {
        f64::from(self.effort) * self.miles
    }
}

/// Reduce a log to canonical miles and a bounded effort.
///
/// Logs without a distance return `None`. Negative or non-finite distances
/// count as zero, and effort is clamped to 1-10. A missing effort takes
/// `default_effort`.
pub fn sanitize(sample: &WorkoutLogSample, default_effort: i32) -> Option<SanitizedSample> {
    let raw_distance = sample.distance_value?;

    let distance = if raw_distance.is_finite() && raw_distance >= 0.0 {
        raw_distance
    } else {
        warn!(
            athlete = %sample.athlete_id,
            date = %sample.date,
            distance = raw_distance,
            "Clamping invalid distance to zero"
        );
        0.0
    };

    let effort = match sample.effort_level {
        None => default_effort,
        Some(level) if (MIN_EFFORT..=MAX_EFFORT).contains(&level) => level,
        Some(level) => {
            warn!(
                athlete = %sample.athlete_id,
                date = %sample.date,
                effort = level,
                "Clamping effort level into 1-10"
            );
            level.clamp(MIN_EFFORT, MAX_EFFORT)
        }
    };

    Some(SanitizedSample {
        date: sample.date,
        miles: to_canonical_miles(Some(distance), sample.distance_unit),
        effort,
    })
}

/// Dense daily load series, oldest first, ending on the anchor date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLoadSeries {
    days: Vec<DailyLoad>,
}

impl DailyLoadSeries {
    /// Build a series of `loads` ending on `anchor`, with zero miles per day
    pub fn from_loads(anchor: NaiveDate, loads: &[f64]) -> Self {
        let start = window_start(anchor, loads.len());
        let days = start
            .iter_days()
            .zip(loads)
            .map(|(date, &load)| DailyLoad {
                date,
                load,
                miles: 0.0,
            })
            .collect();

        Self { days }
    }

    pub fn days(&self) -> &[DailyLoad] {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Date of the last element
    pub fn anchor(&self) -> Option<NaiveDate> {
        self.days.last().map(|day| day.date)
    }

    /// Load values, oldest first
    pub fn loads(&self) -> Vec<f64> {
        self.days.iter().map(|day| day.load).collect()
    }

    /// Number of days with non-zero load
    pub fn days_with_data(&self) -> usize {
        self.days.iter().filter(|day| day.has_load()).count()
    }

    /// The most recent `n` days (all of them if the series is shorter)
    pub fn last_days(&self, n: usize) -> &[DailyLoad] {
        &self.days[self.days.len().saturating_sub(n)..]
    }

    /// Canonical miles over the most recent `n` days
    pub fn trailing_miles(&self, n: usize) -> f64 {
        self.last_days(n).iter().map(|day| day.miles).sum()
    }
}

/// First date of a `window_days` window ending on `anchor`
fn window_start(anchor: NaiveDate, window_days: usize) -> NaiveDate {
    let back = window_days.saturating_sub(1) as u64;
    anchor
        .checked_sub_days(Days::new(back))
        .unwrap_or(NaiveDate::MIN)
}

/// Aggregate logs into a `window_days` series ending on `anchor`, using the
/// default effort of 5 for logs without one.
pub fn aggregate(
    samples: &[WorkoutLogSample],
    window_days: usize,
    anchor: NaiveDate,
) -> DailyLoadSeries {
    aggregate_with_effort(samples, window_days, anchor, DEFAULT_EFFORT)
}

/// Aggregate logs into a `window_days` series ending on `anchor`.
///
/// Same-day logs are summed. Logs dated outside the window or without a
/// distance are ignored. Samples must already be limited to one athlete.
pub fn aggregate_with_effort(
    samples: &[WorkoutLogSample],
    window_days: usize,
    anchor: NaiveDate,
    default_effort: i32,
) -> DailyLoadSeries {
    let start = window_start(anchor, window_days);

    // date -> (load, miles)
    let mut totals: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();

    for sanitized in samples
        .iter()
        .filter_map(|sample| sanitize(sample, default_effort))
        .filter(|s| s.date >= start && s.date <= anchor)
    {
        let entry = totals.entry(sanitized.date).or_insert((0.0, 0.0));
        entry.0 += sanitized.load();
        entry.1 += sanitized.miles;
    }

    let days = start
        .iter_days()
        .take(window_days)
        .map(|date| match totals.get(&date) {
            Some(&(load, miles)) => DailyLoad { date, load, miles },
            None => DailyLoad::rest(date),
        })
        .collect();

    DailyLoadSeries { days }
}
