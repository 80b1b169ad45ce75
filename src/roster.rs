//! Roster-wide batch computation using rayon
//!
//! One shared log fetch is split per athlete and each athlete runs the same
//! pipeline as a single-athlete query, independently and in parallel.

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::info;

use crate::config::EngineConfig;
use crate::models::{RosterEntry, WorkoutLogSample, Zone};
use crate::pipeline::analyze_athlete;

/// Split a shared fetch into per-athlete log lists
pub fn group_by_athlete(
    samples: Vec<WorkoutLogSample>,
) -> HashMap<String, Vec<WorkoutLogSample>> {
    let mut grouped: HashMap<String, Vec<WorkoutLogSample>> = HashMap::new();
    for sample in samples {
        grouped
            .entry(sample.athlete_id.clone())
            .or_default()
            .push(sample);
    }
    grouped
}

/// Compute a roster row for every requested athlete.
///
/// Every id in `athlete_ids` gets exactly one entry; athletes without logs get
/// zero miles and an insufficient zone. Each athlete only sees its own list in
/// `logs_by_athlete`, and all share the same `today`.
pub fn compute_for_roster(
    athlete_ids: &[String],
    logs_by_athlete: &HashMap<String, Vec<WorkoutLogSample>>,
    today: NaiveDate,
    config: &EngineConfig,
) -> BTreeMap<String, RosterEntry> {
    athlete_ids
        .par_iter()
        .map(|id| {
            let samples = logs_by_athlete.get(id).map(Vec::as_slice).unwrap_or(&[]);
            let entry = analyze_athlete(samples, today, config).roster_entry(config);
            (id.clone(), entry)
        })
        .collect()
}

/// Roster results for one anchor date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterSummary {
    /// The "today" every athlete was evaluated against
    pub anchor: NaiveDate,

    /// One row per athlete, ordered by id
    pub athletes: BTreeMap<String, RosterEntry>,
}

impl RosterSummary {
    /// Run the batch over a fetch that may contain any of the requested athletes
    pub fn compute(
        athlete_ids: &[String],
        samples: Vec<WorkoutLogSample>,
        today: NaiveDate,
        config: &EngineConfig,
    ) -> Self {
        let logs_by_athlete = group_by_athlete(samples);
        let athletes = compute_for_roster(athlete_ids, &logs_by_athlete, today, config);

        info!(
            athletes = athletes.len(),
            elevated = athletes.values().filter(|e| e.zone.is_elevated()).count(),
            %today,
            "Roster summary computed"
        );

        RosterSummary {
            anchor: today,
            athletes,
        }
    }

    pub fn len(&self) -> usize {
        self.athletes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.athletes.is_empty()
    }

    pub fn get(&self, athlete_id: &str) -> Option<&RosterEntry> {
        self.athletes.get(athlete_id)
    }

    /// Number of athletes in each zone; zones without athletes are omitted
    pub fn zone_counts(&self) -> BTreeMap<Zone, usize> {
        let mut counts = BTreeMap::new();
        for entry in self.athletes.values() {
            *counts.entry(entry.zone).or_insert(0) += 1;
        }
        counts
    }

    /// Ids of athletes in caution or worse, sorted
    pub fn elevated(&self) -> Vec<&str> {
        self.athletes
            .iter()
            .filter(|(_, entry)| entry.zone.is_elevated())
            .map(|(id, _)| id.as_str())
            .collect()
    }
}
