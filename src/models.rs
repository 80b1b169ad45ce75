use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Distance units accepted on a workout log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Mile,
    Km,
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceUnit::Mile => write!(f, "mile"),
            DistanceUnit::Km => write!(f, "km"),
        }
    }
}

impl FromStr for DistanceUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mile" | "miles" | "mi" => Ok(DistanceUnit::Mile),
            "km" | "kms" | "kilometer" | "kilometers" | "kilometre" | "kilometres" => {
                Ok(DistanceUnit::Km)
            }
            _ => Err(format!("Invalid distance unit: {}", s)),
        }
    }
}

/// Read an optional unit; unknown names are logged and treated as miles
pub(crate) fn lenient_distance_unit<'de, D>(
    deserializer: D,
) -> Result<Option<DistanceUnit>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    let unit = raw
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .and_then(|name| match name.parse::<DistanceUnit>() {
            Ok(unit) => Some(unit),
            Err(reason) => {
                tracing::warn!(unit = name, %reason, "Counting unknown distance unit as miles");
                None
            }
        });

    Ok(unit)
}

/// One logged training event, as delivered by a log source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutLogSample {
    /// Athlete the log belongs to
    pub athlete_id: String,

    /// Calendar day of the workout (scheduled date or personal log date)
    pub date: NaiveDate,

    /// Distance covered, in `distance_unit`
    #[serde(default)]
    pub distance_value: Option<f64>,

    /// Unit of `distance_value`, miles when unset or unrecognized
    #[serde(default, deserialize_with = "lenient_distance_unit")]
    pub distance_unit: Option<DistanceUnit>,

    /// Perceived effort on a 1-10 scale
    #[serde(default)]
    pub effort_level: Option<i32>,
}

impl WorkoutLogSample {
    /// Create a sample with a distance in miles and no logged effort
    pub fn new(athlete_id: impl Into<String>, date: NaiveDate, miles: f64) -> Self {
        Self {
            athlete_id: athlete_id.into(),
            date,
            distance_value: Some(miles),
            distance_unit: Some(DistanceUnit::Mile),
            effort_level: None,
        }
    }

    pub fn with_unit(mut self, unit: DistanceUnit) -> Self {
        self.distance_unit = Some(unit);
        self
    }

    pub fn with_effort(mut self, effort: i32) -> Self {
        self.effort_level = Some(effort);
        self
    }
}

/// Load and distance for a single calendar day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyLoad {
    /// Date of the training day
    pub date: NaiveDate,

    /// Sum of effort x miles over all samples of the day
    pub load: f64,

    /// Sum of canonical miles over all samples of the day
    pub miles: f64,
}

impl DailyLoad {
    /// A day without any logged training
    pub fn rest(date: NaiveDate) -> Self {
        Self {
            date,
            load: 0.0,
            miles: 0.0,
        }
    }

    pub fn has_load(&self) -> bool {
        self.load > 0.0
    }
}

/// Injury-risk category derived from the acute:chronic ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Insufficient,
    Undertraining,
    Optimal,
    Caution,
    Danger,
    Critical,
}

impl Zone {
    pub const ALL: [Zone; 6] = [
        Zone::Insufficient,
        Zone::Undertraining,
        Zone::Optimal,
        Zone::Caution,
        Zone::Danger,
        Zone::Critical,
    ];

    /// Lowercase identifier used in serialized output
    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::Insufficient => "insufficient",
            Zone::Undertraining => "undertraining",
            Zone::Optimal => "optimal",
            Zone::Caution => "caution",
            Zone::Danger => "danger",
            Zone::Critical => "critical",
        }
    }

    /// Short label for tables and charts
    pub fn label(&self) -> &'static str {
        match self {
            Zone::Insufficient => "Not enough data",
            Zone::Undertraining => "Undertraining",
            Zone::Optimal => "Optimal",
            Zone::Caution => "Caution",
            Zone::Danger => "Danger",
            Zone::Critical => "Critical",
        }
    }

    /// Get zone description
    pub fn description(&self) -> &'static str {
        match self {
            Zone::Insufficient => "Fewer than 7 training days in the window",
            Zone::Undertraining => "Acute load well below chronic load (detraining risk)",
            Zone::Optimal => "Acute load in line with chronic load",
            Zone::Caution => "Acute load rising faster than chronic load",
            Zone::Danger => "Load spike, elevated injury risk",
            Zone::Critical => "Severe load spike, very high injury risk",
        }
    }

    /// Get training recommendation
    pub fn recommendation(&self) -> &'static str {
        match self {
            Zone::Insufficient => "Keep logging workouts to unlock a risk estimate",
            Zone::Undertraining => "Increase training volume gradually",
            Zone::Optimal => "Continue current training progression",
            Zone::Caution => "Monitor fatigue and avoid further load increases",
            Zone::Danger => "Reduce volume and intensity this week",
            Zone::Critical => "Prioritize rest and recovery before resuming training",
        }
    }

    /// True for zones that warrant attention from a coach
    pub fn is_elevated(&self) -> bool {
        matches!(self, Zone::Caution | Zone::Danger | Zone::Critical)
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Zone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        Zone::ALL
            .iter()
            .copied()
            .find(|zone| zone.as_str() == name)
            .ok_or_else(|| format!("Invalid zone: {}", s))
    }
}

/// Current acute:chronic snapshot for one athlete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcwrResult {
    /// Ratio rounded to 2 decimals, `None` when there is not enough data
    pub acwr: Option<f64>,

    /// Acute (7-day) EWMA load, rounded to 1 decimal
    pub acute_load: f64,

    /// Chronic EWMA load over the full window, rounded to 1 decimal
    pub chronic_load: f64,

    /// Risk zone of `acwr`
    pub zone: Zone,

    /// Number of days in the window with non-zero load
    pub days_with_data: usize,
}

impl AcwrResult {
    /// Result for a window that does not meet the minimum-data guard
    pub fn insufficient(days_with_data: usize) -> Self {
        Self {
            acwr: None,
            acute_load: 0.0,
            chronic_load: 0.0,
            zone: Zone::Insufficient,
            days_with_data,
        }
    }
}

/// One point of the historical ratio trend
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AcwrHistoryPoint {
    pub date: NaiveDate,
    pub acwr: f64,
}

/// Daily load pair for the short raw-load trend
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub load: f64,
}

/// Roster summary row for one athlete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Canonical miles over the trailing week
    pub weekly_miles: f64,

    /// Ratio rounded to 2 decimals, `None` when there is not enough data
    pub acwr: Option<f64>,

    pub zone: Zone,
}

impl Default for RosterEntry {
    fn default() -> Self {
        Self {
            weekly_miles: 0.0,
            acwr: None,
            zone: Zone::Insufficient,
        }
    }
}
