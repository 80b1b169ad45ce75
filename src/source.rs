//! Workout log sources
//!
//! The engine never queries storage itself. It asks a [`LogSource`] for every
//! log with a distance, for a set of athletes and an inclusive date range.
//! Scheduled-workout logs and personal logs share one schema and are merged
//! with [`MergedLogSource`].

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::SourceError;
use crate::models::{lenient_distance_unit, DistanceUnit, WorkoutLogSample};

/// Inclusive range of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The `days` calendar days ending on `anchor`
    pub fn trailing(anchor: NaiveDate, days: usize) -> Self {
        let start = anchor
            .checked_sub_days(Days::new(days.saturating_sub(1) as u64))
            .unwrap_or(NaiveDate::MIN);
        Self { start, end: anchor }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Supplier of workout logs
pub trait LogSource: Send + Sync {
    /// Name used in logs and error messages
    fn source_name(&self) -> &str;

    /// All logs with a distance for `athlete_ids` dated within `range`
    fn fetch_logs(
        &self,
        athlete_ids: &[String],
        range: &DateRange,
    ) -> Result<Vec<WorkoutLogSample>, SourceError>;
}

impl<T: LogSource + ?Sized> LogSource for Box<T> {
    fn source_name(&self) -> &str {
        (**self).source_name()
    }

    fn fetch_logs(
        &self,
        athlete_ids: &[String],
        range: &DateRange,
    ) -> Result<Vec<WorkoutLogSample>, SourceError> {
        (**self).fetch_logs(athlete_ids, range)
    }
}

/// Log source over samples already held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryLogSource {
    name: String,
    samples: Vec<WorkoutLogSample>,
}

impl InMemoryLogSource {
    pub fn new(samples: Vec<WorkoutLogSample>) -> Self {
        Self::named("in-memory", samples)
    }

    pub fn named(name: impl Into<String>, samples: Vec<WorkoutLogSample>) -> Self {
        Self {
            name: name.into(),
            samples,
        }
    }

    pub fn samples(&self) -> &[WorkoutLogSample] {
        &self.samples
    }

    /// Distinct athlete ids present in the source, sorted
    pub fn athlete_ids(&self) -> Vec<String> {
        self.samples
            .iter()
            .map(|sample| sample.athlete_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl LogSource for InMemoryLogSource {
    fn source_name(&self) -> &str {
        &self.name
    }

    fn fetch_logs(
        &self,
        athlete_ids: &[String],
        range: &DateRange,
    ) -> Result<Vec<WorkoutLogSample>, SourceError> {
        let wanted: HashSet<&str> = athlete_ids.iter().map(String::as_str).collect();

        let logs: Vec<WorkoutLogSample> = self
            .samples
            .iter()
            .filter(|sample| wanted.contains(sample.athlete_id.as_str()))
            .filter(|sample| range.contains(sample.date))
            .filter(|sample| sample.distance_value.is_some())
            .cloned()
            .collect();

        debug!(
            source = %self.name,
            athletes = athlete_ids.len(),
            logs = logs.len(),
            "Fetched workout logs"
        );

        Ok(logs)
    }
}

/// Scheduled-workout logs and personal logs served as one source
#[derive(Debug, Clone)]
pub struct MergedLogSource<A, B> {
    scheduled: A,
    personal: B,
}

impl<A: LogSource, B: LogSource> MergedLogSource<A, B> {
    pub fn new(scheduled: A, personal: B) -> Self {
        Self {
            scheduled,
            personal,
        }
    }
}

impl<A: LogSource, B: LogSource> LogSource for MergedLogSource<A, B> {
    fn source_name(&self) -> &str {
        "merged"
    }

    fn fetch_logs(
        &self,
        athlete_ids: &[String],
        range: &DateRange,
    ) -> Result<Vec<WorkoutLogSample>, SourceError> {
        let mut logs = self.scheduled.fetch_logs(athlete_ids, range)?;
        logs.extend(self.personal.fetch_logs(athlete_ids, range)?);
        Ok(logs)
    }
}

/// Supported log file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFileFormat {
    Csv,
    Json,
}

impl LogFileFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(LogFileFormat::Csv),
            "json" => Ok(LogFileFormat::Json),
            other => Err(SourceError::UnsupportedFormat {
                format: if other.is_empty() {
                    "<none>".to_string()
                } else {
                    other.to_string()
                },
            }),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            LogFileFormat::Csv => "CSV",
            LogFileFormat::Json => "JSON",
        }
    }
}

/// A CSV row; column names accept a few common variations
#[derive(Debug, Deserialize)]
struct CsvLogRecord {
    #[serde(alias = "athlete", alias = "athleteId")]
    athlete_id: String,
    #[serde(alias = "workout_date", alias = "log_date")]
    date: NaiveDate,
    #[serde(default, alias = "distance")]
    distance_value: Option<f64>,
    #[serde(default, alias = "unit", deserialize_with = "lenient_distance_unit")]
    distance_unit: Option<DistanceUnit>,
    #[serde(default, alias = "effort", alias = "rpe")]
    effort_level: Option<i32>,
}

impl From<CsvLogRecord> for WorkoutLogSample {
    fn from(record: CsvLogRecord) -> Self {
        WorkoutLogSample {
            athlete_id: record.athlete_id,
            date: record.date,
            distance_value: record.distance_value,
            distance_unit: record.distance_unit,
            effort_level: record.effort_level,
        }
    }
}

/// Log source backed by a CSV or JSON file, read once at open
#[derive(Debug, Clone)]
pub struct FileLogSource {
    path: PathBuf,
    inner: InMemoryLogSource,
}

impl FileLogSource {
    /// Read all logs from `path`; the format follows the file extension
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(SourceError::FileNotFound { path });
        }

        let format = LogFileFormat::from_path(&path)?;
        let samples = match format {
            LogFileFormat::Csv => Self::read_csv(&path)?,
            LogFileFormat::Json => Self::read_json(&path)?,
        };

        info!(
            path = %path.display(),
            format = format.name(),
            logs = samples.len(),
            "Loaded workout log file"
        );

        let name = path.display().to_string();
        Ok(Self {
            path,
            inner: InMemoryLogSource::named(name, samples),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn samples(&self) -> &[WorkoutLogSample] {
        self.inner.samples()
    }

    /// Distinct athlete ids present in the file, sorted
    pub fn athlete_ids(&self) -> Vec<String> {
        self.inner.athlete_ids()
    }

    fn read_csv(path: &Path) -> Result<Vec<WorkoutLogSample>, SourceError> {
        let parse_error = |e: csv::Error| SourceError::Parse {
            format: "CSV".to_string(),
            reason: e.to_string(),
        };

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(parse_error)?;
        let headers = reader.headers().map_err(parse_error)?.clone();

        let mut samples = Vec::new();
        let mut record = csv::StringRecord::new();
        while reader.read_record(&mut record).map_err(parse_error)? {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let row: CsvLogRecord =
                record
                    .deserialize(Some(&headers))
                    .map_err(|e| SourceError::InvalidRecord {
                        line,
                        reason: e.to_string(),
                    })?;
            samples.push(row.into());
        }

        Ok(samples)
    }

    fn read_json(path: &Path) -> Result<Vec<WorkoutLogSample>, SourceError> {
        let file = File::open(path).map_err(|e| SourceError::Parse {
            format: "JSON".to_string(),
            reason: e.to_string(),
        })?;

        serde_json::from_reader(BufReader::new(file)).map_err(|e| SourceError::Parse {
            format: "JSON".to_string(),
            reason: e.to_string(),
        })
    }
}

impl LogSource for FileLogSource {
    fn source_name(&self) -> &str {
        self.inner.source_name()
    }

    fn fetch_logs(
        &self,
        athlete_ids: &[String],
        range: &DateRange,
    ) -> Result<Vec<WorkoutLogSample>, SourceError> {
        self.inner.fetch_logs(athlete_ids, range)
    }
}
