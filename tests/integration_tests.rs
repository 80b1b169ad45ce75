use chrono::{Days, NaiveDate};
use loadrisk::source::{DateRange, FileLogSource, InMemoryLogSource, LogSource, MergedLogSource};
use loadrisk::{
    aggregate, compute_acwr, compute_for_roster, AppConfig, DistanceUnit, EngineConfig,
    LoadRiskError, RiskEngine, SourceError, WorkoutLogSample, Zone,
};
use std::collections::HashMap;
use std::io::Write;

/// Integration tests that exercise the complete risk workflows

#[cfg(test)]
mod integration_tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 30).unwrap()
    }

    fn days_ago(back: u64) -> NaiveDate {
        today() - Days::new(back)
    }

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    /// Ten hard days at the start of the window, then 25 rest days
    fn dense_then_silent(athlete: &str) -> Vec<WorkoutLogSample> {
        (25..35)
            .map(|back| WorkoutLogSample::new(athlete, days_ago(back), 5.0).with_effort(8))
            .collect()
    }

    fn constant_load(athlete: &str, days: u64) -> Vec<WorkoutLogSample> {
        (0..days)
            .map(|back| WorkoutLogSample::new(athlete, days_ago(back), 4.0).with_effort(6))
            .collect()
    }

    /// Test the dense-then-silent scenario end to end
    #[test]
    fn test_dense_then_silent_is_undertraining() {
        let series = aggregate(&dense_then_silent("a1"), 35, today());
        assert_eq!(series.len(), 35);
        assert_eq!(series.days()[0].load, 40.0);

        let result = compute_acwr(&series);
        assert_eq!(result.days_with_data, 10);
        assert_eq!(result.acute_load, 0.0);
        assert_eq!(result.acwr, Some(0.0));
        assert_eq!(result.zone, Zone::Undertraining);
        assert!(result.chronic_load > 0.0);
    }

    /// Test that a steady load lands in the optimal zone
    #[test]
    fn test_constant_load_is_optimal() {
        let engine = RiskEngine::new(InMemoryLogSource::new(constant_load("a1", 35)));
        let result = engine.current_acwr("a1", today()).unwrap();

        assert_eq!(result.acwr, Some(1.0));
        assert_eq!(result.zone, Zone::Optimal);
        assert_eq!(result.acute_load, 24.0);
        assert_eq!(result.chronic_load, 24.0);
        assert_eq!(result.days_with_data, 35);
    }

    /// Test that miles and kilometres are normalized before summing
    #[test]
    fn test_mixed_units_same_day() {
        let mut samples = constant_load("a1", 35);
        samples.retain(|s| s.date != today());
        samples.push(WorkoutLogSample::new("a1", today(), 5.0).with_effort(5));
        samples.push(
            WorkoutLogSample::new("a1", today(), 8.0)
                .with_unit(DistanceUnit::Km)
                .with_effort(5),
        );

        let series = aggregate(&samples, 35, today());
        let last = series.days()[34];

        assert!((last.miles - 9.970968).abs() < 1e-6);
        assert_eq!(loadrisk::acwr::round_dp(last.miles, 2), 9.97);
        assert!((last.load - 5.0 * 9.970968).abs() < 1e-5);
    }

    /// Test that samples outside the window never reach the series
    #[test]
    fn test_old_samples_do_not_count() {
        let samples: Vec<_> = (35..60)
            .map(|back| WorkoutLogSample::new("a1", days_ago(back), 10.0))
            .collect();

        let engine = RiskEngine::new(InMemoryLogSource::new(samples));
        let result = engine.current_acwr("a1", today()).unwrap();

        assert_eq!(result.days_with_data, 0);
        assert_eq!(result.acwr, None);
        assert_eq!(result.zone, Zone::Insufficient);
    }

    /// Test that the roster has one key per requested athlete
    #[test]
    fn test_roster_keys_match_requested_ids() {
        let mut logs = HashMap::new();
        logs.insert("steady".to_string(), constant_load("steady", 35));
        logs.insert("spike".to_string(), dense_then_silent("spike"));
        logs.insert("unasked".to_string(), constant_load("unasked", 35));

        let requested = ids(&["steady", "spike", "empty"]);
        let roster = compute_for_roster(&requested, &logs, today(), &EngineConfig::default());

        assert_eq!(roster.len(), 3);
        assert!(!roster.contains_key("unasked"));

        let empty = &roster["empty"];
        assert_eq!(empty.weekly_miles, 0.0);
        assert_eq!(empty.acwr, None);
        assert_eq!(empty.zone, Zone::Insufficient);

        assert_eq!(roster["steady"].weekly_miles, 28.0);
        assert_eq!(roster["steady"].zone, Zone::Optimal);
        assert_eq!(roster["spike"].weekly_miles, 0.0);
        assert_eq!(roster["spike"].zone, Zone::Undertraining);
    }

    /// Test that a roster entry matches the single-athlete query
    #[test]
    fn test_roster_matches_single_athlete_query() {
        let mut samples = constant_load("a", 35);
        samples.extend(dense_then_silent("b"));
        samples.push(WorkoutLogSample::new("b", today(), 12.0).with_effort(9));
        let engine = RiskEngine::new(InMemoryLogSource::new(samples));

        let summary = engine.roster_summary(&ids(&["a", "b"]), today()).unwrap();

        for id in ["a", "b"] {
            let single = engine.current_acwr(id, today()).unwrap();
            let entry = summary.get(id).unwrap();
            assert_eq!(entry.acwr, single.acwr);
            assert_eq!(entry.zone, single.zone);
        }
        assert_eq!(summary.anchor, today());
    }

    /// Test that a sudden spike is reported as elevated risk
    #[test]
    fn test_spike_is_elevated() {
        let mut samples: Vec<_> = (7..35)
            .map(|back| WorkoutLogSample::new("a1", days_ago(back), 2.0).with_effort(4))
            .collect();
        samples.extend(
            (0..7).map(|back| WorkoutLogSample::new("a1", days_ago(back), 10.0).with_effort(9)),
        );

        let engine = RiskEngine::new(InMemoryLogSource::new(samples));
        let summary = engine.roster_summary(&ids(&["a1"]), today()).unwrap();

        let entry = summary.get("a1").unwrap();
        assert!(entry.zone.is_elevated());
        assert!(entry.acwr.unwrap() > 1.5);
        assert_eq!(summary.elevated(), vec!["a1"]);
    }

    /// Test the history query over a full window
    #[test]
    fn test_history_workflow() {
        let engine = RiskEngine::new(InMemoryLogSource::new(constant_load("a1", 35)));
        let history = engine.acwr_history("a1", today()).unwrap();

        assert_eq!(history.points.len(), 8);
        assert_eq!(history.points.first().unwrap().date, days_ago(7));
        assert_eq!(history.points.last().unwrap().date, today());
        assert!(history.points.iter().all(|p| p.acwr == 1.0));

        assert_eq!(history.raw_trend.len(), 14);
        assert_eq!(history.raw_trend[0].date, days_ago(13));
        assert!(history.raw_trend.iter().all(|p| p.load == 24.0));
    }

    /// Test that history skips days before any chronic load exists
    #[test]
    fn test_history_skips_zero_chronic_days() {
        let samples: Vec<_> = (0..3)
            .map(|back| WorkoutLogSample::new("a1", days_ago(back), 3.0))
            .collect();
        let engine = RiskEngine::new(InMemoryLogSource::new(samples));

        let history = engine.acwr_history("a1", today()).unwrap();
        assert_eq!(history.points.len(), 3);
        assert_eq!(history.points[0].date, days_ago(2));
    }

    /// Test the CSV file source through the engine, merged with personal logs
    #[test]
    fn test_file_sources_merged() {
        let mut scheduled = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(scheduled, "athlete_id,date,distance_value,distance_unit,effort_level").unwrap();
        for back in 0..35u64 {
            writeln!(scheduled, "a1,{},3,mile,6", days_ago(back)).unwrap();
        }
        writeln!(scheduled, "a2,{},10,km,", today()).unwrap();
        scheduled.flush().unwrap();

        let personal_logs = vec![WorkoutLogSample::new("a1", today(), 1.0).with_effort(6)];
        let mut personal = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(personal, "{}", serde_json::to_string(&personal_logs).unwrap()).unwrap();
        personal.flush().unwrap();

        let scheduled = FileLogSource::open(scheduled.path()).unwrap();
        assert_eq!(scheduled.athlete_ids(), ids(&["a1", "a2"]));

        let merged = MergedLogSource::new(scheduled, FileLogSource::open(personal.path()).unwrap());
        let logs = merged
            .fetch_logs(&ids(&["a1"]), &DateRange::trailing(today(), 35))
            .unwrap();
        assert_eq!(logs.len(), 36);

        let engine = RiskEngine::new(merged);
        let history = engine.acwr_history("a1", today()).unwrap();
        assert_eq!(history.raw_trend.last().unwrap().load, 24.0);

        let summary = engine.roster_summary(&ids(&["a1", "a2"]), today()).unwrap();
        assert_eq!(summary.get("a1").unwrap().weekly_miles, 22.0);
        assert_eq!(summary.get("a2").unwrap().zone, Zone::Insufficient);
    }

    /// Test that storage failures surface as data-unavailable errors
    #[test]
    fn test_missing_file_is_reported() {
        let err = FileLogSource::open("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, SourceError::FileNotFound { .. }));

        let err: LoadRiskError = err.into();
        assert!(matches!(err, LoadRiskError::DataUnavailable(_)));
        assert!(err.user_message().contains("not/here.csv"));
    }

    /// Test that a malformed row fails the whole fetch
    #[test]
    fn test_malformed_csv_row() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "athlete_id,date,distance_value").unwrap();
        writeln!(file, "a1,2024-09-30,5").unwrap();
        writeln!(file, "a1,not-a-date,5").unwrap();
        file.flush().unwrap();

        let err = FileLogSource::open(file.path()).unwrap_err();
        assert!(matches!(err, SourceError::InvalidRecord { line: 3, .. }));
    }

    /// Test engine configuration loaded from a TOML file
    #[test]
    fn test_config_file_drives_engine() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[engine]\nmin_data_days = 3\n\n[logging]\nlevel = \"debug\"\n",
        )
        .unwrap();

        let config = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(config.engine.min_data_days, 3);
        assert_eq!(config.engine.window_days, 35);

        let samples: Vec<_> = (0..3)
            .map(|back| WorkoutLogSample::new("a1", days_ago(back), 3.0))
            .collect();
        let engine =
            RiskEngine::with_config(InMemoryLogSource::new(samples), config.engine).unwrap();
        let result = engine.current_acwr("a1", today()).unwrap();

        assert_ne!(result.zone, Zone::Insufficient);
        assert!(result.acwr.is_some());
    }
}
