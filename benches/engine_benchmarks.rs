use chrono::{Days, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use loadrisk::{
    aggregate, build_history, compute_acwr, roster, DistanceUnit, EngineConfig, WorkoutLogSample,
};

/// Performance benchmarks for the load risk pipeline
///
/// Single-athlete work is bounded by the 35-day window; roster benchmarks
/// check that batch cost grows linearly with the number of athletes.

fn bench_single_athlete(c: &mut Criterion) {
    let today = anchor();
    let samples = create_athlete_logs("bench", 35, 2);

    let mut group = c.benchmark_group("Single Athlete");

    group.bench_function("aggregate", |b| {
        b.iter(|| aggregate(black_box(&samples), 35, today));
    });

    let series = aggregate(&samples, 35, today);

    group.bench_function("compute_acwr", |b| {
        b.iter(|| compute_acwr(black_box(&series)));
    });

    group.bench_function("build_history", |b| {
        b.iter(|| build_history(black_box(&series)));
    });

    group.finish();
}

fn bench_roster(c: &mut Criterion) {
    let today = anchor();
    let config = EngineConfig::default();

    let mut group = c.benchmark_group("Roster");

    for &size in &[10, 100, 1000] {
        let ids: Vec<String> = (0..size).map(|i| format!("athlete-{}", i)).collect();
        let samples: Vec<WorkoutLogSample> = ids
            .iter()
            .flat_map(|id| create_athlete_logs(id, 35, 1))
            .collect();
        let logs_by_athlete = roster::group_by_athlete(samples);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(
            BenchmarkId::new("compute_for_roster", size),
            &logs_by_athlete,
            |b, logs| {
                b.iter(|| roster::compute_for_roster(black_box(&ids), logs, today, &config));
            },
        );
    }

    group.finish();
}

fn anchor() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 30).unwrap()
}

/// `per_day` logs per day over `days` days, alternating units and efforts
fn create_athlete_logs(athlete: &str, days: u64, per_day: u64) -> Vec<WorkoutLogSample> {
    let today = anchor();

    (0..days)
        .flat_map(|back| (0..per_day).map(move |n| (back, n)))
        .map(|(back, n)| {
            let unit = if n % 2 == 0 {
                DistanceUnit::Mile
            } else {
                DistanceUnit::Km
            };

            WorkoutLogSample::new(athlete, today - Days::new(back), 3.0 + (back % 5) as f64)
                .with_unit(unit)
                .with_effort(4 + (back % 6) as i32)
        })
        .collect()
}

// Define benchmark groups
criterion_group!(benches, bench_single_athlete, bench_roster);

criterion_main!(benches);
