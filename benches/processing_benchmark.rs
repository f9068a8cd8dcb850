use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use us_aqi_processor::models::{Metric, Observation};
use us_aqi_processor::processors::{
    aggregate_by_date, aggregate_by_state, find_extrema, rank_states, DataCleaner,
};
use us_aqi_processor::readers::ObservationReader;
use us_aqi_processor::utils::constants::STATE_ABBREVIATIONS;

// Create test data for benchmarking
fn create_test_observations(days: usize) -> Vec<Observation> {
    let base_date = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
    let mut observations = Vec::with_capacity(days * STATE_ABBREVIATIONS.len());

    for day in 0..days {
        let date = base_date + chrono::Duration::days(day as i64);
        for (i, (name, _)) in STATE_ABBREVIATIONS.iter().enumerate() {
            let base = 10.0 + (i as f64) * 0.5 + (day % 30) as f64 * 0.1;
            observations.push(
                Observation::new(*name, date)
                    .with_value(Metric::No2Mean, Some(base))
                    .with_value(Metric::No2Aqi, Some(base * 2.0))
                    .with_value(Metric::O3Mean, Some(base / 1000.0))
                    .with_value(Metric::CoMean, (day % 7 != 0).then_some(base / 50.0)),
            );
        }
        observations.push(Observation::new("Country Of Mexico", date));
    }

    observations
}

fn create_test_csv(days: usize) -> String {
    let mut csv = String::from("State,Date Local,NO2 Mean,NO2 AQI,O3 Mean,SO2 Mean,CO Mean\n");
    for obs in create_test_observations(days) {
        csv.push_str(&format!(
            "{},{},{},{},{},,{}\n",
            obs.state,
            obs.date,
            obs.no2_mean.unwrap_or_default(),
            obs.no2_aqi.unwrap_or_default(),
            obs.o3_mean.unwrap_or_default(),
            obs.co_mean.map(|v| v.to_string()).unwrap_or_default(),
        ));
    }
    csv
}

fn benchmark_reader(c: &mut Criterion) {
    let csv = create_test_csv(365);
    let reader = ObservationReader::new();

    c.bench_function("read_observations_1y", |b| {
        b.iter(|| reader.read_from_bytes(black_box(csv.as_bytes()), None).unwrap())
    });
}

fn benchmark_cleaning(c: &mut Criterion) {
    let observations = create_test_observations(365);
    let cleaner = DataCleaner::new();

    c.bench_function("load_and_clean_1y", |b| {
        b.iter(|| cleaner.load_and_clean(black_box(observations.clone())).unwrap())
    });
}

fn benchmark_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregation");

    for days in [30, 365, 3650] {
        let cleaned = DataCleaner::new()
            .load_and_clean(create_test_observations(days))
            .unwrap();

        group.bench_with_input(BenchmarkId::new("by_state", days), &cleaned, |b, rows| {
            b.iter(|| aggregate_by_state(black_box(rows), Metric::No2Aqi))
        });

        group.bench_with_input(BenchmarkId::new("by_date", days), &cleaned, |b, rows| {
            b.iter(|| aggregate_by_date(black_box(rows), Metric::CoMean))
        });
    }

    group.finish();
}

fn benchmark_ranking(c: &mut Criterion) {
    let cleaned = DataCleaner::new()
        .load_and_clean(create_test_observations(365))
        .unwrap();
    let table = aggregate_by_state(&cleaned, Metric::No2Aqi);

    c.bench_function("extrema_and_rank", |b| {
        b.iter(|| {
            let extrema = find_extrema(black_box(&table)).unwrap();
            let ranking = rank_states(black_box(&table)).unwrap();
            (extrema, ranking)
        })
    });
}

criterion_group!(
    benches,
    benchmark_reader,
    benchmark_cleaning,
    benchmark_aggregation,
    benchmark_ranking
);
criterion_main!(benches);
