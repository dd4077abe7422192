use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use geocluster::prelude::*;

const BASE32: &[u8] = b"0123456789bcdefghjkmnpqrstuvwxyz";

fn dataset(n: usize) -> PointStore {
    let points = (0..n)
        .map(|i| {
            let lat = 40.0 + ((i % 1000) as f64 * 0.001);
            let lon = -74.0 + ((i / 1000) as f64 * 0.001);
            let mut record =
                PointRecord::new(format!("p{}", i), Category((i % 10) as i64 + 1), lat, lon);
            // Synthetic prefixes: neighbouring indices share cells at lower levels
            let mut prefix = String::from("dr");
            for level in GeohashPrecision::all() {
                if level.get() > 2 {
                    let shift = (9 - level.get()) as usize;
                    prefix.push(BASE32[(i >> shift) % BASE32.len()] as char);
                }
                record = record.with_geohash(level, prefix.clone());
            }
            record
        })
        .collect();
    PointStore::from_records(points).unwrap()
}

fn benchmark_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");
    let store = dataset(5_000);

    let half: CategorySet = [1, 3, 5, 7, 9].into_iter().collect();
    group.bench_function("half_of_categories", |b| {
        b.iter(|| filter_by_category(black_box(&store), black_box(&half)))
    });

    group.finish();
}

fn benchmark_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    let store = dataset(5_000);

    for level in [3, 5, 7, 9] {
        let precision = Precision::level(level).unwrap();
        group.bench_with_input(BenchmarkId::new("precision", level), &precision, |b, p| {
            b.iter(|| aggregate(black_box(&store), *p))
        });
    }

    group.finish();
}

fn benchmark_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    let session = SessionBuilder::new()
        .store(dataset(5_000))
        .config(Config::default().with_memoization(false))
        .selection(SelectionState::default().with_precision(Precision::level(5).unwrap()))
        .build()
        .unwrap();
    group.bench_function("grouped_uncached", |b| b.iter(|| session.render()));

    let cached = SessionBuilder::new()
        .store(dataset(5_000))
        .selection(SelectionState::default().with_precision(Precision::level(5).unwrap()))
        .build()
        .unwrap();
    group.bench_function("grouped_cached", |b| b.iter(|| cached.render()));

    let ungrouped = SessionBuilder::new().store(dataset(5_000)).build().unwrap();
    group.bench_function("ungrouped", |b| b.iter(|| ungrouped.render()));

    group.finish();
}

criterion_group!(
    benches,
    benchmark_filter,
    benchmark_aggregate,
    benchmark_render
);
criterion_main!(benches);
