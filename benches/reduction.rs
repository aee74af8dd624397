use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mite::algebra::DistanceMatrix;
use mite::map::{IntensityMap, MapBuilder, MapKind, MapShape};
use mite::reduce::{ReductionConfig, ReductionRule, Window, WindowedReducer, DEFAULT_MAX_CELLS};

/// Deterministic sparse presence map on a full-resolution LC-MS grid
fn create_map(name: &str, shape: MapShape, features: usize, seed: usize) -> IntensityMap {
    let mut builder = MapBuilder::new(shape, MapKind::Binary).with_name(name);
    builder.reserve(features);
    for i in 0..features {
        let row = (i * 7919 + seed * 104_729) % shape.rows;
        let col = (i * 15_485_863 + seed * 31) % shape.cols;
        builder.push(row, col, 1.0).unwrap();
    }
    builder.build()
}

/// Benchmark reducing one map down to the NEXUS cell budget
fn bench_reduce_to_budget(c: &mut Criterion) {
    let mut group = c.benchmark_group("reduce_to_budget");
    let shape = MapShape::new(5001, 120_001);

    for features in [1_000, 10_000, 50_000] {
        group.throughput(Throughput::Elements(features as u64));
        let map = create_map("bench", shape, features, 1);
        let reducer = WindowedReducer::new(
            ReductionConfig::new(Window::new(4, 2), ReductionRule::threshold(0.25))
                .with_max_cells(Some(DEFAULT_MAX_CELLS)),
        )
        .unwrap();

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}features", features)),
            &map,
            |b, map| {
                b.iter(|| black_box(reducer.reduce(map).unwrap()));
            },
        );
    }

    group.finish();
}

/// Benchmark the all-pairs distance matrix
fn bench_distance_matrix(c: &mut Criterion) {
    let mut group = c.benchmark_group("distance_matrix");
    let shape = MapShape::new(500, 12_000);

    for samples in [4, 8, 16] {
        let maps: Vec<IntensityMap> = (0..samples)
            .map(|s| create_map(&format!("s{s}"), shape, 5_000, s))
            .collect();
        group.throughput(Throughput::Elements((samples * (samples - 1) / 2) as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}samples", samples)),
            &maps,
            |b, maps| {
                b.iter(|| black_box(DistanceMatrix::compute(maps)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_reduce_to_budget, bench_distance_matrix);
criterion_main!(benches);
