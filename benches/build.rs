use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use pickd::test_utils::{grid_points, palette_weights, random_colors, seeded_rng};
use pickd::{KdTree, RangeTree};

const SIZES: [usize; 3] = [1_000, 10_000, 100_000];

pub fn build(c: &mut Criterion) {
    let mut group = c.benchmark_group("Build");

    for &size in &SIZES {
        let mut rng = seeded_rng(size as u64);
        let points = grid_points::<2, _>(size, 1_000, &mut rng);
        let colors = random_colors(size, &mut rng);
        let weights = palette_weights();

        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("range 2D", size), &size, |b, _| {
            b.iter(|| {
                RangeTree::<f64, u32, 2>::build(&points, &colors, &weights, &mut rng).unwrap()
            })
        });

        group.bench_with_input(BenchmarkId::new("kd 2D", size), &size, |b, _| {
            b.iter(|| KdTree::<f64, u32, 2>::build(&points, &colors, &weights, &mut rng).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, build);
criterion_main!(benches);
