use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use pickd::test_utils::{grid_points, palette_weights, random_colors, seeded_rng};
use pickd::{QueryRegion, RangeTree, RectangularSearchTree};

const SIZES: [usize; 2] = [1_000, 10_000];
const SAMPLES_PER_LOOP: usize = 1_000;

pub fn sample(c: &mut Criterion) {
    let mut group = c.benchmark_group("Sample");
    group.throughput(Throughput::Elements(SAMPLES_PER_LOOP as u64));

    for &size in &SIZES {
        let mut rng = seeded_rng(size as u64);
        let points = grid_points::<2, _>(size, 1_000, &mut rng);
        let colors = random_colors(size, &mut rng);
        let weights = palette_weights();

        let tree: RangeTree<f64, u32, 2> =
            RangeTree::build(&points, &colors, &weights, &mut rng).unwrap();

        let region = QueryRegion::new([100.0, 100.0], [700.0, 700.0]);
        let set = tree.canonical_set(&region);

        group.bench_with_input(BenchmarkId::new("independent", size), &size, |b, _| {
            b.iter(|| {
                for _ in 0..SAMPLES_PER_LOOP {
                    std::hint::black_box(tree.sample_independent(&set, &mut rng));
                }
            })
        });

        group.bench_with_input(BenchmarkId::new("consistent", size), &size, |b, _| {
            b.iter(|| {
                for _ in 0..SAMPLES_PER_LOOP {
                    std::hint::black_box(tree.sample_consistent(&set));
                }
            })
        });
    }

    // the rectangular tree's pair matrix makes large builds expensive, so
    // bench its query path at the small size only
    {
        let size = 1_000;
        let mut rng = seeded_rng(77);
        let points = grid_points::<2, _>(size, 1_000, &mut rng);
        let colors = random_colors(size, &mut rng);
        let weights = palette_weights();
        let rect: RectangularSearchTree<f64, u32> =
            RectangularSearchTree::build(&points, &colors, &weights).unwrap();
        let region = QueryRegion::new([100.0, 100.0], [700.0, 700.0]);

        group.bench_with_input(BenchmarkId::new("rectangular", size), &size, |b, _| {
            b.iter(|| {
                for _ in 0..SAMPLES_PER_LOOP {
                    std::hint::black_box(rect.query_sample(&region, &mut rng));
                }
            })
        });
    }

    group.finish();
}

criterion_group!(benches, sample);
criterion_main!(benches);
