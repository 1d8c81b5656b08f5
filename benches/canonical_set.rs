use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;

use pickd::test_utils::{grid_points, palette_weights, random_colors, seeded_rng};
use pickd::{KdTree, QueryRegion, RangeTree};

const SIZES: [usize; 3] = [1_000, 10_000, 100_000];
const QUERIES_PER_LOOP: usize = 100;

fn random_regions(n: usize, cells: i64, rng: &mut impl Rng) -> Vec<QueryRegion<f64, 2>> {
    (0..n)
        .map(|_| {
            let min = [
                rng.random_range(0..cells) as f64,
                rng.random_range(0..cells) as f64,
            ];
            let max = [
                rng.random_range(min[0] as i64..=cells) as f64,
                rng.random_range(min[1] as i64..=cells) as f64,
            ];
            QueryRegion::new(min, max)
        })
        .collect()
}

pub fn canonical_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("Canonical Set 2D");

    for &size in &SIZES {
        let mut rng = seeded_rng(size as u64);
        let points = grid_points::<2, _>(size, 1_000, &mut rng);
        let colors = random_colors(size, &mut rng);
        let weights = palette_weights();
        let regions = random_regions(QUERIES_PER_LOOP, 1_000, &mut rng);

        let range_tree: RangeTree<f64, u32, 2> =
            RangeTree::build(&points, &colors, &weights, &mut rng).unwrap();
        let kd_tree: KdTree<f64, u32, 2> =
            KdTree::build(&points, &colors, &weights, &mut rng).unwrap();

        group.bench_with_input(BenchmarkId::new("range", size), &size, |b, _| {
            b.iter(|| {
                for region in &regions {
                    std::hint::black_box(range_tree.canonical_set(region));
                }
            })
        });

        group.bench_with_input(BenchmarkId::new("kd", size), &size, |b, _| {
            b.iter(|| {
                for region in &regions {
                    std::hint::black_box(kd_tree.canonical_set(region));
                }
            })
        });
    }

    group.finish();
}

criterion_group!(benches, canonical_set);
criterion_main!(benches);
