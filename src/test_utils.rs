//! Fixture helpers shared by the integration tests and benches.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::colors::ColorWeights;

/// The colors used by the distribution fixtures, with weights 1 / 3 / 6.
pub const PALETTE: [&str; 3] = ["red", "blue", "yellow"];

/// A reproducible RNG for fixtures and consistent-mode trees.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// The weight table for [`PALETTE`]: red 1, blue 3, yellow 6.
pub fn palette_weights() -> ColorWeights<&'static str, f64> {
    ColorWeights::from_pairs([("red", 1.0), ("blue", 3.0), ("yellow", 6.0)]).unwrap()
}

/// `n` points on an integer grid, as floats, so duplicate coordinates and
/// exact boundary hits occur.
pub fn grid_points<const K: usize, R: Rng>(n: usize, cells: i64, rng: &mut R) -> Vec<[f64; K]> {
    (0..n)
        .map(|_| std::array::from_fn(|_| rng.random_range(0..cells) as f64))
        .collect()
}

/// `n` colors drawn uniformly from [`PALETTE`].
pub fn random_colors<R: Rng>(n: usize, rng: &mut R) -> Vec<&'static str> {
    (0..n).map(|_| PALETTE[rng.random_range(0..3)]).collect()
}
