//! Traits that coordinate scalars and leaf payloads must implement.

use std::cmp::Ordering;
use std::fmt::Debug;

use num_traits::Float;
use ordered_float::OrderedFloat;
use rand::Rng;

/// Axis trait represents the traits that must be implemented
/// by the type used for point coordinates and weights. This will be
/// [`f64`] or [`f32`].
pub trait Axis: Float + Default + Debug + Copy + Sync + Send {
    /// Draws a uniform value in `[0, 1)` of this type, used as the base of
    /// the exponential sampling keys.
    fn unit_uniform<R: Rng + ?Sized>(rng: &mut R) -> Self;

    /// Total ordering used when comparing sampling keys and coordinates.
    fn total_order(self, other: Self) -> Ordering;
}

impl Axis for f64 {
    #[inline]
    fn unit_uniform<R: Rng + ?Sized>(rng: &mut R) -> Self {
        rng.random()
    }

    #[inline]
    fn total_order(self, other: Self) -> Ordering {
        OrderedFloat(self).cmp(&OrderedFloat(other))
    }
}

impl Axis for f32 {
    #[inline]
    fn unit_uniform<R: Rng + ?Sized>(rng: &mut R) -> Self {
        rng.random()
    }

    #[inline]
    fn total_order(self, other: Self) -> Ordering {
        OrderedFloat(self).cmp(&OrderedFloat(other))
    }
}

/// Content trait for the caller-side item stored in each leaf. Construction
/// enumerates the input slice, so items are the indices of the supplied
/// points, cast into `T`.
pub trait Content: Copy + Default + PartialEq + Ord + Debug {}
impl<T: Copy + Default + PartialEq + Ord + Debug> Content for T {}
