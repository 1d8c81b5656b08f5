//! Build-time entry buffer shared by the tree builders.
//!
//! Construction works arena-style: the input is copied once into an owned
//! buffer of entries, and the recursive median splits reorder subranges of
//! that buffer in place rather than allocating per level.

use std::cmp::Ordering;
use std::fmt::Debug;
use std::hash::Hash;

use az::{Az, Cast};

use crate::colors::{ColorId, ColorWeights};
use crate::errors::BuildError;
use crate::types::{Axis, Content};

#[derive(Debug, Clone, Copy)]
pub(crate) struct Entry<A, T, const K: usize> {
    pub point: [A; K],
    pub item: T,
    pub color: ColorId,
    pub weight: A,
}

/// Validates the parallel input slices and resolves colors to `(id, weight)`.
pub(crate) fn make_entries<A, T, C, const K: usize>(
    points: &[[A; K]],
    colors: &[C],
    weights: &ColorWeights<C, A>,
) -> Result<Vec<Entry<A, T, K>>, BuildError>
where
    A: Axis,
    T: Content,
    C: Eq + Hash + Clone + Debug,
    usize: Cast<T>,
{
    if points.is_empty() {
        return Err(BuildError::EmptyPoints);
    }
    if points.len() != colors.len() {
        return Err(BuildError::LengthMismatch {
            points: points.len(),
            colors: colors.len(),
        });
    }

    points
        .iter()
        .zip(colors)
        .enumerate()
        .map(|(idx, (point, color))| {
            let (color, weight) = weights
                .lookup(color)
                .ok_or_else(|| BuildError::UnknownColor(format!("{color:?}")))?;
            Ok(Entry {
                point: *point,
                item: idx.az::<T>(),
                color,
                weight,
            })
        })
        .collect()
}

/// Strict total order on entries for median selection at `axis`: the axis
/// value first, remaining axes cycled from it as tie-breakers. Guarantees
/// balanced splits even when many points share a coordinate.
#[inline]
pub(crate) fn axis_cmp<A: Axis, T, const K: usize>(
    a: &Entry<A, T, K>,
    b: &Entry<A, T, K>,
    axis: usize,
) -> Ordering {
    for i in 0..K {
        let d = (axis + i) % K;
        match a.point[d].total_order(b.point[d]) {
            Ordering::Equal => continue,
            ord => return ord,
        }
    }
    Ordering::Equal
}

/// Index of the lower median of a slice of `len` entries.
#[inline]
pub(crate) fn lower_median(len: usize) -> usize {
    (len - 1) / 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::ColorWeights;

    fn table() -> ColorWeights<&'static str, f64> {
        ColorWeights::from_pairs([("red", 1.0), ("blue", 3.0)]).unwrap()
    }

    #[test]
    fn rejects_empty_and_mismatched_input() {
        let weights = table();
        let empty: Vec<[f64; 2]> = vec![];
        assert_eq!(
            make_entries::<_, u32, _, 2>(&empty, &[], &weights).unwrap_err(),
            BuildError::EmptyPoints
        );

        let points = vec![[0.0, 0.0], [1.0, 1.0]];
        assert_eq!(
            make_entries::<_, u32, _, 2>(&points, &["red"], &weights).unwrap_err(),
            BuildError::LengthMismatch {
                points: 2,
                colors: 1
            }
        );
    }

    #[test]
    fn rejects_unknown_colors() {
        let weights = table();
        let points = vec![[0.0, 0.0]];
        assert!(matches!(
            make_entries::<_, u32, _, 2>(&points, &["green"], &weights),
            Err(BuildError::UnknownColor(_))
        ));
    }

    #[test]
    fn axis_cmp_breaks_ties_on_later_axes() {
        let weights = table();
        let points = vec![[1.0, 5.0], [1.0, 2.0]];
        let entries = make_entries::<_, u32, _, 2>(&points, &["red", "red"], &weights).unwrap();

        // equal on axis 0, so axis 1 decides
        assert_eq!(
            axis_cmp(&entries[0], &entries[1], 0),
            std::cmp::Ordering::Greater
        );
        assert_eq!(
            axis_cmp(&entries[1], &entries[0], 0),
            std::cmp::Ordering::Less
        );
    }

    #[test]
    fn lower_median_matches_convention() {
        assert_eq!(lower_median(1), 0);
        assert_eq!(lower_median(2), 0);
        assert_eq!(lower_median(3), 1);
        assert_eq!(lower_median(4), 1);
        assert_eq!(lower_median(5), 2);
    }
}
