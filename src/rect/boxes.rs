//! Skyline (maximal-empty-orthant) decomposition of one color's points.
//!
//! A 3-sided query over one side of the split node asks: does this color
//! have a point with `x ∈ [qa, qb]` and `ŷ ≥ qc`? (`ŷ` is the point's `y`
//! for the lower side and `-y` for the upper side, so both sides share one
//! form.) Each point satisfies the queries in an orthant of the parameter
//! space `(qa, qb, qc)`, and the color's satisfiable set is the union of
//! those orthants. This module partitions that union into `O(m)` pairwise
//! disjoint boxes, so any query triple stabs **at most one box per color**.
//! That disjointness is what lets canonical-node weights over boxes double
//! as one-weight-per-color totals.
//!
//! The decomposition is the staircase structure of the point set: one box
//! per strict prefix maximum (the skyline points) and one per visible pair
//! (two points with only lower points between them), enumerated with a
//! monotonic stack in one pass over the `x`-sorted points.

use std::cmp::Ordering;

use crate::colors::ColorId;
use crate::types::{Axis, Content};

/// One disjoint box of a color's 3-sided footprint.
///
/// A query triple `(qa, qb, qc)` stabs the box iff
/// `x_open < qa <= x_anchor <= qb` and `y_open < qc <= y_close`.
/// Lower bounds are open so that a query sitting exactly on a shared
/// boundary is claimed by exactly one box.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ColorBox<A, T> {
    pub x_open: A,
    pub x_anchor: A,
    pub y_open: A,
    pub y_close: A,
    pub color: ColorId,
    pub weight: A,
    /// Item and original coordinates of the representative point; it lies
    /// inside every rectangle whose 3-sided query stabs this box.
    pub item: T,
    pub point: [A; 2],
}

impl<A: Axis, T: Content> ColorBox<A, T> {
    #[inline]
    pub fn stabs(&self, qa: A, qb: A, qc: A) -> bool {
        self.x_open < qa
            && qa <= self.x_anchor
            && self.x_anchor <= qb
            && self.y_open < qc
            && qc <= self.y_close
    }

    /// The four bound coordinates, in the axis order the aux tree cycles
    /// through.
    #[inline]
    pub fn coord(&self, axis: usize) -> A {
        match axis {
            0 => self.x_open,
            1 => self.x_anchor,
            2 => self.y_open,
            _ => self.y_close,
        }
    }
}

/// Decomposes one color's projected points `(x, ŷ, item, original)` into
/// disjoint boxes, appending to `out`.
pub(crate) fn skyline_boxes<A, T>(
    points: &mut Vec<(A, A, T, [A; 2])>,
    color: ColorId,
    weight: A,
    out: &mut Vec<ColorBox<A, T>>,
) where
    A: Axis,
    T: Content,
{
    // x ascending; on equal x only the highest ŷ matters
    points.sort_unstable_by(|a, b| a.0.total_order(b.0).then(b.1.total_order(a.1)));
    points.dedup_by(|b, a| b.0.total_order(a.0) == Ordering::Equal);

    let mut emit = |x_open: A, x_anchor: A, y_open: A, y_close: A, item: T, point: [A; 2]| {
        if y_open.total_order(y_close) == Ordering::Less {
            out.push(ColorBox {
                x_open,
                x_anchor,
                y_open,
                y_close,
                color,
                weight,
                item,
                point,
            });
        }
    };

    let mut stack: Vec<usize> = Vec::new();
    for j in 0..points.len() {
        let (xj, yj, item, orig) = points[j];

        // `below` tracks the highest ŷ strictly between the stack top and j
        let mut below = A::neg_infinity();
        while let Some(&t) = stack.last() {
            let (xt, yt, ..) = points[t];
            if yt.total_order(yj) == Ordering::Less {
                emit(xt, xj, below, yt, item, orig);
                below = yt;
                stack.pop();
            } else {
                emit(xt, xj, below, yj, item, orig);
                break;
            }
        }
        if stack.is_empty() {
            // j is a strict prefix maximum: its box is unbounded on the left
            emit(A::neg_infinity(), xj, below, yj, item, orig);
        }
        stack.push(j);
    }
}

#[cfg(test)]
mod tests {
    use super::{skyline_boxes, ColorBox};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// The color's 3-sided predicate, straight from its definition.
    fn predicate(points: &[(f64, f64)], qa: f64, qb: f64, qc: f64) -> bool {
        points
            .iter()
            .any(|&(x, y)| qa <= x && x <= qb && y >= qc)
    }

    fn stab_count(boxes: &[ColorBox<f64, u32>], qa: f64, qb: f64, qc: f64) -> usize {
        boxes.iter().filter(|b| b.stabs(qa, qb, qc)).count()
    }

    #[test]
    fn every_query_stabs_exactly_one_box_iff_satisfiable() {
        let mut rng = StdRng::seed_from_u64(301);
        for _ in 0..50 {
            let m = rng.random_range(1..15);
            let raw: Vec<(f64, f64)> = (0..m)
                .map(|_| {
                    (
                        rng.random_range(0..10) as f64,
                        rng.random_range(0..10) as f64,
                    )
                })
                .collect();

            let mut projected: Vec<(f64, f64, u32, [f64; 2])> = raw
                .iter()
                .enumerate()
                .map(|(idx, &(x, y))| (x, y, idx as u32, [x, y]))
                .collect();
            let mut boxes = Vec::new();
            skyline_boxes(&mut projected, 0, 1.0, &mut boxes);

            // grid sweep over query parameters, including exact point values
            for qa10 in -2..22 {
                let qa = f64::from(qa10) / 2.0;
                for qb10 in qa10..22 {
                    let qb = f64::from(qb10) / 2.0;
                    for qc10 in -2..22 {
                        let qc = f64::from(qc10) / 2.0;
                        let expected = usize::from(predicate(&raw, qa, qb, qc));
                        assert_eq!(
                            stab_count(&boxes, qa, qb, qc),
                            expected,
                            "qa={qa} qb={qb} qc={qc} points={raw:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn representative_point_witnesses_the_query() {
        let mut rng = StdRng::seed_from_u64(302);
        for _ in 0..50 {
            let m = rng.random_range(1..15);
            let raw: Vec<(f64, f64)> = (0..m)
                .map(|_| {
                    (
                        rng.random_range(0..10) as f64,
                        rng.random_range(0..10) as f64,
                    )
                })
                .collect();

            let mut projected: Vec<(f64, f64, u32, [f64; 2])> = raw
                .iter()
                .enumerate()
                .map(|(idx, &(x, y))| (x, y, idx as u32, [x, y]))
                .collect();
            let mut boxes = Vec::new();
            skyline_boxes(&mut projected, 0, 1.0, &mut boxes);

            for qa in 0..10 {
                for qb in qa..10 {
                    for qc in 0..10 {
                        let (qa, qb, qc) = (qa as f64, qb as f64, qc as f64);
                        for b in boxes.iter().filter(|b| b.stabs(qa, qb, qc)) {
                            assert!(qa <= b.point[0] && b.point[0] <= qb);
                            assert!(b.point[1] >= qc);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn box_count_is_linear_in_points() {
        let mut rng = StdRng::seed_from_u64(303);
        let m: u32 = 200;
        let mut projected: Vec<(f64, f64, u32, [f64; 2])> = (0..m)
            .map(|idx| {
                let x = rng.random_range(0.0..1000.0);
                let y = rng.random_range(0.0..1000.0);
                (x, y, idx, [x, y])
            })
            .collect();
        let mut boxes = Vec::new();
        skyline_boxes(&mut projected, 0, 1.0, &mut boxes);

        // one box per prefix maximum plus at most two per point from the
        // stack sweep
        assert!(boxes.len() <= 3 * m as usize);
    }
}
