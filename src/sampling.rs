//! Weighted samplers over canonical sets.
//!
//! Both samplers ride on the exponential order-statistic trick: drawing
//! `key = U^(1/w)` with `U ~ Uniform[0,1)` per candidate and taking the
//! argmax selects a candidate with probability exactly `w / Σw`. Because an
//! internal node's weight is the sum of its leaves' weights, the selection
//! composes: pick a canonical node first, then walk down redrawing keys for
//! the two children at each level, and the leaf reached is distributed
//! proportionally to its weight over the whole region.
//!
//! The *consistent* sampler uses the same keys but draws them once at
//! construction time; every internal node caches the larger child key and a
//! pointer to the leaf achieving it, so repeated queries over the same
//! canonical set deterministically return the same leaf.

use std::cmp::Ordering;

use rand::Rng;

use crate::types::{Axis, Content};

/// Draws the exponential order-statistic key `U^(1/weight)` for one
/// candidate. Weights that are not strictly positive get a zero key, so a
/// candidate whose effective weight was adjusted down to zero is never
/// preferred over a weighted one.
#[inline]
pub(crate) fn exp_key<A: Axis, R: Rng + ?Sized>(weight: A, rng: &mut R) -> A {
    if weight > A::zero() {
        A::unit_uniform(rng).powf(weight.recip())
    } else {
        A::zero()
    }
}

/// Arena access the samplers need; implemented by both tree families.
pub(crate) trait SampleNodes<A: Axis, T: Content> {
    fn weight(&self, node: u32) -> A;
    fn static_key(&self, node: u32) -> A;
    /// `None` for leaves.
    fn children(&self, node: u32) -> Option<(u32, u32)>;
    fn max_leaf(&self, node: u32) -> u32;
    fn item(&self, node: u32) -> T;
}

/// Independent mode: fresh randomness on every call.
pub(crate) fn sample_independent<A, T, S, R>(tree: &S, canonical: &[u32], rng: &mut R) -> Option<T>
where
    A: Axis,
    T: Content,
    S: SampleNodes<A, T>,
    R: Rng + ?Sized,
{
    let mut candidates = canonical.iter().copied();
    let mut best = candidates.next()?;
    let mut best_key = exp_key(tree.weight(best), rng);
    for c in candidates {
        let key = exp_key(tree.weight(c), rng);
        if key.total_order(best_key) == Ordering::Greater {
            best = c;
            best_key = key;
        }
    }

    let mut v = best;
    while let Some((left, right)) = tree.children(v) {
        let left_key = exp_key(tree.weight(left), rng);
        let right_key = exp_key(tree.weight(right), rng);
        v = if right_key.total_order(left_key) == Ordering::Greater {
            right
        } else {
            left
        };
    }
    Some(tree.item(v))
}

/// Consistent mode: keys fixed at construction, same canonical set in,
/// same leaf out.
pub(crate) fn sample_consistent<A, T, S>(tree: &S, canonical: &[u32]) -> Option<T>
where
    A: Axis,
    T: Content,
    S: SampleNodes<A, T>,
{
    let mut candidates = canonical.iter().copied();
    let mut best = candidates.next()?;
    for c in candidates {
        if tree
            .static_key(c)
            .total_order(tree.static_key(best))
            == Ordering::Greater
        {
            best = c;
        }
    }
    Some(tree.item(tree.max_leaf(best)))
}
