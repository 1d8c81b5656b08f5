//! K-d tree construction and sampling entry points.

use std::cmp::Ordering;
use std::fmt::Debug;
use std::hash::Hash;

use az::{Az, Cast};
use rand::Rng;
#[cfg(feature = "tracing")]
use tracing::{event, Level};

use crate::canonical::CanonicalSet;
use crate::colors::ColorWeights;
use crate::entry::{axis_cmp, lower_median, make_entries, Entry};
use crate::errors::BuildError;
use crate::sampling::{self, exp_key, SampleNodes};
use crate::types::{Axis, Content};

#[derive(Debug, Clone)]
pub(crate) enum KdNode<A, T, const K: usize> {
    Leaf {
        point: [A; K],
        item: T,
        weight: A,
        key: A,
    },
    Internal {
        left: u32,
        right: u32,
        weight: A,
        key: A,
        max_leaf: u32,
        min_corner: [A; K],
        max_corner: [A; K],
    },
}

/// A static, weight-aware k-d tree over `K`-dimensional points.
///
/// Built once and immutable afterwards. Supports bounded box queries and
/// orthant queries (regions unbounded below) through the same
/// [`canonical_set`](KdTree::canonical_set) entry point, and the same two
/// sampling modes as [`RangeTree`](crate::RangeTree).
///
/// # Examples
///
/// ```rust
/// use pickd::{ColorWeights, KdTree, QueryRegion};
///
/// let weights = ColorWeights::from_pairs([("a", 1.0), ("b", 2.0)]).unwrap();
/// let points = vec![[0.0, 0.0], [5.0, 5.0], [9.0, 1.0]];
/// let colors = vec!["a", "b", "a"];
///
/// let mut rng = rand::rng();
/// let tree: KdTree<f64, u32, 2> =
///     KdTree::build(&points, &colors, &weights, &mut rng).unwrap();
///
/// let set = tree.canonical_set(&QueryRegion::new([4.0, 0.0], [10.0, 6.0]));
/// let sampled = tree.sample_independent(&set, &mut rng).unwrap();
/// assert!(sampled == 1 || sampled == 2);
/// ```
#[derive(Debug, Clone)]
pub struct KdTree<A: Copy + Default, T: Copy + Default, const K: usize> {
    pub(crate) nodes: Vec<KdNode<A, T, K>>,
    pub(crate) root: u32,
    size: usize,
}

impl<A, T, const K: usize> KdTree<A, T, K>
where
    A: Axis,
    T: Content,
    usize: Cast<T>,
{
    /// Builds a k-d tree over `points`, weighting each point by its color's
    /// entry in `weights`.
    pub fn build<C, R>(
        points: &[[A; K]],
        colors: &[C],
        weights: &ColorWeights<C, A>,
        rng: &mut R,
    ) -> Result<Self, BuildError>
    where
        C: Eq + Hash + Clone + Debug,
        R: Rng + ?Sized,
    {
        let entries = make_entries(points, colors, weights)?;
        Ok(Self::from_entries(entries, rng))
    }

    /// Builds an unweighted tree (every point has weight 1).
    pub fn build_uniform<R>(points: &[[A; K]], rng: &mut R) -> Result<Self, BuildError>
    where
        R: Rng + ?Sized,
    {
        if points.is_empty() {
            return Err(BuildError::EmptyPoints);
        }
        let entries = points
            .iter()
            .enumerate()
            .map(|(idx, point)| Entry {
                point: *point,
                item: idx.az::<T>(),
                color: 0,
                weight: A::one(),
            })
            .collect();
        Ok(Self::from_entries(entries, rng))
    }

    fn from_entries<R: Rng + ?Sized>(mut entries: Vec<Entry<A, T, K>>, rng: &mut R) -> Self {
        let size = entries.len();

        // the root box is the coordinate-wise extent of the input
        let mut min_corner = [A::infinity(); K];
        let mut max_corner = [A::neg_infinity(); K];
        for entry in &entries {
            for d in 0..K {
                min_corner[d] = min_corner[d].min(entry.point[d]);
                max_corner[d] = max_corner[d].max(entry.point[d]);
            }
        }

        let mut nodes = Vec::with_capacity(2 * size);
        let root = build_level(&mut nodes, &mut entries, 0, min_corner, max_corner, rng);

        #[cfg(feature = "tracing")]
        event!(
            Level::DEBUG,
            points = size,
            nodes = nodes.len(),
            "built k-d tree"
        );

        Self { nodes, root, size }
    }

    /// Returns the number of points stored in the tree.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Samples one item from the canonical set, proportionally to weight,
    /// with fresh randomness on every call.
    #[inline]
    pub fn sample_independent<R: Rng + ?Sized>(
        &self,
        set: &CanonicalSet,
        rng: &mut R,
    ) -> Option<T> {
        sampling::sample_independent(self, &set.nodes, rng)
    }

    /// Samples one item from the canonical set using the keys fixed at
    /// construction: the same canonical set always yields the same item.
    #[inline]
    pub fn sample_consistent(&self, set: &CanonicalSet) -> Option<T> {
        sampling::sample_consistent(self, &set.nodes)
    }
}

impl<A, T, const K: usize> SampleNodes<A, T> for KdTree<A, T, K>
where
    A: Axis,
    T: Content,
{
    #[inline]
    fn weight(&self, node: u32) -> A {
        match &self.nodes[node as usize] {
            KdNode::Leaf { weight, .. } | KdNode::Internal { weight, .. } => *weight,
        }
    }

    #[inline]
    fn static_key(&self, node: u32) -> A {
        match &self.nodes[node as usize] {
            KdNode::Leaf { key, .. } | KdNode::Internal { key, .. } => *key,
        }
    }

    #[inline]
    fn children(&self, node: u32) -> Option<(u32, u32)> {
        match &self.nodes[node as usize] {
            KdNode::Leaf { .. } => None,
            KdNode::Internal { left, right, .. } => Some((*left, *right)),
        }
    }

    #[inline]
    fn max_leaf(&self, node: u32) -> u32 {
        match &self.nodes[node as usize] {
            KdNode::Leaf { .. } => node,
            KdNode::Internal { max_leaf, .. } => *max_leaf,
        }
    }

    #[inline]
    fn item(&self, node: u32) -> T {
        match &self.nodes[node as usize] {
            KdNode::Leaf { item, .. } => *item,
            KdNode::Internal { .. } => unreachable!("item() on internal node"),
        }
    }
}

/// Recursive lower-median build; the split axis cycles with depth and the
/// node box is the parent box bisected at the split value.
fn build_level<A, T, R, const K: usize>(
    nodes: &mut Vec<KdNode<A, T, K>>,
    entries: &mut [Entry<A, T, K>],
    depth: usize,
    min_corner: [A; K],
    max_corner: [A; K],
    rng: &mut R,
) -> u32
where
    A: Axis,
    T: Content,
    R: Rng + ?Sized,
{
    debug_assert!(!entries.is_empty());

    if entries.len() == 1 {
        let e = entries[0];
        nodes.push(KdNode::Leaf {
            point: e.point,
            item: e.item,
            weight: e.weight,
            key: exp_key(e.weight, rng),
        });
        return (nodes.len() - 1) as u32;
    }

    let axis = depth % K;
    let mid = lower_median(entries.len());
    entries.select_nth_unstable_by(mid, |a, b| axis_cmp(a, b, axis));
    let split_val = entries[mid].point[axis];

    let mut left_max = max_corner;
    left_max[axis] = split_val;
    let mut right_min = min_corner;
    right_min[axis] = split_val;

    let (lo, hi) = entries.split_at_mut(mid + 1);
    let left = build_level(nodes, lo, depth + 1, min_corner, left_max, rng);
    let right = build_level(nodes, hi, depth + 1, right_min, max_corner, rng);

    let (left_weight, left_key, left_max_leaf) = summarize(nodes, left);
    let (right_weight, right_key, right_max_leaf) = summarize(nodes, right);

    let (key, max_leaf) = if left_key.total_order(right_key) == Ordering::Greater {
        (left_key, left_max_leaf)
    } else {
        (right_key, right_max_leaf)
    };

    nodes.push(KdNode::Internal {
        left,
        right,
        weight: left_weight + right_weight,
        key,
        max_leaf,
        min_corner,
        max_corner,
    });
    (nodes.len() - 1) as u32
}

fn summarize<A: Axis, T: Content, const K: usize>(
    nodes: &[KdNode<A, T, K>],
    node: u32,
) -> (A, A, u32) {
    match &nodes[node as usize] {
        KdNode::Leaf { weight, key, .. } => (*weight, *key, node),
        KdNode::Internal {
            weight,
            key,
            max_leaf,
            ..
        } => (*weight, *key, *max_leaf),
    }
}
