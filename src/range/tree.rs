//! Range tree construction and sampling entry points.

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
pub(crate) enum RangeNode<A, T, const K: usize> {
    Leaf {
        point: [A; K],
        item: T,
        weight: A,
        key: A,
    },
    Internal {
        left: u32,
        right: u32,
        split_val: A,
        weight: A,
        key: A,
        max_leaf: u32,
        /// Root of the associated tree on the next axis; `None` only on the
        /// last dimension.
        assoc: Option<u32>,
    },
}

/// A static, weight-aware multidimensional range tree.
///
/// Built once over a fixed point set and immutable afterwards. Every node of
/// the primary tree (sorted on axis 0) below the last dimension carries an
/// associated tree over the same points on the next axis, which is what lets
/// [`canonical_set`](RangeTree::canonical_set) answer a K-dimensional box
/// query with `O(log^K n)` disjoint subtrees.
///
/// `A` is the coordinate/weight scalar ([`f64`] or [`f32`]), `T` the item
/// payload returned by samples (construction enumerates the input, so item
/// `i` is the `i`-th supplied point), and `K` the number of dimensions.
///
/// # Examples
///
/// ```rust
/// use pickd::{ColorWeights, QueryRegion, RangeTree};
///
/// let weights = ColorWeights::from_pairs([("a", 1.0), ("b", 2.0)]).unwrap();
/// let points = vec![[0.0, 0.0], [1.0, 2.0], [2.0, 1.0]];
/// let colors = vec!["a", "b", "a"];
///
/// let mut rng = rand::rng();
/// let tree: RangeTree<f64, u32, 2> =
///     RangeTree::build(&points, &colors, &weights, &mut rng).unwrap();
///
/// assert_eq!(tree.size(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct RangeTree<A: Copy + Default, T: Copy + Default, const K: usize> {
    pub(crate) nodes: Vec<RangeNode<A, T, K>>,
    pub(crate) root: u32,
    size: usize,
}

impl<A, T, const K: usize> RangeTree<A, T, K>
where
    A: Axis,
    T: Content,
    usize: Cast<T>,
{
    /// Builds a range tree over `points`, weighting each point by its
    /// color's entry in `weights`.
    ///
    /// The RNG draws the construction-time keys used by
    /// [`sample_consistent`](RangeTree::sample_consistent); pass a seeded
    /// generator for reproducible consistent-mode behaviour.
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

    /// Builds an unweighted tree (every point has weight 1), so sampling is
    /// uniform over the points inside a region.
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
        let mut nodes = Vec::with_capacity(2 * size);
        let root = build_dim(&mut nodes, &mut entries, 0, rng);

        #[cfg(feature = "tracing")]
        event!(
            Level::DEBUG,
            points = size,
            nodes = nodes.len(),
            "built range tree"
        );

        Self { nodes, root, size }
    }

    /// Returns the number of points stored in the tree.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pickd::RangeTree;
    ///
    /// let points = vec![[1.0], [2.0], [3.0]];
    /// let tree: RangeTree<f64, u32, 1> =
    ///     RangeTree::build_uniform(&points, &mut rand::rng()).unwrap();
    ///
    /// assert_eq!(tree.size(), 3);
    /// ```
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Samples one item from the canonical set, proportionally to weight,
    /// with fresh randomness on every call. Returns `None` when the set is
    /// empty.
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

impl<A, T, const K: usize> SampleNodes<A, T> for RangeTree<A, T, K>
where
    A: Axis,
    T: Content,
{
    #[inline]
    fn weight(&self, node: u32) -> A {
        match &self.nodes[node as usize] {
            RangeNode::Leaf { weight, .. } | RangeNode::Internal { weight, .. } => *weight,
        }
    }

    #[inline]
    fn static_key(&self, node: u32) -> A {
        match &self.nodes[node as usize] {
            RangeNode::Leaf { key, .. } | RangeNode::Internal { key, .. } => *key,
        }
    }

    #[inline]
    fn children(&self, node: u32) -> Option<(u32, u32)> {
        match &self.nodes[node as usize] {
            RangeNode::Leaf { .. } => None,
            RangeNode::Internal { left, right, .. } => Some((*left, *right)),
        }
    }

    #[inline]
    fn max_leaf(&self, node: u32) -> u32 {
        match &self.nodes[node as usize] {
            RangeNode::Leaf { .. } => node,
            RangeNode::Internal { max_leaf, .. } => *max_leaf,
        }
    }

    #[inline]
    fn item(&self, node: u32) -> T {
        match &self.nodes[node as usize] {
            RangeNode::Leaf { item, .. } => *item,
            RangeNode::Internal { .. } => unreachable!("item() on internal node"),
        }
    }
}

/// Recursive lower-median build of one dimension level; associated trees
/// for `axis + 1` are built from a copy of the subrange before it is
/// partitioned.
fn build_dim<A, T, R, const K: usize>(
    nodes: &mut Vec<RangeNode<A, T, K>>,
    entries: &mut [Entry<A, T, K>],
    axis: usize,
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
        nodes.push(RangeNode::Leaf {
            point: e.point,
            item: e.item,
            weight: e.weight,
            key: exp_key(e.weight, rng),
        });
        return (nodes.len() - 1) as u32;
    }

    let mid = lower_median(entries.len());
    entries.select_nth_unstable_by(mid, |a, b| axis_cmp(a, b, axis));
    let split_val = entries[mid].point[axis];

    let assoc = if axis + 1 < K {
        let mut duplicate = entries.to_vec();
        Some(build_dim(nodes, &mut duplicate, axis + 1, rng))
    } else {
        None
    };

    let (lo, hi) = entries.split_at_mut(mid + 1);
    let left = build_dim(nodes, lo, axis, rng);
    let right = build_dim(nodes, hi, axis, rng);

    let (left_weight, left_key, left_max) = summarize(nodes, left);
    let (right_weight, right_key, right_max) = summarize(nodes, right);

    let (key, max_leaf) = if left_key.total_order(right_key) == Ordering::Greater {
        (left_key, left_max)
    } else {
        (right_key, right_max)
    };

    nodes.push(RangeNode::Internal {
        left,
        right,
        split_val,
        weight: left_weight + right_weight,
        key,
        max_leaf,
        assoc,
    });
    (nodes.len() - 1) as u32
}

fn summarize<A: Axis, T: Content, const K: usize>(
    nodes: &[RangeNode<A, T, K>],
    node: u32,
) -> (A, A, u32) {
    match &nodes[node as usize] {
        RangeNode::Leaf { weight, key, .. } => (*weight, *key, node),
        RangeNode::Internal {
            weight,
            key,
            max_leaf,
            ..
        } => (*weight, *key, *max_leaf),
    }
}
