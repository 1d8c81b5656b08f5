//! 2-D rectangular search tree with orthant-pair intersection removal.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

use az::Cast;
use rand::Rng;
#[cfg(feature = "tracing")]
use tracing::{event, Level};

use crate::colors::{ColorId, ColorWeights};
use crate::entry::{axis_cmp, lower_median, make_entries, Entry};
use crate::errors::BuildError;
use crate::rect::aux::AuxTree;
use crate::rect::boxes::{skyline_boxes, ColorBox};
use crate::region::QueryRegion;
use crate::sampling::exp_key;
use crate::types::{Axis, Content};

#[derive(Debug, Clone)]
pub(crate) enum PrimaryNode<A, T> {
    Leaf {
        point: [A; 2],
        item: T,
    },
    Internal {
        left: u32,
        right: u32,
        split_val: A,
        /// 3-sided structure over the lower (left) subtree's points.
        aux_low: AuxTree<A, T>,
        /// 3-sided structure over the upper (right) subtree's points.
        aux_high: AuxTree<A, T>,
        /// Precomputed intersection weights for heavy canonical pairs.
        heavy: Option<HeavyPairs<A>>,
    },
}

/// Pairwise intersection weights for canonical nodes with more than
/// `x_const` leaves on both sides, keyed by aux-arena node id.
#[derive(Debug, Clone)]
pub(crate) struct HeavyPairs<A> {
    low_index: HashMap<u32, usize>,
    high_index: HashMap<u32, usize>,
    cols: usize,
    weights: Vec<A>,
}

impl<A: Axis> HeavyPairs<A> {
    fn build<T: Content>(
        aux_low: &AuxTree<A, T>,
        aux_high: &AuxTree<A, T>,
        x_const: usize,
    ) -> Option<Self> {
        let heavy_low = aux_low.heavy_nodes(x_const);
        let heavy_high = aux_high.heavy_nodes(x_const);
        if heavy_low.is_empty() || heavy_high.is_empty() {
            return None;
        }

        let cols = heavy_high.len();
        let mut weights = Vec::with_capacity(heavy_low.len() * cols);
        for &low in &heavy_low {
            for &high in &heavy_high {
                weights.push(shared_color_weight(aux_low, low, aux_high, high));
            }
        }

        Some(Self {
            low_index: heavy_low.iter().enumerate().map(|(i, &n)| (n, i)).collect(),
            high_index: heavy_high.iter().enumerate().map(|(j, &n)| (n, j)).collect(),
            cols,
            weights,
        })
    }

    fn lookup(&self, low: u32, high: u32) -> Option<A> {
        let row = *self.low_index.get(&low)?;
        let col = *self.high_index.get(&high)?;
        Some(self.weights[row * self.cols + col])
    }
}

/// Total weight of the colors present under both canonical nodes.
fn shared_color_weight<A: Axis, T: Content>(
    aux_low: &AuxTree<A, T>,
    low: u32,
    aux_high: &AuxTree<A, T>,
    high: u32,
) -> A {
    let mut low_colors: HashSet<ColorId> = HashSet::new();
    aux_low.visit_leaves(low, &mut |b| {
        low_colors.insert(b.color);
    });

    let mut counted: HashSet<ColorId> = HashSet::new();
    let mut total = A::zero();
    aux_high.visit_leaves(high, &mut |b| {
        if low_colors.contains(&b.color) && counted.insert(b.color) {
            total = total + b.weight;
        }
    });
    total
}

/// A 2-D rectangular-query structure that avoids an `O(n)` axis by
/// answering each rectangle as a pair of opposite 3-sided queries.
///
/// The primary tree is sorted on `y`; every internal node carries two
/// auxiliary structures indexing the skyline decomposition of its lower and
/// upper subtree's points. A rectangle query walks to the split node on
/// `y`, decomposes one 3-sided query per side, subtracts the weight of
/// colors counted by both sides (exactly for light canonical pairs, via a
/// precomputed matrix for heavy ones), and samples a color proportionally
/// to weight. The sample is the color's representative point inside the
/// rectangle.
///
/// Unlike [`RangeTree`](crate::RangeTree) and [`KdTree`](crate::KdTree),
/// sampling here is per *color* present in the rectangle, not per point:
/// each color inside the region is selected with probability proportional
/// to its weight, and one of its points in the region is returned.
///
/// # Examples
///
/// ```rust
/// use pickd::{ColorWeights, QueryRegion, RectangularSearchTree};
///
/// let weights = ColorWeights::from_pairs([("a", 1.0), ("b", 3.0)]).unwrap();
/// let points = vec![[0.0, 0.0], [1.0, 4.0], [3.0, 2.0], [4.0, 5.0]];
/// let colors = vec!["a", "b", "a", "b"];
///
/// let tree: RectangularSearchTree<f64, u32> =
///     RectangularSearchTree::build(&points, &colors, &weights).unwrap();
///
/// let mut rng = rand::rng();
/// let region = QueryRegion::new([0.5, 1.0], [3.5, 4.5]);
/// let sampled = tree.query_sample(&region, &mut rng).unwrap();
/// assert!(sampled == 1 || sampled == 2);
/// ```
#[derive(Debug, Clone)]
pub struct RectangularSearchTree<A: Copy + Default, T: Copy + Default> {
    pub(crate) nodes: Vec<PrimaryNode<A, T>>,
    pub(crate) root: u32,
    size: usize,
    x_const: usize,
}

impl<A, T> RectangularSearchTree<A, T>
where
    A: Axis,
    T: Content,
    usize: Cast<T>,
{
    /// Builds the structure with the heavy/light threshold defaulted to
    /// `⌈√n⌉`.
    pub fn build<C>(
        points: &[[A; 2]],
        colors: &[C],
        weights: &ColorWeights<C, A>,
    ) -> Result<Self, BuildError>
    where
        C: Eq + Hash + Clone + Debug,
    {
        let x_const = (points.len() as f64).sqrt().ceil() as usize;
        Self::with_x_const(points, colors, weights, x_const)
    }

    /// Builds the structure with an explicit heavy/light threshold:
    /// canonical pairs where both nodes cover more than `x_const` leaves
    /// use the precomputed intersection matrix instead of a direct scan.
    pub fn with_x_const<C>(
        points: &[[A; 2]],
        colors: &[C],
        weights: &ColorWeights<C, A>,
        x_const: usize,
    ) -> Result<Self, BuildError>
    where
        C: Eq + Hash + Clone + Debug,
    {
        let mut entries = make_entries(points, colors, weights)?;
        let mut nodes = Vec::with_capacity(2 * entries.len());
        let root = build_node(&mut nodes, &mut entries, x_const);

        #[cfg(feature = "tracing")]
        event!(
            Level::DEBUG,
            points = points.len(),
            nodes = nodes.len(),
            x_const,
            "built rectangular search tree"
        );

        Ok(Self {
            nodes,
            root,
            size: points.len(),
            x_const,
        })
    }

    /// Returns the number of points stored in the tree.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// The heavy/light threshold the tree was built with.
    #[inline]
    pub fn x_const(&self) -> usize {
        self.x_const
    }

    /// Samples one item from the rectangle, color-weighted, with fresh
    /// randomness per call. Returns `None` iff the rectangle contains no
    /// points.
    pub fn query_sample<R: Rng + ?Sized>(
        &self,
        region: &QueryRegion<A, 2>,
        rng: &mut R,
    ) -> Option<T> {
        // split node on y
        let mut v = self.root;
        let split = loop {
            match &self.nodes[v as usize] {
                PrimaryNode::Internal {
                    left,
                    right,
                    split_val,
                    ..
                } => {
                    if *split_val < region.min[1] {
                        v = *right;
                    } else if *split_val > region.max[1] {
                        v = *left;
                    } else {
                        break v;
                    }
                }
                PrimaryNode::Leaf { .. } => break v,
            }
        };

        match &self.nodes[split as usize] {
            PrimaryNode::Leaf { point, item } => region.contains(point).then_some(*item),
            PrimaryNode::Internal {
                aux_low,
                aux_high,
                heavy,
                ..
            } => {
                let (qa, qb) = (region.min[0], region.max[0]);
                // the lower subtree needs only the bottom edge, the upper
                // one only the (negated) top edge
                let low_set = aux_low.canonical_set(qa, qb, region.min[1]);
                let high_set = aux_high.canonical_set(qa, qb, -region.max[1]);
                if low_set.is_empty() && high_set.is_empty() {
                    return None;
                }

                // remove colors already counted on the low side from the
                // high side's effective weights
                let mut high_weights: Vec<A> =
                    high_set.iter().map(|&n| aux_high.weight(n)).collect();
                for &low in &low_set {
                    for (j, &high) in high_set.iter().enumerate() {
                        let overlap = self.intersection_weight(aux_low, low, aux_high, high, heavy);
                        high_weights[j] = (high_weights[j] - overlap).max(A::zero());
                    }
                }

                let mut best: Option<(bool, u32, A)> = None;
                for &node in &low_set {
                    let key = exp_key(aux_low.weight(node), rng);
                    if best.map_or(true, |(_, _, k)| key.total_order(k) == std::cmp::Ordering::Greater) {
                        best = Some((false, node, key));
                    }
                }
                for (j, &node) in high_set.iter().enumerate() {
                    let key = exp_key(high_weights[j], rng);
                    if best.map_or(true, |(_, _, k)| key.total_order(k) == std::cmp::Ordering::Greater) {
                        best = Some((true, node, key));
                    }
                }

                let (is_high, node, _) = best?;
                let aux = if is_high { aux_high } else { aux_low };
                Some(aux.sample_descend(node, rng).item)
            }
        }
    }

    /// Weight of the colors counted by both canonical nodes: matrix lookup
    /// for heavy pairs, direct leaf scan for light ones.
    fn intersection_weight(
        &self,
        aux_low: &AuxTree<A, T>,
        low: u32,
        aux_high: &AuxTree<A, T>,
        high: u32,
        heavy: &Option<HeavyPairs<A>>,
    ) -> A {
        if aux_low.count(low) > self.x_const && aux_high.count(high) > self.x_const {
            if let Some(weight) = heavy.as_ref().and_then(|h| h.lookup(low, high)) {
                return weight;
            }
        }
        shared_color_weight(aux_low, low, aux_high, high)
    }
}

/// Recursive lower-median build on `y`; every internal node gets one
/// 3-sided aux structure per side.
fn build_node<A, T>(
    nodes: &mut Vec<PrimaryNode<A, T>>,
    entries: &mut [Entry<A, T, 2>],
    x_const: usize,
) -> u32
where
    A: Axis,
    T: Content,
{
    debug_assert!(!entries.is_empty());

    if entries.len() == 1 {
        let e = entries[0];
        nodes.push(PrimaryNode::Leaf {
            point: e.point,
            item: e.item,
        });
        return (nodes.len() - 1) as u32;
    }

    let mid = lower_median(entries.len());
    entries.select_nth_unstable_by(mid, |a, b| axis_cmp(a, b, 1));
    let split_val = entries[mid].point[1];

    let (lo_half, hi_half) = entries.split_at_mut(mid + 1);
    let aux_low = build_aux(lo_half, false);
    let aux_high = build_aux(hi_half, true);
    let heavy = HeavyPairs::build(&aux_low, &aux_high, x_const);

    let left = build_node(nodes, lo_half, x_const);
    let right = build_node(nodes, hi_half, x_const);

    nodes.push(PrimaryNode::Internal {
        left,
        right,
        split_val,
        aux_low,
        aux_high,
        heavy,
    });
    (nodes.len() - 1) as u32
}

/// Buckets one side's points by color, decomposes each color into disjoint
/// boxes and indexes them. The upper side is negated on `y` so both sides
/// share the `ŷ ≥ qc` query form.
fn build_aux<A, T>(entries: &[Entry<A, T, 2>], high_side: bool) -> AuxTree<A, T>
where
    A: Axis,
    T: Content,
{
    let mut buckets: HashMap<ColorId, (A, Vec<(A, A, T, [A; 2])>)> = HashMap::new();
    let mut clamp_x = A::infinity();
    let mut clamp_y = A::infinity();

    for e in entries {
        let projected_y = if high_side { -e.point[1] } else { e.point[1] };
        clamp_x = clamp_x.min(e.point[0]);
        clamp_y = clamp_y.min(projected_y);
        buckets
            .entry(e.color)
            .or_insert_with(|| (e.weight, Vec::new()))
            .1
            .push((e.point[0], projected_y, e.item, e.point));
    }

    let mut boxes: Vec<ColorBox<A, T>> = Vec::new();
    for (color, (weight, mut projected)) in buckets {
        skyline_boxes(&mut projected, color, weight, &mut boxes);
    }

    AuxTree::build(boxes, clamp_x, clamp_y)
}
