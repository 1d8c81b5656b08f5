//! The 3-sided-query structure: a k-d tree over color boxes.
//!
//! Leaves are the disjoint boxes produced by [`super::boxes`]; the four
//! bound coordinates of a box act as the point coordinates, with the split
//! axis cycling through them. A query triple `(qa, qb, qc)` is decomposed
//! into canonical nodes exactly like a k-d range query, except that the
//! per-axis comparisons carry the boxes' open/closed convention: lower
//! bounds must fall strictly below the query value, upper bounds at or
//! above it. Because the boxes of one color are disjoint, every leaf under
//! a canonical node is a distinct stabbed color, so a canonical node's
//! weight is the sum of the distinct color weights it contributes.

use std::cmp::Ordering;

use rand::Rng;

use crate::rect::boxes::ColorBox;
use crate::sampling::exp_key;
use crate::types::{Axis, Content};

const BOX_AXES: usize = 4;

#[derive(Debug, Clone)]
pub(crate) enum AuxNode<A, T> {
    Leaf(ColorBox<A, T>),
    Internal {
        left: u32,
        right: u32,
        weight: A,
        count: usize,
        /// Componentwise extent of the subtree's four bound coordinates.
        lo: [A; BOX_AXES],
        hi: [A; BOX_AXES],
    },
}

#[derive(Debug, Clone)]
pub(crate) struct AuxTree<A, T> {
    nodes: Vec<AuxNode<A, T>>,
    root: u32,
    /// Queries below these values are equivalent to them; raising the query
    /// keeps `-∞` parameters out of the open lower-bound comparisons.
    clamp_x: A,
    clamp_y: A,
}

impl<A, T> AuxTree<A, T>
where
    A: Axis,
    T: Content,
{
    /// Builds the structure over a non-empty set of color boxes. `clamp_x`
    /// and `clamp_y` are the minimum point `x` and projected `ŷ` of the
    /// side's points.
    pub fn build(mut boxes: Vec<ColorBox<A, T>>, clamp_x: A, clamp_y: A) -> Self {
        debug_assert!(!boxes.is_empty());
        let mut nodes = Vec::with_capacity(2 * boxes.len());
        let root = build_level(&mut nodes, &mut boxes, 0);
        Self {
            nodes,
            root,
            clamp_x,
            clamp_y,
        }
    }

    /// Canonical decomposition of the 3-sided query `(qa, qb, qc)`.
    pub fn canonical_set(&self, qa: A, qb: A, qc: A) -> Vec<u32> {
        // every parameter below the data minimum selects the same boxes as
        // the minimum itself
        let qa = qa.max(self.clamp_x);
        let qc = qc.max(self.clamp_y);

        let mut out = Vec::new();
        self.collect_canonical(self.root, qa, qb, qc, &mut out);
        out
    }

    fn collect_canonical(&self, node: u32, qa: A, qb: A, qc: A, out: &mut Vec<u32>) {
        match &self.nodes[node as usize] {
            AuxNode::Leaf(b) => {
                if b.stabs(qa, qb, qc) {
                    out.push(node);
                }
            }
            AuxNode::Internal {
                left,
                right,
                lo,
                hi,
                ..
            } => {
                // prune when no leaf can be stabbed
                if lo[0] >= qa || hi[1] < qa || lo[1] > qb || lo[2] >= qc || hi[3] < qc {
                    return;
                }
                // canonical when every leaf is stabbed
                let contained =
                    hi[0] < qa && lo[1] >= qa && hi[1] <= qb && hi[2] < qc && lo[3] >= qc;
                if contained {
                    out.push(node);
                } else {
                    self.collect_canonical(*left, qa, qb, qc, out);
                    self.collect_canonical(*right, qa, qb, qc, out);
                }
            }
        }
    }

    #[inline]
    pub fn weight(&self, node: u32) -> A {
        match &self.nodes[node as usize] {
            AuxNode::Leaf(b) => b.weight,
            AuxNode::Internal { weight, .. } => *weight,
        }
    }

    #[inline]
    pub fn count(&self, node: u32) -> usize {
        match &self.nodes[node as usize] {
            AuxNode::Leaf(_) => 1,
            AuxNode::Internal { count, .. } => *count,
        }
    }

    /// Internal nodes with more than `x_const` leaves, in arena order.
    pub fn heavy_nodes(&self, x_const: usize) -> Vec<u32> {
        let mut heavy = Vec::new();
        for (id, node) in self.nodes.iter().enumerate() {
            if let AuxNode::Internal { count, .. } = node {
                if *count > x_const {
                    heavy.push(id as u32);
                }
            }
        }
        heavy
    }

    /// Visits every leaf box under `node`.
    pub fn visit_leaves<F: FnMut(&ColorBox<A, T>)>(&self, node: u32, visit: &mut F) {
        match &self.nodes[node as usize] {
            AuxNode::Leaf(b) => visit(b),
            AuxNode::Internal { left, right, .. } => {
                self.visit_leaves(*left, visit);
                self.visit_leaves(*right, visit);
            }
        }
    }

    /// Walks down from a canonical node, redrawing exponential keys for the
    /// two children at each level, and returns the leaf box reached.
    pub fn sample_descend<R: Rng + ?Sized>(&self, node: u32, rng: &mut R) -> &ColorBox<A, T> {
        let mut v = node;
        loop {
            match &self.nodes[v as usize] {
                AuxNode::Leaf(b) => return b,
                AuxNode::Internal { left, right, .. } => {
                    let left_key = exp_key(self.weight(*left), rng);
                    let right_key = exp_key(self.weight(*right), rng);
                    v = if right_key.total_order(left_key) == Ordering::Greater {
                        *right
                    } else {
                        *left
                    };
                }
            }
        }
    }
}

fn build_level<A, T>(nodes: &mut Vec<AuxNode<A, T>>, boxes: &mut [ColorBox<A, T>], depth: usize) -> u32
where
    A: Axis,
    T: Content,
{
    if boxes.len() == 1 {
        nodes.push(AuxNode::Leaf(boxes[0]));
        return (nodes.len() - 1) as u32;
    }

    let axis = depth % BOX_AXES;
    let mid = (boxes.len() - 1) / 2;
    boxes.select_nth_unstable_by(mid, |a, b| {
        (0..BOX_AXES)
            .map(|i| (axis + i) % BOX_AXES)
            .fold(Ordering::Equal, |ord, d| {
                ord.then_with(|| a.coord(d).total_order(b.coord(d)))
            })
    });

    let (lo_half, hi_half) = boxes.split_at_mut(mid + 1);
    let left = build_level(nodes, lo_half, depth + 1);
    let right = build_level(nodes, hi_half, depth + 1);

    let (left_weight, left_count, left_lo, left_hi) = summarize(nodes, left);
    let (right_weight, right_count, right_lo, right_hi) = summarize(nodes, right);

    let mut lo = left_lo;
    let mut hi = left_hi;
    for d in 0..BOX_AXES {
        lo[d] = lo[d].min(right_lo[d]);
        hi[d] = hi[d].max(right_hi[d]);
    }

    nodes.push(AuxNode::Internal {
        left,
        right,
        weight: left_weight + right_weight,
        count: left_count + right_count,
        lo,
        hi,
    });
    (nodes.len() - 1) as u32
}

fn summarize<A: Axis, T: Content>(
    nodes: &[AuxNode<A, T>],
    node: u32,
) -> (A, usize, [A; BOX_AXES], [A; BOX_AXES]) {
    match &nodes[node as usize] {
        AuxNode::Leaf(b) => {
            let coords = std::array::from_fn(|d| b.coord(d));
            (b.weight, 1, coords, coords)
        }
        AuxNode::Internal {
            weight,
            count,
            lo,
            hi,
            ..
        } => (*weight, *count, *lo, *hi),
    }
}

#[cfg(test)]
mod tests {
    use super::AuxTree;
    use crate::rect::boxes::{skyline_boxes, ColorBox};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Builds an aux structure over a few colors of random grid points and
    /// returns the flat box list alongside it.
    fn random_aux(seed: u64) -> (Vec<ColorBox<f64, u32>>, AuxTree<f64, u32>) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut boxes = Vec::new();
        let mut clamp_x = f64::INFINITY;
        let mut clamp_y = f64::INFINITY;

        for color in 0u32..3 {
            let m: u32 = rng.random_range(1..12);
            let mut projected: Vec<(f64, f64, u32, [f64; 2])> = (0..m)
                .map(|idx| {
                    let x = rng.random_range(0..10) as f64;
                    let y = rng.random_range(0..10) as f64;
                    clamp_x = clamp_x.min(x);
                    clamp_y = clamp_y.min(y);
                    (x, y, color * 100 + idx, [x, y])
                })
                .collect();
            skyline_boxes(&mut projected, color, f64::from(color + 1), &mut boxes);
        }

        let tree = AuxTree::build(boxes.clone(), clamp_x, clamp_y);
        (boxes, tree)
    }

    fn fingerprint(b: &ColorBox<f64, u32>) -> (u32, u32) {
        (b.color, b.item)
    }

    #[test]
    fn canonical_sets_cover_exactly_the_stabbed_boxes() {
        for seed in 311..318 {
            let (boxes, tree) = random_aux(seed);

            for qa2 in -3..21 {
                for qc2 in -3..21 {
                    let qa = f64::from(qa2) / 2.0;
                    let qb = qa + 3.0;
                    let qc = f64::from(qc2) / 2.0;

                    // the tree clamps unbounded/low parameters to the data
                    // minimum, so the reference scan must do the same
                    let (ca, cc) = (qa.max(tree.clamp_x), qc.max(tree.clamp_y));
                    let mut expected: Vec<(u32, u32)> = boxes
                        .iter()
                        .filter(|b| b.stabs(ca, qb, cc))
                        .map(fingerprint)
                        .collect();
                    expected.sort_unstable();

                    let mut reported = Vec::new();
                    for &node in &tree.canonical_set(qa, qb, qc) {
                        tree.visit_leaves(node, &mut |b| reported.push(fingerprint(b)));
                    }
                    reported.sort_unstable();

                    assert_eq!(reported, expected, "qa={qa} qb={qb} qc={qc}");
                }
            }
        }
    }

    #[test]
    fn unbounded_parameters_match_the_data_minimum() {
        let (_, tree) = random_aux(319);

        let clamped = tree.canonical_set(f64::NEG_INFINITY, 20.0, f64::NEG_INFINITY);
        let explicit = tree.canonical_set(tree.clamp_x, 20.0, tree.clamp_y);
        assert_eq!(clamped, explicit);
    }

    #[test]
    fn heavy_nodes_have_more_leaves_than_the_threshold() {
        let (_, tree) = random_aux(320);
        for &node in &tree.heavy_nodes(2) {
            assert!(tree.count(node) > 2);
        }
    }
}
