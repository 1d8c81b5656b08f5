//! Canonical decomposition for k-d trees.

use crate::canonical::CanonicalSet;
use crate::kd::tree::{KdNode, KdTree};
use crate::region::QueryRegion;
use crate::types::{Axis, Content};

impl<A, T, const K: usize> KdTree<A, T, K>
where
    A: Axis,
    T: Content,
{
    /// Returns the canonical decomposition of `region`.
    ///
    /// A subtree whose box does not overlap the region is pruned; one whose
    /// box is fully contained becomes a canonical node; anything in between
    /// is recursed. All comparisons are closed, so boundary points are
    /// included, and orthant regions built with
    /// [`QueryRegion::orthant`] simplify to one-sided tests naturally.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pickd::{KdTree, QueryRegion};
    ///
    /// let points = vec![[1.0, 1.0], [2.0, 5.0], [6.0, 3.0]];
    /// let tree: KdTree<f64, u32, 2> =
    ///     KdTree::build_uniform(&points, &mut rand::rng()).unwrap();
    ///
    /// // orthant (-inf, 2.0] x (-inf, 5.0] contains the first two points
    /// let set = tree.canonical_set(&QueryRegion::orthant([2.0, 5.0]));
    /// assert_eq!(tree.report_items(&set).len(), 2);
    /// ```
    pub fn canonical_set(&self, region: &QueryRegion<A, K>) -> CanonicalSet {
        let mut nodes = Vec::new();
        self.collect_canonical(self.root, region, &mut nodes);
        CanonicalSet { nodes }
    }

    /// Reports the items of every point covered by the canonical set.
    pub fn report_items(&self, set: &CanonicalSet) -> Vec<T> {
        let mut items = Vec::new();
        for &node in &set.nodes {
            self.collect_leaf_items(node, &mut items);
        }
        items
    }

    fn collect_leaf_items(&self, node: u32, out: &mut Vec<T>) {
        match &self.nodes[node as usize] {
            KdNode::Leaf { item, .. } => out.push(*item),
            KdNode::Internal { left, right, .. } => {
                self.collect_leaf_items(*left, out);
                self.collect_leaf_items(*right, out);
            }
        }
    }

    fn collect_canonical(&self, node: u32, region: &QueryRegion<A, K>, out: &mut Vec<u32>) {
        match &self.nodes[node as usize] {
            KdNode::Leaf { point, .. } => {
                if region.contains(point) {
                    out.push(node);
                }
            }
            KdNode::Internal {
                left,
                right,
                min_corner,
                max_corner,
                ..
            } => {
                for d in 0..K {
                    if min_corner[d] > region.max[d] || max_corner[d] < region.min[d] {
                        return;
                    }
                }
                let contained = (0..K)
                    .all(|d| region.min[d] <= min_corner[d] && max_corner[d] <= region.max[d]);
                if contained {
                    out.push(node);
                } else {
                    self.collect_canonical(*left, region, out);
                    self.collect_canonical(*right, region, out);
                }
            }
        }
    }
}
