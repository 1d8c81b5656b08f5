//! Canonical decomposition for range trees.

use crate::canonical::CanonicalSet;
use crate::range::tree::{RangeNode, RangeTree};
use crate::region::QueryRegion;
use crate::types::{Axis, Content};

impl<A, T, const K: usize> RangeTree<A, T, K>
where
    A: Axis,
    T: Content,
{
    /// Returns the canonical decomposition of `region`: a set of disjoint
    /// subtree roots whose leaves are exactly the points inside the region.
    ///
    /// Bounds are closed on every dimension, on both internal-node descents
    /// and leaf checks, so points sitting exactly on a region boundary are
    /// included.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use pickd::{QueryRegion, RangeTree};
    ///
    /// let points: Vec<[f64; 1]> = (0..100).map(|v| [v as f64]).collect();
    /// let tree: RangeTree<f64, u32, 1> =
    ///     RangeTree::build_uniform(&points, &mut rand::rng()).unwrap();
    ///
    /// let set = tree.canonical_set(&QueryRegion::new([45.0], [65.0]));
    /// assert_eq!(tree.report_items(&set).len(), 21);
    /// ```
    pub fn canonical_set(&self, region: &QueryRegion<A, K>) -> CanonicalSet {
        let mut nodes = Vec::new();
        self.canonical_dim(self.root, region, 0, &mut nodes);
        CanonicalSet { nodes }
    }

    /// Reports the items of every point covered by the canonical set, i.e.
    /// all points inside the region the set was computed for.
    pub fn report_items(&self, set: &CanonicalSet) -> Vec<T> {
        let mut items = Vec::new();
        for &node in &set.nodes {
            self.collect_leaf_items(node, &mut items);
        }
        items
    }

    fn collect_leaf_items(&self, node: u32, out: &mut Vec<T>) {
        match &self.nodes[node as usize] {
            RangeNode::Leaf { item, .. } => out.push(*item),
            RangeNode::Internal { left, right, .. } => {
                self.collect_leaf_items(*left, out);
                self.collect_leaf_items(*right, out);
            }
        }
    }

    /// One dimension level: 1-D canonical nodes on `axis`, then recursion
    /// into associated trees (or a direct coordinate check for canonical
    /// leaves) for the remaining axes.
    fn canonical_dim(&self, root: u32, region: &QueryRegion<A, K>, axis: usize, out: &mut Vec<u32>) {
        let mut level = Vec::new();
        self.level_canonical(root, region, axis, &mut level);

        if axis + 1 == K {
            out.extend_from_slice(&level);
            return;
        }

        for node in level {
            match &self.nodes[node as usize] {
                RangeNode::Leaf { point, .. } => {
                    if (axis + 1..K).all(|d| region.min[d] <= point[d] && point[d] <= region.max[d])
                    {
                        out.push(node);
                    }
                }
                RangeNode::Internal { assoc, .. } => {
                    // internal nodes below the last dimension always carry
                    // an associated tree
                    if let Some(assoc) = assoc {
                        self.canonical_dim(*assoc, region, axis + 1, out);
                    }
                }
            }
        }
    }

    /// 1-D canonical decomposition on a single axis: find the split node,
    /// then follow both range boundaries down, collecting the inner-side
    /// child at every step away from the boundary.
    fn level_canonical(
        &self,
        root: u32,
        region: &QueryRegion<A, K>,
        axis: usize,
        out: &mut Vec<u32>,
    ) {
        let (min, max) = (region.min[axis], region.max[axis]);

        let mut v = root;
        let (split_left, split_right) = loop {
            match &self.nodes[v as usize] {
                RangeNode::Internal {
                    left,
                    right,
                    split_val,
                    ..
                } => {
                    if *split_val > max {
                        v = *left;
                    } else if *split_val < min {
                        v = *right;
                    } else {
                        break (*left, *right);
                    }
                }
                RangeNode::Leaf { point, .. } => {
                    if min <= point[axis] && point[axis] <= max {
                        out.push(v);
                    }
                    return;
                }
            }
        };

        // path toward the minimum boundary; right children hang inside the
        // range because everything under the split node's left child is
        // at most the split value, which is at most max
        let mut v = split_left;
        loop {
            match &self.nodes[v as usize] {
                RangeNode::Internal {
                    left,
                    right,
                    split_val,
                    ..
                } => {
                    if *split_val >= min {
                        out.push(*right);
                        v = *left;
                    } else {
                        v = *right;
                    }
                }
                RangeNode::Leaf { point, .. } => {
                    if min <= point[axis] && point[axis] <= max {
                        out.push(v);
                    }
                    break;
                }
            }
        }

        // symmetric path toward the maximum boundary
        let mut v = split_right;
        loop {
            match &self.nodes[v as usize] {
                RangeNode::Internal {
                    left,
                    right,
                    split_val,
                    ..
                } => {
                    if *split_val <= max {
                        out.push(*left);
                        v = *right;
                    } else {
                        v = *left;
                    }
                }
                RangeNode::Leaf { point, .. } => {
                    if min <= point[axis] && point[axis] <= max {
                        out.push(v);
                    }
                    break;
                }
            }
        }
    }
}
