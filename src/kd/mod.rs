//! Bounding-box k-d tree.
//!
//! The split axis cycles with depth and every internal node carries the
//! bounding box of its subtree, computed by bisecting the parent box at the
//! split value. Canonical decomposition is a box-containment recursion:
//! prune on disjoint boxes, canonicalize on fully contained ones, recurse
//! otherwise, visiting `O(n^(1-1/K) + k)` nodes in the worst case. Orthant
//! regions (unbounded below) go through the same code path.

pub mod query;
pub mod tree;
