//! 2-D rectangular queries via a pair of 3-sided sub-queries.
//!
//! A rectangle query on a tree sorted by `y` degenerates to `O(n)` on the
//! `x` axis unless the two halves around the split node are indexed
//! separately. [`tree::RectangularSearchTree`] answers a rectangle by
//! finding the split node on `y`, issuing one 3-sided query against an
//! auxiliary structure over each half, and merging the two canonical sets.
//! A color present in both halves would be counted twice, so the overlap
//! weight is subtracted from the upper half before sampling: exactly for
//! small canonical pairs, via a precomputed pair matrix for large ones.
//!
//! The auxiliary structures ([`aux`]) index, per color, the skyline
//! decomposition of the half's points ([`boxes`]): disjoint boxes in the
//! space of query parameters such that any 3-sided query stabs at most one
//! box per color.

pub(crate) mod aux;
pub(crate) mod boxes;
pub mod tree;
