#![warn(rustdoc::missing_crate_level_docs)]
#![deny(rustdoc::invalid_codeblock_attributes)]
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::private_intra_doc_links)]
#![doc(issue_tracker_base_url = "https://github.com/pickd-rs/pickd/issues/")]

//! # Pickd
//!
//! Static, weight-aware multidimensional range-search structures that answer
//! one recurring query: given an axis-aligned box (or an orthant), return a
//! random element from the region, with probability proportional to a
//! per-category weight.
//!
//! The trees are built once over a fixed point set and are immutable
//! afterwards. A query is answered in two steps: a *canonical decomposition*
//! reduces the region to a small set of disjoint subtrees, and a *weighted
//! sampler* picks a leaf from that set in time proportional to the
//! decomposition size, not the number of matching points.
//!
//! Two tree families are provided: [`RangeTree`], a multidimensional range
//! tree with associated trees per node, and [`KdTree`], a bounding-box k-d
//! tree that also handles unbounded orthant regions. For 2-D rectangular
//! queries answered through a pair of 3-sided sub-queries there is
//! [`RectangularSearchTree`].
//!
//! Two sampling modes are supported on both tree families:
//! *independent* sampling redraws its randomness on every call, while
//! *consistent* sampling uses keys fixed at construction time, so the same
//! canonical set always yields the same element.
//!
//! ## Installation
//!
//! Add `pickd` to `Cargo.toml`
//! ```toml
//! [dependencies]
//! pickd = "0.4"
//! ```
//!
//! ## Usage
//! ```rust
//! use pickd::{ColorWeights, QueryRegion, RangeTree};
//!
//! let mut weights: ColorWeights<&str, f64> = ColorWeights::new();
//! weights.insert("red", 1.0).unwrap();
//! weights.insert("blue", 3.0).unwrap();
//!
//! let points = vec![[1.0, 4.0], [2.0, 1.0], [3.0, 2.0], [4.0, 3.0]];
//! let colors = vec!["red", "blue", "red", "blue"];
//!
//! let mut rng = rand::rng();
//! let tree: RangeTree<f64, u32, 2> =
//!     RangeTree::build(&points, &colors, &weights, &mut rng).unwrap();
//!
//! let region = QueryRegion::new([1.5, 0.0], [4.5, 2.5]);
//! let set = tree.canonical_set(&region);
//!
//! // items 1 and 2 are inside; a sample returns one of them
//! let sampled = tree.sample_independent(&set, &mut rng).unwrap();
//! assert!(sampled == 1 || sampled == 2);
//! ```

pub mod canonical;
pub mod colors;
mod entry;
pub mod errors;
pub mod kd;
pub mod range;
pub mod rect;
pub mod region;
mod sampling;
#[doc(hidden)]
#[cfg(feature = "test_utils")]
pub mod test_utils;
pub mod types;

pub use crate::canonical::CanonicalSet;
pub use crate::colors::ColorWeights;
pub use crate::errors::BuildError;
pub use crate::kd::tree::KdTree;
pub use crate::range::tree::RangeTree;
pub use crate::rect::tree::RectangularSearchTree;
pub use crate::region::QueryRegion;
