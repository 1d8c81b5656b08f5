//! Construction-time error types.

use thiserror::Error;

/// Errors surfaced while building a tree.
///
/// Construction aborts on the first error; no partially-built tree is ever
/// returned. An empty *query* result is not an error: samplers return
/// `None` for regions that contain no points.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// The input point set was empty.
    #[error("cannot build a tree over an empty point set")]
    EmptyPoints,

    /// Points and colors were supplied as slices of different lengths.
    #[error("points ({points}) and colors ({colors}) differ in length")]
    LengthMismatch {
        /// Number of points supplied.
        points: usize,
        /// Number of color labels supplied.
        colors: usize,
    },

    /// A point's color has no entry in the weight table.
    #[error("color {0} missing from the weight table")]
    UnknownColor(String),

    /// A color weight that is not strictly positive and finite.
    #[error("weight for color {0} is not positive and finite")]
    InvalidWeight(String),
}
