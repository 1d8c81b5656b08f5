//! Color-to-weight tables.
//!
//! Every point carries a category label (its "color"); the positive sampling
//! weight of a leaf is looked up from a [`ColorWeights`] table once, at
//! construction time. Colors are interned to dense ids in insertion order so
//! the trees never store or hash the caller's label type.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::errors::BuildError;
use crate::types::Axis;

/// Dense id assigned to a color when it is interned into a table.
pub(crate) type ColorId = u32;

/// A table mapping category labels ("colors") to positive sampling weights.
///
/// # Examples
///
/// ```rust
/// use pickd::ColorWeights;
///
/// let mut weights: ColorWeights<&str, f64> = ColorWeights::new();
/// weights.insert("red", 1.0).unwrap();
/// weights.insert("blue", 3.0).unwrap();
/// weights.insert("yellow", 6.0).unwrap();
///
/// assert_eq!(weights.len(), 3);
/// assert!(weights.insert("green", -1.0).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct ColorWeights<C, A> {
    ids: HashMap<C, ColorId>,
    weights: Vec<A>,
}

impl<C, A> ColorWeights<C, A>
where
    C: Eq + Hash + Clone + Debug,
    A: Axis,
{
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            ids: HashMap::new(),
            weights: Vec::new(),
        }
    }

    /// Builds a table from `(color, weight)` pairs.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = (C, A)>,
    {
        let mut table = Self::new();
        for (color, weight) in pairs {
            table.insert(color, weight)?;
        }
        Ok(table)
    }

    /// Inserts a color with the given weight, replacing any previous weight.
    ///
    /// Weights must be strictly positive and finite.
    pub fn insert(&mut self, color: C, weight: A) -> Result<(), BuildError> {
        if !(weight > A::zero() && weight.is_finite()) {
            return Err(BuildError::InvalidWeight(format!("{color:?}")));
        }
        match self.ids.get(&color) {
            Some(&id) => self.weights[id as usize] = weight,
            None => {
                let id = self.weights.len() as ColorId;
                self.ids.insert(color, id);
                self.weights.push(weight);
            }
        }
        Ok(())
    }

    /// Number of distinct colors in the table.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Returns `true` if no colors have been inserted.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub(crate) fn lookup(&self, color: &C) -> Option<(ColorId, A)> {
        self.ids
            .get(color)
            .map(|&id| (id, self.weights[id as usize]))
    }
}

impl<C, A> Default for ColorWeights<C, A>
where
    C: Eq + Hash + Clone + Debug,
    A: Axis,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::ColorWeights;
    use crate::errors::BuildError;

    #[test]
    fn interns_colors_in_insertion_order() {
        let mut table: ColorWeights<&str, f64> = ColorWeights::new();
        table.insert("red", 1.0).unwrap();
        table.insert("blue", 3.0).unwrap();

        assert_eq!(table.lookup(&"red"), Some((0, 1.0)));
        assert_eq!(table.lookup(&"blue"), Some((1, 3.0)));
        assert_eq!(table.lookup(&"yellow"), None);
    }

    #[test]
    fn reinsert_replaces_weight_but_keeps_id() {
        let mut table: ColorWeights<&str, f64> = ColorWeights::new();
        table.insert("red", 1.0).unwrap();
        table.insert("blue", 3.0).unwrap();
        table.insert("red", 5.0).unwrap();

        assert_eq!(table.lookup(&"red"), Some((0, 5.0)));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn rejects_non_positive_and_non_finite_weights() {
        let mut table: ColorWeights<&str, f64> = ColorWeights::new();
        assert!(matches!(
            table.insert("red", 0.0),
            Err(BuildError::InvalidWeight(_))
        ));
        assert!(table.insert("red", -2.0).is_err());
        assert!(table.insert("red", f64::NAN).is_err());
        assert!(table.insert("red", f64::INFINITY).is_err());
    }
}
