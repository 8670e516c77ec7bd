//! The (value, coordinate vector) association stored in a spatial index.

use std::hash::{Hash, Hasher};

use crate::r#type::IndexableNum;
use crate::vector::Vector;

/// An immutable association between a value and an n-dimensional coordinate vector.
///
/// The vector is copied on construction and every call to [`location`][Self::location] returns
/// an independent copy, so a stored key cannot be changed from outside.
///
/// Equality and hashing consider the vector only, and compare floating point components exactly.
/// Two pairs are equal only when their vectors are numerically identical, which makes this a poor
/// deduplication key.
#[derive(Debug, Clone)]
pub struct CoordinatePair<E, N: IndexableNum> {
    value: E,
    vector: Vector<N>,
}

impl<E, N: IndexableNum> CoordinatePair<E, N> {
    /// Create a new pair, copying the given vector.
    pub fn new(value: E, vector: &Vector<N>) -> Self {
        Self {
            value,
            vector: vector.clone(),
        }
    }

    /// Create a new pair from raw coordinates.
    pub fn from_coords(value: E, coords: &[N]) -> Self {
        Self {
            value,
            vector: Vector::from_slice(coords),
        }
    }

    /// The stored value.
    pub fn value(&self) -> &E {
        &self.value
    }

    /// A fresh copy of the stored vector.
    pub fn location(&self) -> Vector<N> {
        self.vector.clone()
    }

    /// The number of components of the stored vector.
    pub fn dimension(&self) -> usize {
        self.vector.len()
    }

    /// Consume this pair, returning the stored value.
    pub fn into_value(self) -> E {
        self.value
    }

    /// Borrow the stored vector without copying.
    #[inline]
    pub(crate) fn vector(&self) -> &Vector<N> {
        &self.vector
    }
}

impl<E, N: IndexableNum> PartialEq for CoordinatePair<E, N> {
    fn eq(&self, other: &Self) -> bool {
        self.vector == other.vector
    }
}

// NaN components never reach an index, so vector equality is reflexive for stored pairs
impl<E, N: IndexableNum> Eq for CoordinatePair<E, N> {}

impl<E, N: IndexableNum> Hash for CoordinatePair<E, N> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.vector.len().hash(state);
        for c in self.vector.as_slice() {
            let c = c.as_f64();
            // -0.0 == 0.0, so they must hash alike
            let c = if c == 0.0 { 0.0f64 } else { c };
            c.to_bits().hash(state);
        }
    }
}

#[cfg(test)]
mod test {
    use std::collections::hash_map::DefaultHasher;

    use super::*;

    fn hash_of<E>(pair: &CoordinatePair<E, f64>) -> u64 {
        let mut hasher = DefaultHasher::new();
        pair.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn location_is_a_copy() {
        let mut source = vec![1.0, 2.0];
        let pair = CoordinatePair::from_coords("a", &source);
        source[0] = 99.0;

        let mut loc = pair.location().into_inner();
        loc[1] = -1.0;

        assert_eq!(pair.location().as_slice(), &[1.0, 2.0]);
        assert_eq!(*pair.value(), "a");
    }

    #[test]
    fn equality_ignores_value() {
        let a = CoordinatePair::from_coords("a", &[1.0, 0.0]);
        let b = CoordinatePair::from_coords("b", &[1.0, -0.0]);
        let c = CoordinatePair::from_coords("a", &[1.0, 0.5]);

        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_ne!(a, c);
    }
}
