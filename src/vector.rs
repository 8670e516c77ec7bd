//! An owned, fixed-length coordinate vector.

use std::ops::{Index, Sub};

use crate::r#type::IndexableNum;

/// An n-dimensional coordinate vector.
///
/// Indexes only ever read the first `dim` components of a vector, where `dim` is the
/// dimensionality the index was created with. Any further components are carried along untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Vector<N: IndexableNum> {
    coords: Vec<N>,
}

impl<N: IndexableNum> Vector<N> {
    /// Create a new vector taking ownership of the given components.
    pub fn new(coords: Vec<N>) -> Self {
        Self { coords }
    }

    /// Create a new vector by copying the given components.
    pub fn from_slice(coords: &[N]) -> Self {
        Self {
            coords: coords.to_vec(),
        }
    }

    /// The number of components in this vector.
    #[inline]
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Returns `true` if this vector has no components.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// The components of this vector.
    #[inline]
    pub fn as_slice(&self) -> &[N] {
        &self.coords
    }

    /// Consume this vector, returning its components.
    pub fn into_inner(self) -> Vec<N> {
        self.coords
    }

    /// The dot product of this vector with another, over their shared components.
    pub fn dot(&self, other: &Self) -> f64 {
        self.coords
            .iter()
            .zip(other.coords.iter())
            .map(|(a, b)| a.as_f64() * b.as_f64())
            .sum()
    }

    /// The Euclidean norm of this vector.
    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Euclidean distance to another vector, over their shared components.
    pub fn distance(&self, other: &Self) -> f64 {
        self.distance_prefix(other, self.len().min(other.len()))
    }

    /// Euclidean distance to another vector, over the first `dim` components only.
    ///
    /// Both vectors must have at least `dim` components. Only distances beyond `f64::MAX`
    /// saturate to infinity; squaring very large or very small differences does not overflow.
    #[inline]
    pub fn distance_prefix(&self, other: &Self, dim: usize) -> f64 {
        euclidean(&self.coords[..dim], &other.coords[..dim])
    }
}

impl<N: IndexableNum> Index<usize> for Vector<N> {
    type Output = N;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.coords[index]
    }
}

impl<N: IndexableNum> Sub for &Vector<N> {
    type Output = Vector<N>;

    /// Component-wise difference over the shared components.
    fn sub(self, rhs: Self) -> Self::Output {
        Vector::new(
            self.coords
                .iter()
                .zip(rhs.coords.iter())
                .map(|(a, b)| *a - *b)
                .collect(),
        )
    }
}

impl<N: IndexableNum> From<Vec<N>> for Vector<N> {
    fn from(value: Vec<N>) -> Self {
        Self::new(value)
    }
}

impl<N: IndexableNum, const D: usize> From<[N; D]> for Vector<N> {
    fn from(value: [N; D]) -> Self {
        Self::new(value.to_vec())
    }
}

impl<N: IndexableNum> From<&[N]> for Vector<N> {
    fn from(value: &[N]) -> Self {
        Self::from_slice(value)
    }
}

#[inline]
fn sq_dist<N: IndexableNum>(a: &[N], b: &[N]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(a, b)| {
            let d = a.as_f64() - b.as_f64();
            d * d
        })
        .sum()
}

/// Euclidean distance between `a` and `b`.
///
/// Falls back to scaling by the largest component difference, like `hypot`, when the plain sum
/// of squares overflows or underflows.
#[inline]
fn euclidean<N: IndexableNum>(a: &[N], b: &[N]) -> f64 {
    let sum = sq_dist(a, b);
    if sum.is_finite() && sum >= f64::MIN_POSITIVE {
        return sum.sqrt();
    }

    let scale = a
        .iter()
        .zip(b.iter())
        .map(|(a, b)| (a.as_f64() - b.as_f64()).abs())
        .fold(0.0, f64::max);
    // zero, or a single difference already beyond f64::MAX
    if scale == 0.0 || scale.is_infinite() {
        return scale;
    }

    let scaled: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(a, b)| {
            let d = (a.as_f64() - b.as_f64()) / scale;
            d * d
        })
        .sum();
    scale * scaled.sqrt()
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn distance_ignores_trailing_components() {
        let a = Vector::from([0.0, 0.0, 100.0]);
        let b = Vector::from([3.0, 4.0, -50.0]);
        assert_relative_eq!(a.distance_prefix(&b, 2), 5.0);
        assert_relative_eq!(a.distance(&Vector::from([3.0, 4.0])), 5.0);
    }

    #[test]
    fn distance_of_extreme_magnitudes() {
        let origin = Vector::from([0.0, 0.0]);
        assert_relative_eq!(origin.distance(&Vector::from([3e200, 4e200])), 5e200);
        assert_relative_eq!(origin.distance(&Vector::from([3e-200, 4e-200])), 5e-200);
        assert_relative_eq!(
            Vector::from([1e308]).distance(&Vector::from([0.0])),
            1e308
        );
        assert_eq!(
            Vector::from([f64::MAX]).distance(&Vector::from([-f64::MAX])),
            f64::INFINITY
        );
        assert_eq!(origin.distance(&origin), 0.0);
    }

    #[test]
    fn sub_and_norm() {
        let a = Vector::from([4.0f32, 6.0]);
        let b = Vector::from([1.0f32, 2.0]);
        let d = &a - &b;
        assert_eq!(d.as_slice(), &[3.0, 4.0]);
        assert_relative_eq!(d.norm(), 5.0);
        assert_relative_eq!(a.dot(&b), 16.0);
    }
}
