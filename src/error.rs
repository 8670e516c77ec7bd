use std::fmt::Debug;
use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpatialIndexError {
    /// The index was queried before a successful `build`.
    #[error("Index not built: call build() after adding items")]
    NotBuilt,

    /// A vector or probe has fewer components than the index dimensionality.
    #[error("Invalid dimension: expected at least {expected} components, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    /// A vector carries a NaN or infinite component on an indexed axis.
    #[error("Non-finite coordinate on axis {axis}")]
    NonFiniteCoordinate { axis: usize },
}

pub type Result<T> = std::result::Result<T, SpatialIndexError>;
