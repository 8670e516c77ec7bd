//! A K-D tree over n-dimensional vectors, split at the running mean of each axis.

#![warn(missing_docs)]

mod builder;
mod index;
mod node;
mod search;

pub use index::KDTree;
pub use search::Neighbor;
