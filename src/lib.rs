#![doc = include_str!("../README.md")]

mod error;
pub mod kdtree;
mod pair;
pub mod sync;
mod r#trait;
mod r#type;
mod vector;

pub use error::{Result, SpatialIndexError};
pub use pair::CoordinatePair;
pub use r#trait::SpatialIndex;
pub use r#type::IndexableNum;
pub use vector::Vector;
