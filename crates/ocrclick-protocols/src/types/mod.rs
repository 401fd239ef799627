//! Common types used across ocrclick.

mod geometry;
mod item;
mod query;

pub use geometry::*;
pub use item::*;
pub use query::*;
