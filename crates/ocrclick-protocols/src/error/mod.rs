//! Error types for the ocrclick protocol layer.

mod driver;
mod recognition;

pub use driver::*;
pub use recognition::*;
