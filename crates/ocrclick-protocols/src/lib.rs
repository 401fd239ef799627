//! # ocrclick Protocols
//!
//! Data model and interface definitions shared by every ocrclick crate.
//! Contains only types and traits - no implementations.
//!
//! ## Core Traits
//!
//! - [`Recognizer`] - Turns an image into a list of [`RecognizedItem`]s
//! - [`PageDriver`] - Screenshot, click and evaluate on a live page

pub mod driver;
pub mod error;
pub mod recognizer;
pub mod types;

pub use driver::PageDriver;
pub use error::{DriverError, RecognitionError};
pub use recognizer::Recognizer;
pub use types::*;
