//! # ocrclick Config
//!
//! TOML configuration for the recognition backends, the browser connection,
//! the click workflow, the OCR server and logging.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
