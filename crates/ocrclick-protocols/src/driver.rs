//! Page driver trait definition.

use async_trait::async_trait;

use crate::error::DriverError;

/// A live page that can be captured and clicked.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Capture the visible viewport as PNG bytes.
    async fn screenshot(&self) -> Result<Vec<u8>, DriverError>;

    /// Dispatch a left click at CSS pixel coordinates.
    async fn click(&self, x: i32, y: i32) -> Result<(), DriverError>;

    /// Evaluate a JavaScript expression and return its JSON value.
    async fn evaluate(&self, expression: &str) -> Result<serde_json::Value, DriverError>;
}
