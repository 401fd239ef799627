use ocrclick_protocols::{DriverError, RecognitionError};
use thiserror::Error;

/// Unexpected failures; expected misses are [`ClickOutcome`](crate::ClickOutcome)s.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error(transparent)]
    Recognition(#[from] RecognitionError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
