//! Recognition backend errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecognitionError {
    /// Neither the remote service nor the local engine can process the image.
    #[error("OCR backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The backend answered but reported a failure.
    #[error("OCR backend error: {0}")]
    BackendError(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_unavailable_display() {
        let err = RecognitionError::BackendUnavailable("tesseract not found".to_string());
        assert!(err.to_string().contains("unavailable"));
        assert!(err.to_string().contains("tesseract not found"));
    }

    #[test]
    fn test_backend_error_keeps_message() {
        let err = RecognitionError::BackendError("malformed image".to_string());
        assert_eq!(err.to_string(), "OCR backend error: malformed image");
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.png");
        let err = RecognitionError::from(io_err);
        assert!(err.to_string().contains("missing.png"));
    }
}
