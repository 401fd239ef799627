//! CDP error types.

use ocrclick_protocols::DriverError;
use thiserror::Error;

/// CDP client errors.
#[derive(Debug, Error)]
pub enum CdpError {
    /// Failed to connect to Chrome.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Chrome not running with remote debugging at this endpoint.
    #[error("Chrome not available at {0}. Start Chrome with: chrome --remote-debugging-port=18800")]
    ChromeNotAvailable(String),

    #[error("Chrome not found. Install Google Chrome or set browser.chrome_path.")]
    ChromeNotFound,

    #[error("Failed to launch Chrome: {0}")]
    LaunchFailed(String),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Error object returned by the browser.
    #[error("CDP error: {message} (code: {code})")]
    Protocol { code: i64, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error during endpoint discovery.
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("JavaScript error: {0}")]
    JavaScript(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Session closed")]
    SessionClosed,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for CdpError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        CdpError::WebSocket(e.to_string())
    }
}

impl From<reqwest::Error> for CdpError {
    fn from(e: reqwest::Error) -> Self {
        CdpError::Http(e.to_string())
    }
}

impl From<url::ParseError> for CdpError {
    fn from(e: url::ParseError) -> Self {
        CdpError::ConnectionFailed(format!("Invalid URL: {}", e))
    }
}

impl From<CdpError> for DriverError {
    fn from(e: CdpError) -> Self {
        match e {
            CdpError::ConnectionFailed(msg) | CdpError::ChromeNotAvailable(msg) => {
                DriverError::ConnectionFailed(msg)
            }
            CdpError::SessionClosed | CdpError::WebSocket(_) => {
                DriverError::ConnectionFailed(e.to_string())
            }
            CdpError::InvalidResponse(msg) => DriverError::InvalidResponse(msg),
            CdpError::JavaScript(msg) => DriverError::ActionFailed(format!("JS error: {}", msg)),
            _ => DriverError::ActionFailed(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_display() {
        let err = CdpError::Protocol {
            code: -32000,
            message: "No target with given id".to_string(),
        };
        assert_eq!(err.to_string(), "CDP error: No target with given id (code: -32000)");
    }

    #[test]
    fn test_not_available_hint() {
        let err = CdpError::ChromeNotAvailable("http://127.0.0.1:18800".to_string());
        assert!(err.to_string().contains("--remote-debugging-port"));
    }

    #[test]
    fn test_into_driver_error() {
        let e: DriverError = CdpError::SessionClosed.into();
        assert!(matches!(e, DriverError::ConnectionFailed(_)));

        let e: DriverError = CdpError::ChromeNotAvailable("x".to_string()).into();
        assert!(matches!(e, DriverError::ConnectionFailed(ref m) if m == "x"));

        let e: DriverError = CdpError::JavaScript("boom".to_string()).into();
        assert!(matches!(e, DriverError::ActionFailed(ref m) if m.contains("boom")));

        let e: DriverError = CdpError::InvalidResponse("no data".to_string()).into();
        assert!(matches!(e, DriverError::InvalidResponse(_)));

        let e: DriverError = CdpError::Timeout("Page.navigate".to_string()).into();
        assert!(matches!(e, DriverError::ActionFailed(_)));
    }

    #[test]
    fn test_url_parse_error() {
        let e: CdpError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(e, CdpError::ConnectionFailed(_)));
    }
}
