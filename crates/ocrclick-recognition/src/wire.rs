//! JSON bodies of the OCR HTTP service.
//!
//! Shared by [`RemoteOcrClient`](crate::RemoteOcrClient) and the `serve`
//! subcommand so both ends agree on the contract.

use ocrclick_protocols::{MatchQuery, RecognizedItem, Region};
use serde::{Deserialize, Serialize};

/// `error` value of a `/find` miss.
pub const NOT_FOUND: &str = "not_found";

/// `POST /ocr` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrRequest {
    /// Filesystem path when `is_path`, otherwise base64-encoded image bytes.
    pub image: String,
    #[serde(default)]
    pub is_path: bool,
}

/// `POST /find` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindRequest {
    pub image: String,
    #[serde(default)]
    pub is_path: bool,
    pub target: String,
    #[serde(default)]
    pub exact: bool,
    #[serde(default)]
    pub region: Option<Region>,
    #[serde(default)]
    pub near: Option<String>,
}

impl FindRequest {
    pub fn new(image: String, is_path: bool, query: &MatchQuery) -> Self {
        Self {
            image,
            is_path,
            target: query.target.clone(),
            exact: query.exact,
            region: query.region,
            near: query.near.clone(),
        }
    }

    pub fn query(&self) -> MatchQuery {
        MatchQuery::new(self.target.clone())
            .with_exact(self.exact)
            .with_region(self.region)
            .with_near(self.near.clone())
    }
}

/// `POST /ocr` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<RecognizedItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OcrResponse {
    pub fn success(items: Vec<RecognizedItem>, text: String) -> Self {
        Self {
            ok: true,
            items: Some(items),
            text: Some(text),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }
}

/// `POST /find` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FindResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<RecognizedItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Every recognized text, reported on a miss.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texts: Option<Vec<String>>,
}

impl FindResponse {
    pub fn found(item: RecognizedItem) -> Self {
        Self {
            ok: true,
            item: Some(item),
            ..Default::default()
        }
    }

    pub fn not_found(texts: Vec<String>) -> Self {
        Self {
            ok: false,
            error: Some(NOT_FOUND.to_string()),
            texts: Some(texts),
            ..Default::default()
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn is_not_found(&self) -> bool {
        !self.ok && self.error.as_deref() == Some(NOT_FOUND)
    }
}
