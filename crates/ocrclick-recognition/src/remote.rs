//! Client for the OCR HTTP service.

use std::path::{Path, PathBuf};
use std::time::Duration;

use base64::Engine;
use ocrclick_config::{ImageTransport, RecognitionConfig};
use ocrclick_protocols::{MatchQuery, RecognitionError, RecognitionResult, RecognizedItem};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::wire::{FindRequest, FindResponse, OcrRequest, OcrResponse};

/// HTTP client for `/health`, `/ocr` and `/find`.
pub struct RemoteOcrClient {
    base_url: String,
    client: reqwest::Client,
    probe_timeout: Duration,
    request_timeout: Duration,
    transport: ImageTransport,
}

impl RemoteOcrClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            probe_timeout: Duration::from_secs(1),
            request_timeout: Duration::from_secs(30),
            transport: ImageTransport::Path,
        }
    }

    pub fn from_config(config: &RecognitionConfig) -> Self {
        Self::new(config.server_url.clone())
            .with_probe_timeout(Duration::from_millis(config.probe_timeout_ms))
            .with_request_timeout(Duration::from_secs(config.request_timeout_secs))
            .with_transport(config.image_transport)
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_transport(mut self, transport: ImageTransport) -> Self {
        self.transport = transport;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// True iff `GET /health` answers 200 within the probe timeout.
    pub async fn health(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        match self
            .client
            .get(&url)
            .timeout(self.probe_timeout)
            .send()
            .await
        {
            Ok(resp) => resp.status() == reqwest::StatusCode::OK,
            Err(e) => {
                debug!("OCR service probe at {} failed: {}", url, e);
                false
            }
        }
    }

    /// Recognize every text item in the image.
    pub async fn ocr(&self, image: &Path) -> Result<RecognitionResult, RecognitionError> {
        let (image, is_path) = self.encode_image(image).await?;
        let resp: OcrResponse = self.post("ocr", &OcrRequest { image, is_path }).await?;

        if !resp.ok {
            return Err(RecognitionError::BackendError(
                resp.error.unwrap_or_else(|| "OCR failed".to_string()),
            ));
        }
        Ok(resp.items.unwrap_or_default())
    }

    /// Ask the service to resolve `query`; a `not_found` answer is `Ok(None)`.
    pub async fn find(
        &self,
        image: &Path,
        query: &MatchQuery,
    ) -> Result<Option<RecognizedItem>, RecognitionError> {
        let (image, is_path) = self.encode_image(image).await?;
        let resp: FindResponse = self
            .post("find", &FindRequest::new(image, is_path, query))
            .await?;

        if resp.is_not_found() {
            debug!(
                "Service reported no match for {:?} among {} texts",
                query.target,
                resp.texts.as_ref().map_or(0, Vec::len)
            );
            return Ok(None);
        }
        if !resp.ok {
            return Err(RecognitionError::BackendError(
                resp.error.unwrap_or_else(|| "find failed".to_string()),
            ));
        }
        match resp.item {
            Some(item) => Ok(Some(item)),
            None => Err(RecognitionError::BackendError(
                "response has ok=true but no item".to_string(),
            )),
        }
    }

    async fn encode_image(&self, image: &Path) -> Result<(String, bool), RecognitionError> {
        match self.transport {
            ImageTransport::Path => {
                let path = std::path::absolute(image).unwrap_or_else(|_| PathBuf::from(image));
                Ok((path.to_string_lossy().into_owned(), true))
            }
            ImageTransport::Base64 => {
                let bytes = tokio::fs::read(image).await?;
                Ok((base64::engine::general_purpose::STANDARD.encode(bytes), false))
            }
        }
    }

    async fn post<B, R>(&self, endpoint: &str, body: &B) -> Result<R, RecognitionError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self
            .client
            .post(&url)
            .timeout(self.request_timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| RecognitionError::BackendUnavailable(format!("{}: {}", url, e)))?;

        // Error statuses still carry an `{ok:false, error}` body.
        let status = response.status();
        response.json::<R>().await.map_err(|e| {
            RecognitionError::BackendError(format!(
                "invalid response from {} (HTTP {}): {}",
                url,
                status.as_u16(),
                e
            ))
        })
    }
}

#[cfg(test)]
#[path = "remote_tests.rs"]
mod tests;
