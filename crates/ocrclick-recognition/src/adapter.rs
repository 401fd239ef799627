//! Backend selection.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use ocrclick_config::{BackendMode, RecognitionConfig};
use ocrclick_core::{find_item, ImageSize};
use ocrclick_protocols::{
    MatchQuery, RecognitionError, RecognitionResult, RecognizedItem, Recognizer,
};
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::local::LocalEngine;
use crate::remote::RemoteOcrClient;

/// Backend serving recognition calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Remote,
    Local,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote => write!(f, "remote"),
            Self::Local => write!(f, "local"),
        }
    }
}

/// [`Recognizer`] choosing between the OCR service and the local engine.
///
/// In `auto` mode the service is probed once, on first use; the answer is
/// kept for the adapter's lifetime. The local engine is loaded at most once,
/// and only when the local backend serves a call.
pub struct RecognitionAdapter {
    config: RecognitionConfig,
    remote: RemoteOcrClient,
    backend: OnceCell<BackendKind>,
    engine: OnceCell<Arc<LocalEngine>>,
}

impl RecognitionAdapter {
    pub fn new(config: RecognitionConfig) -> Self {
        let remote = RemoteOcrClient::from_config(&config);
        Self {
            config,
            remote,
            backend: OnceCell::new(),
            engine: OnceCell::new(),
        }
    }

    /// The selected backend, probing the service on the first call.
    pub async fn backend(&self) -> BackendKind {
        *self
            .backend
            .get_or_init(|| async {
                let kind = match self.config.backend {
                    BackendMode::Remote => BackendKind::Remote,
                    BackendMode::Local => BackendKind::Local,
                    BackendMode::Auto => {
                        if self.remote.health().await {
                            BackendKind::Remote
                        } else {
                            BackendKind::Local
                        }
                    }
                };
                info!(
                    "Using {} OCR backend (mode={:?}, service={})",
                    kind,
                    self.config.backend,
                    self.remote.base_url()
                );
                kind
            })
            .await
    }

    /// The local engine, loading it on first use.
    pub async fn local_engine(&self) -> Result<Arc<LocalEngine>, RecognitionError> {
        self.engine
            .get_or_try_init(|| async {
                LocalEngine::load(&self.config.local).await.map(Arc::new)
            })
            .await
            .cloned()
    }
}

/// Resolve `query` over locally recognized items.
///
/// The image size is read only when a region is requested; if it cannot be
/// read the region constraint is dropped.
pub fn resolve_in_image(
    items: &[RecognizedItem],
    image: &Path,
    query: &MatchQuery,
) -> Option<RecognizedItem> {
    let size = if query.region.is_some() {
        match image::image_dimensions(image) {
            Ok((width, height)) => Some(ImageSize::new(width, height)),
            Err(e) => {
                warn!(
                    "Cannot read size of {}, ignoring region filter: {}",
                    image.display(),
                    e
                );
                None
            }
        }
    } else {
        None
    };
    find_item(items, query, size).cloned()
}

#[async_trait]
impl Recognizer for RecognitionAdapter {
    async fn recognize(&self, image: &Path) -> Result<RecognitionResult, RecognitionError> {
        match self.backend().await {
            BackendKind::Remote => self.remote.ocr(image).await,
            BackendKind::Local => self.local_engine().await?.recognize(image).await,
        }
    }

    async fn find(
        &self,
        image: &Path,
        query: &MatchQuery,
    ) -> Result<Option<RecognizedItem>, RecognitionError> {
        match self.backend().await {
            BackendKind::Remote => self.remote.find(image, query).await,
            BackendKind::Local => {
                let items = self.local_engine().await?.recognize(image).await?;
                Ok(resolve_in_image(&items, image, query))
            }
        }
    }
}

#[cfg(test)]
#[path = "adapter_tests.rs"]
mod tests;
