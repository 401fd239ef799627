//! Recognizer trait definition.

use std::path::Path;

use async_trait::async_trait;

use crate::error::RecognitionError;
use crate::types::{MatchQuery, RecognitionResult, RecognizedItem};

/// Turns an image on disk into recognized text items.
///
/// Implementations decide where recognition happens (in-process engine or a
/// remote service); callers only see the canonical item list.
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Recognize every text fragment in the image.
    async fn recognize(&self, image: &Path) -> Result<RecognitionResult, RecognitionError>;

    /// Resolve the single best item for `query`.
    ///
    /// `Ok(None)` is the ordinary "not found" outcome.
    async fn find(
        &self,
        image: &Path,
        query: &MatchQuery,
    ) -> Result<Option<RecognizedItem>, RecognitionError>;
}
