//! The OCR HTTP service behind `ocrclick serve`.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use axum::{extract::State, http::StatusCode, routing::get, routing::post, Json, Router};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use ocrclick_config::{BackendMode, Config};
use ocrclick_protocols::{sort_reading_order, RecognitionResult, Recognizer};
use ocrclick_recognition::wire::{FindRequest, FindResponse, OcrRequest, OcrResponse};
use ocrclick_recognition::{resolve_in_image, RecognitionAdapter};
use serde_json::{json, Value};
use tempfile::NamedTempFile;
use tracing::{info, warn};

/// Shared state of the service.
pub(crate) type SharedRecognizer = Arc<dyn Recognizer>;

/// Build the service router.
pub(crate) fn router(recognizer: SharedRecognizer) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ocr", post(ocr))
        .route("/find", post(find))
        .with_state(recognizer)
}

/// Serve the local engine until the process is stopped.
pub(crate) async fn run_server(config: Config) -> anyhow::Result<()> {
    let mut recognition = config.recognition.clone();
    recognition.backend = BackendMode::Local;
    let adapter = RecognitionAdapter::new(recognition);

    // Fail at startup rather than on the first request.
    let engine = adapter
        .local_engine()
        .await
        .context("Local OCR engine is not available")?;
    info!("Local OCR engine ready: {}", engine.version());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("OCR service listening on http://{}", addr);

    axum::serve(listener, router(Arc::new(adapter)))
        .await
        .context("OCR service stopped")?;
    Ok(())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn ocr(
    State(recognizer): State<SharedRecognizer>,
    Json(request): Json<OcrRequest>,
) -> (StatusCode, Json<OcrResponse>) {
    let input = match ImageInput::resolve(&request.image, request.is_path) {
        Ok(input) => input,
        Err(message) => return (StatusCode::BAD_REQUEST, Json(OcrResponse::failure(message))),
    };
    match recognize_sorted(recognizer.as_ref(), input.path()).await {
        Ok(items) => {
            let text = ocrclick_core::build_text(&items);
            (StatusCode::OK, Json(OcrResponse::success(items, text)))
        }
        Err(message) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(OcrResponse::failure(message)),
        ),
    }
}

async fn find(
    State(recognizer): State<SharedRecognizer>,
    Json(request): Json<FindRequest>,
) -> (StatusCode, Json<FindResponse>) {
    let input = match ImageInput::resolve(&request.image, request.is_path) {
        Ok(input) => input,
        Err(message) => return (StatusCode::BAD_REQUEST, Json(FindResponse::failure(message))),
    };
    let items = match recognize_sorted(recognizer.as_ref(), input.path()).await {
        Ok(items) => items,
        Err(message) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(FindResponse::failure(message)),
            )
        }
    };

    let query = request.query();
    match resolve_in_image(&items, input.path(), &query) {
        Some(item) => (StatusCode::OK, Json(FindResponse::found(item))),
        None => {
            let texts = items.into_iter().map(|item| item.text).collect();
            (StatusCode::OK, Json(FindResponse::not_found(texts)))
        }
    }
}

async fn recognize_sorted(
    recognizer: &dyn Recognizer,
    image: &Path,
) -> Result<RecognitionResult, String> {
    let mut items = recognizer.recognize(image).await.map_err(|e| {
        warn!("Recognition of {} failed: {}", image.display(), e);
        e.to_string()
    })?;
    sort_reading_order(&mut items);
    Ok(items)
}

/// A request image, either on disk already or spooled from base64.
enum ImageInput {
    Path(PathBuf),
    Spooled(NamedTempFile),
}

impl ImageInput {
    fn resolve(image: &str, is_path: bool) -> Result<Self, String> {
        if is_path {
            let path = PathBuf::from(image);
            if !path.is_file() {
                return Err(format!("File not found: {}", image));
            }
            return Ok(Self::Path(path));
        }

        let bytes = STANDARD
            .decode(image.trim())
            .map_err(|e| format!("Invalid base64 image: {}", e))?;
        let mut file = tempfile::Builder::new()
            .prefix("ocrclick_req_")
            .suffix(".png")
            .tempfile()
            .map_err(|e| format!("Failed to spool image: {}", e))?;
        file.write_all(&bytes)
            .and_then(|_| file.flush())
            .map_err(|e| format!("Failed to spool image: {}", e))?;
        Ok(Self::Spooled(file))
    }

    fn path(&self) -> &Path {
        match self {
            Self::Path(path) => path,
            Self::Spooled(file) => file.path(),
        }
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
