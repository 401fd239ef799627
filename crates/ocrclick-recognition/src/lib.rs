//! # ocrclick Recognition
//!
//! Text recognition backends behind the [`Recognizer`] trait:
//!
//! - [`RemoteOcrClient`] talks to a long-running OCR HTTP service.
//! - [`LocalEngine`] runs the Tesseract CLI in-process.
//! - [`RecognitionAdapter`] probes the service once and routes every call to
//!   the selected backend, loading the local engine only when needed.
//!
//! [`Recognizer`]: ocrclick_protocols::Recognizer

mod adapter;
mod local;
mod remote;
pub mod wire;

pub use adapter::{resolve_in_image, BackendKind, RecognitionAdapter};
pub use local::{parse_tsv, LocalEngine};
pub use remote::RemoteOcrClient;
