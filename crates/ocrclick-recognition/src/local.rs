//! Local OCR engine backed by the Tesseract CLI.

use std::path::Path;

use ocrclick_config::LocalEngineConfig;
use ocrclick_protocols::{BoundingBox, RecognitionError, RecognitionResult, RecognizedItem};
use tokio::process::Command;
use tracing::{debug, info};

/// TSV `level` of a single word.
const WORD_LEVEL: &str = "5";

/// Tesseract invocation settings, validated once by [`LocalEngine::load`].
#[derive(Debug)]
pub struct LocalEngine {
    binary: String,
    languages: String,
    page_segmentation: u8,
    version: String,
}

impl LocalEngine {
    /// Check that the engine binary runs.
    ///
    /// This is the one-time model load; callers cache the returned engine.
    pub async fn load(config: &LocalEngineConfig) -> Result<Self, RecognitionError> {
        info!("Loading local OCR engine ({})", config.binary);

        let output = Command::new(&config.binary)
            .arg("--version")
            .output()
            .await
            .map_err(|e| {
                RecognitionError::BackendUnavailable(format!(
                    "cannot run '{}': {}. Install with: apt install tesseract-ocr",
                    config.binary, e
                ))
            })?;

        if !output.status.success() {
            return Err(RecognitionError::BackendUnavailable(format!(
                "'{} --version' exited with {}",
                config.binary, output.status
            )));
        }

        // Older releases print the banner on stderr.
        let version = first_line(&output.stdout)
            .or_else(|| first_line(&output.stderr))
            .unwrap_or_else(|| "unknown version".to_string());
        info!("Local OCR engine loaded: {}", version);

        Ok(Self {
            binary: config.binary.clone(),
            languages: config.languages.clone(),
            page_segmentation: config.page_segmentation,
            version,
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Recognize text lines in the image, in engine order.
    pub async fn recognize(&self, image: &Path) -> Result<RecognitionResult, RecognitionError> {
        if !image.exists() {
            return Err(RecognitionError::InvalidImage(format!(
                "File not found: {}",
                image.display()
            )));
        }

        let output = Command::new(&self.binary)
            .arg(image)
            .arg("stdout")
            .arg("-l")
            .arg(&self.languages)
            .arg("--psm")
            .arg(self.page_segmentation.to_string())
            .arg("tsv")
            .output()
            .await
            .map_err(|e| RecognitionError::BackendUnavailable(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RecognitionError::BackendError(stderr.trim().to_string()));
        }

        let items = parse_tsv(&String::from_utf8_lossy(&output.stdout));
        debug!("Local engine recognized {} lines in {}", items.len(), image.display());
        Ok(items)
    }
}

fn first_line(bytes: &[u8]) -> Option<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

/// Words of one `(page, block, paragraph, line)` group.
struct LineAccumulator {
    key: (u32, u32, u32, u32),
    words: Vec<String>,
    bbox: BoundingBox,
    conf_sum: f32,
}

impl LineAccumulator {
    fn into_item(self) -> RecognizedItem {
        let mean = self.conf_sum / self.words.len() as f32;
        let score = (mean / 100.0).clamp(0.0, 1.0);
        RecognizedItem::from_bbox(self.words.join(" "), self.bbox, score)
    }
}

/// Parse `tesseract ... tsv` output into one item per text line.
///
/// Only word rows with text and a non-negative confidence are kept. Malformed
/// rows are skipped.
pub fn parse_tsv(tsv: &str) -> RecognitionResult {
    let mut items = Vec::new();
    let mut current: Option<LineAccumulator> = None;

    for row in tsv.lines() {
        let fields: Vec<&str> = row.split('\t').collect();
        if fields.len() < 12 || fields[0] != WORD_LEVEL {
            continue;
        }

        let text = fields[11].trim();
        let Ok(conf) = fields[10].trim().parse::<f32>() else {
            continue;
        };
        if text.is_empty() || conf < 0.0 {
            continue;
        }

        let Some((key, bbox)) = parse_geometry(&fields) else {
            continue;
        };

        match current.as_mut() {
            Some(line) if line.key == key => {
                line.words.push(text.to_string());
                line.bbox = union(line.bbox, bbox);
                line.conf_sum += conf;
            }
            _ => {
                if let Some(done) = current.take() {
                    items.push(done.into_item());
                }
                current = Some(LineAccumulator {
                    key,
                    words: vec![text.to_string()],
                    bbox,
                    conf_sum: conf,
                });
            }
        }
    }

    if let Some(done) = current {
        items.push(done.into_item());
    }
    items
}

fn parse_geometry(fields: &[&str]) -> Option<((u32, u32, u32, u32), BoundingBox)> {
    let num = |i: usize| fields[i].trim().parse::<i32>().ok();
    let key = (
        u32::try_from(num(1)?).ok()?,
        u32::try_from(num(2)?).ok()?,
        u32::try_from(num(3)?).ok()?,
        u32::try_from(num(4)?).ok()?,
    );
    let (left, top, width, height) = (num(6)?, num(7)?, num(8)?, num(9)?);
    Some((key, BoundingBox::new(left, top, left + width, top + height)))
}

fn union(a: BoundingBox, b: BoundingBox) -> BoundingBox {
    BoundingBox::new(a.x1.min(b.x1), a.y1.min(b.y1), a.x2.max(b.x2), a.y2.max(b.y2))
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
