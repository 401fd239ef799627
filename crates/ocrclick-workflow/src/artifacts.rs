//! Debug artifacts preserved from failed runs.

use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{info, warn};

const MAX_REASON_LEN: usize = 40;

/// Directory collecting screenshots of failed runs.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Copy `src` to `<dir>/<YYYYmmdd_HHMMSS_mmm>_<reason>.png`.
    ///
    /// An existing file is never overwritten; a `_<n>` suffix is added instead.
    pub fn preserve(&self, src: &Path, reason: &str) -> io::Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let stem = format!(
            "{}_{}",
            Local::now().format("%Y%m%d_%H%M%S_%3f"),
            sanitize_reason(reason)
        );
        let mut dest = self.dir.join(format!("{}.png", stem));
        let mut n = 1;
        while dest.exists() {
            dest = self.dir.join(format!("{}_{}.png", stem, n));
            n += 1;
        }
        std::fs::copy(src, &dest)?;
        info!("Saved debug screenshot to {}", dest.display());
        Ok(dest)
    }

    /// [`preserve`](Self::preserve), logging instead of failing.
    pub fn preserve_or_warn(&self, src: &Path, reason: &str) -> Option<PathBuf> {
        match self.preserve(src, reason) {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Failed to save debug screenshot to {}: {}", self.dir.display(), e);
                None
            }
        }
    }
}

/// Collapse runs of non-alphanumeric characters to `_` and cap the length.
pub fn sanitize_reason(reason: &str) -> String {
    let mut out = String::with_capacity(reason.len());
    let mut pending_sep = false;
    for c in reason.chars() {
        if c.is_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(c);
        } else {
            pending_sep = true;
        }
    }

    let truncated: String = out.chars().take(MAX_REASON_LEN).collect();
    let trimmed = truncated.trim_end_matches('_');
    if trimmed.is_empty() {
        "unknown".to_string()
    } else {
        trimmed.to_string()
    }
}
