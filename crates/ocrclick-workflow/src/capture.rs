//! Transient screenshot files.

use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// A screenshot written to a `.png` temp file, removed on drop.
#[derive(Debug)]
pub struct CapturedScreenshot {
    file: NamedTempFile,
}

impl CapturedScreenshot {
    pub fn write(png: &[u8]) -> io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("ocrclick-")
            .suffix(".png")
            .tempfile()?;
        file.write_all(png)?;
        file.flush()?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Copy the screenshot to `dest`, creating parent directories.
    pub fn save_copy(&self, dest: &Path) -> io::Result<()> {
        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(self.path(), dest)?;
        Ok(())
    }
}
