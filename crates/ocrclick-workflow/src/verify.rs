//! Post-click assertions over re-recognized text.

use ocrclick_protocols::RecognizedItem;

/// All texts joined by spaces, lowercased.
pub fn text_blob(items: &[RecognizedItem]) -> String {
    items
        .iter()
        .map(|item| item.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// The first `limit` texts, for failure diagnostics.
pub fn visible_texts(items: &[RecognizedItem], limit: usize) -> Vec<String> {
    items.iter().take(limit).map(|item| item.text.clone()).collect()
}

/// What the page should (not) show after the click.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expectation {
    pub present: Option<String>,
    pub absent: Option<String>,
}

/// Result of checking an [`Expectation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Passed,
    /// The expected text is missing.
    Missing(String),
    /// The text that should have disappeared is still there.
    StillPresent(String),
}

impl Expectation {
    pub fn new(present: Option<String>, absent: Option<String>) -> Self {
        Self { present, absent }
    }

    pub fn is_empty(&self) -> bool {
        self.present.is_none() && self.absent.is_none()
    }

    /// Case-insensitive substring checks; the presence check runs first.
    pub fn check(&self, items: &[RecognizedItem]) -> Verdict {
        let blob = text_blob(items);
        if let Some(present) = &self.present {
            if !blob.contains(&present.to_lowercase()) {
                return Verdict::Missing(present.clone());
            }
        }
        if let Some(absent) = &self.absent {
            if blob.contains(&absent.to_lowercase()) {
                return Verdict::StillPresent(absent.clone());
            }
        }
        Verdict::Passed
    }
}
