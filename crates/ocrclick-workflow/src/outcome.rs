//! Terminal results of a workflow run.

use std::path::{Path, PathBuf};

use ocrclick_protocols::{Point, RecognizedItem};
use crate::state::WorkflowState;

/// How a run ended. Misses and failed assertions are outcomes, not errors.
#[derive(Debug, Clone)]
pub enum ClickOutcome {
    /// Matched without clicking.
    Found { item: RecognizedItem },
    /// Clicked; no post-click assertion ran.
    Clicked { item: RecognizedItem, at: Point },
    /// Clicked and every assertion held.
    Verified { item: RecognizedItem, at: Point },
    NotFound {
        target: String,
        visible: Vec<String>,
        artifact: Option<PathBuf>,
    },
    ExpectationFailed {
        item: RecognizedItem,
        at: Point,
        expected: String,
        visible: Vec<String>,
        artifact: Option<PathBuf>,
    },
    StillPresent {
        item: RecognizedItem,
        at: Point,
        unexpected: String,
        visible: Vec<String>,
        artifact: Option<PathBuf>,
    },
}

impl ClickOutcome {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            Self::Found { .. } | Self::Clicked { .. } | Self::Verified { .. }
        )
    }

    /// The matched item, if any.
    pub fn item(&self) -> Option<&RecognizedItem> {
        match self {
            Self::Found { item }
            | Self::Clicked { item, .. }
            | Self::Verified { item, .. }
            | Self::ExpectationFailed { item, .. }
            | Self::StillPresent { item, .. } => Some(item),
            Self::NotFound { .. } => None,
        }
    }

    /// Where the click landed, in CSS pixels.
    pub fn clicked_at(&self) -> Option<Point> {
        match self {
            Self::Clicked { at, .. }
            | Self::Verified { at, .. }
            | Self::ExpectationFailed { at, .. }
            | Self::StillPresent { at, .. } => Some(*at),
            Self::Found { .. } | Self::NotFound { .. } => None,
        }
    }

    pub fn visible(&self) -> &[String] {
        match self {
            Self::NotFound { visible, .. }
            | Self::ExpectationFailed { visible, .. }
            | Self::StillPresent { visible, .. } => visible,
            _ => &[],
        }
    }

    pub fn artifact(&self) -> Option<&Path> {
        match self {
            Self::NotFound { artifact, .. }
            | Self::ExpectationFailed { artifact, .. }
            | Self::StillPresent { artifact, .. } => artifact.as_deref(),
            _ => None,
        }
    }

    /// Short machine-readable failure reason.
    pub fn error(&self) -> Option<String> {
        match self {
            Self::NotFound { .. } => Some("not_found".to_string()),
            Self::ExpectationFailed { expected, .. } => {
                Some(format!("expected text not found: {}", expected))
            }
            Self::StillPresent { unexpected, .. } => {
                Some(format!("text still present: {}", unexpected))
            }
            _ => None,
        }
    }
}

/// Outcome plus the states visited on the way.
#[derive(Debug, Clone)]
pub struct ClickReport {
    pub outcome: ClickOutcome,
    pub states: Vec<WorkflowState>,
}

impl ClickReport {
    pub fn final_state(&self) -> Option<WorkflowState> {
        self.states.last().copied()
    }
}
