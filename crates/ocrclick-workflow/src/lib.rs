//! # ocrclick Workflow
//!
//! Drives one page interaction: screenshot, recognize, match, click, and
//! optionally re-screenshot to verify the page changed as expected.
//!
//! Screenshots live in temp files that are deleted on success and copied to
//! the debug directory by [`ArtifactStore`] when the run fails.

mod artifacts;
mod capture;
mod error;
mod outcome;
mod state;
mod verify;
mod workflow;

pub use artifacts::{sanitize_reason, ArtifactStore};
pub use capture::CapturedScreenshot;
pub use error::WorkflowError;
pub use outcome::{ClickOutcome, ClickReport};
pub use state::WorkflowState;
pub use verify::{text_blob, visible_texts, Expectation, Verdict};
pub use workflow::{ClickOptions, ClickWorkflow, DEFAULT_WAIT};
