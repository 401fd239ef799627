//! The click-verification state machine.

use std::path::PathBuf;
use std::time::Duration;

use ocrclick_protocols::{MatchQuery, PageDriver, Point, RecognitionResult, Recognizer};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::artifacts::ArtifactStore;
use crate::capture::CapturedScreenshot;
use crate::error::WorkflowError;
use crate::outcome::{ClickOutcome, ClickReport};
use crate::state::WorkflowState;
use crate::verify::{visible_texts, Expectation, Verdict};

/// Post-click settle time.
pub const DEFAULT_WAIT: Duration = Duration::from_secs(3);

const DEFAULT_VISIBLE_LIMIT: usize = 20;

/// Options for [`ClickWorkflow::run`].
#[derive(Debug, Clone)]
pub struct ClickOptions {
    /// Delay before the verification screenshot. Zero skips verification.
    pub wait: Duration,
    pub expectation: Expectation,
    /// Copy of the first screenshot, kept regardless of outcome.
    pub save_screenshot: Option<PathBuf>,
    /// How many recognized texts failure outcomes report.
    pub visible_text_limit: usize,
}

impl Default for ClickOptions {
    fn default() -> Self {
        Self {
            wait: DEFAULT_WAIT,
            expectation: Expectation::default(),
            save_screenshot: None,
            visible_text_limit: DEFAULT_VISIBLE_LIMIT,
        }
    }
}

/// One page interaction over a connected driver and a recognizer.
pub struct ClickWorkflow<'a> {
    driver: &'a dyn PageDriver,
    recognizer: &'a dyn Recognizer,
    artifacts: ArtifactStore,
}

impl<'a> ClickWorkflow<'a> {
    pub fn new(
        driver: &'a dyn PageDriver,
        recognizer: &'a dyn Recognizer,
        artifacts: ArtifactStore,
    ) -> Self {
        Self {
            driver,
            recognizer,
            artifacts,
        }
    }

    /// Screenshot, match, click and optionally verify.
    pub async fn run(
        &self,
        query: &MatchQuery,
        options: &ClickOptions,
    ) -> Result<ClickReport, WorkflowError> {
        let mut states = vec![WorkflowState::Connected];
        let mut current = self.capture().await?;
        states.push(WorkflowState::ScreenshotTaken);

        let result = self
            .click_and_verify(&mut current, query, options, &mut states)
            .await;
        if let Err(e) = &result {
            self.artifacts
                .preserve_or_warn(current.path(), &format!("error {}", e));
        }
        result.map(|outcome| ClickReport { outcome, states })
    }

    /// Screenshot and match without clicking.
    pub async fn locate(
        &self,
        query: &MatchQuery,
        options: &ClickOptions,
    ) -> Result<ClickReport, WorkflowError> {
        let mut states = vec![WorkflowState::Connected];
        let current = self.capture().await?;
        states.push(WorkflowState::ScreenshotTaken);

        let result = self.find_only(&current, query, options, &mut states).await;
        if let Err(e) = &result {
            self.artifacts
                .preserve_or_warn(current.path(), &format!("error {}", e));
        }
        result.map(|outcome| ClickReport { outcome, states })
    }

    /// Screenshot and recognize the whole page.
    pub async fn scan(&self, options: &ClickOptions) -> Result<RecognitionResult, WorkflowError> {
        let current = self.capture().await?;
        let result = self.recognize_whole(&current, options).await;
        if let Err(e) = &result {
            self.artifacts
                .preserve_or_warn(current.path(), &format!("error {}", e));
        }
        result
    }

    async fn find_only(
        &self,
        current: &CapturedScreenshot,
        query: &MatchQuery,
        options: &ClickOptions,
        states: &mut Vec<WorkflowState>,
    ) -> Result<ClickOutcome, WorkflowError> {
        self.save_requested(current, options)?;
        match self.recognizer.find(current.path(), query).await? {
            Some(item) => {
                states.push(WorkflowState::Matched);
                Ok(ClickOutcome::Found { item })
            }
            None => {
                states.push(WorkflowState::NotFound);
                Ok(self.not_found(current, query, options).await)
            }
        }
    }

    async fn recognize_whole(
        &self,
        current: &CapturedScreenshot,
        options: &ClickOptions,
    ) -> Result<RecognitionResult, WorkflowError> {
        self.save_requested(current, options)?;
        Ok(self.recognizer.recognize(current.path()).await?)
    }

    async fn click_and_verify(
        &self,
        current: &mut CapturedScreenshot,
        query: &MatchQuery,
        options: &ClickOptions,
        states: &mut Vec<WorkflowState>,
    ) -> Result<ClickOutcome, WorkflowError> {
        self.save_requested(current, options)?;

        let Some(item) = self.recognizer.find(current.path(), query).await? else {
            states.push(WorkflowState::NotFound);
            return Ok(self.not_found(current, query, options).await);
        };
        states.push(WorkflowState::Matched);

        let dpr = self.device_pixel_ratio().await?;
        let at = to_css_pixels(item.center, dpr);
        info!(
            "Clicking {:?} at {} (image {}, devicePixelRatio {})",
            item.text, at, item.center, dpr
        );
        self.driver.click(at.x, at.y).await?;
        states.push(WorkflowState::Clicked);

        if options.wait.is_zero() || options.expectation.is_empty() {
            return Ok(ClickOutcome::Clicked { item, at });
        }

        states.push(WorkflowState::Waiting);
        debug!("Waiting {:?} before verification", options.wait);
        tokio::time::sleep(options.wait).await;

        *current = self.capture().await?;
        states.push(WorkflowState::PostScreenshot);
        let items = self.recognizer.recognize(current.path()).await?;

        match options.expectation.check(&items) {
            Verdict::Passed => {
                states.push(WorkflowState::Verified);
                Ok(ClickOutcome::Verified { item, at })
            }
            Verdict::Missing(expected) => {
                states.push(WorkflowState::VerifyFailed);
                let artifact = self
                    .artifacts
                    .preserve_or_warn(current.path(), &format!("expect_failed {}", expected));
                Ok(ClickOutcome::ExpectationFailed {
                    item,
                    at,
                    expected,
                    visible: visible_texts(&items, options.visible_text_limit),
                    artifact,
                })
            }
            Verdict::StillPresent(unexpected) => {
                states.push(WorkflowState::VerifyFailed);
                let artifact = self
                    .artifacts
                    .preserve_or_warn(current.path(), &format!("still_present {}", unexpected));
                Ok(ClickOutcome::StillPresent {
                    item,
                    at,
                    unexpected,
                    visible: visible_texts(&items, options.visible_text_limit),
                    artifact,
                })
            }
        }
    }

    async fn capture(&self) -> Result<CapturedScreenshot, WorkflowError> {
        let png = self.driver.screenshot().await?;
        let shot = CapturedScreenshot::write(&png)?;
        debug!("Screenshot captured ({} bytes) at {}", png.len(), shot.path().display());
        Ok(shot)
    }

    fn save_requested(
        &self,
        shot: &CapturedScreenshot,
        options: &ClickOptions,
    ) -> Result<(), WorkflowError> {
        if let Some(dest) = &options.save_screenshot {
            shot.save_copy(dest)?;
            info!("Screenshot saved to {}", dest.display());
        }
        Ok(())
    }

    async fn not_found(
        &self,
        shot: &CapturedScreenshot,
        query: &MatchQuery,
        options: &ClickOptions,
    ) -> ClickOutcome {
        let artifact = self
            .artifacts
            .preserve_or_warn(shot.path(), &format!("not_found {}", query.target));

        // Diagnostics only; a failure here must not replace the miss.
        let visible = match self.recognizer.recognize(shot.path()).await {
            Ok(items) => visible_texts(&items, options.visible_text_limit),
            Err(e) => {
                warn!("Could not list visible texts: {}", e);
                Vec::new()
            }
        };

        ClickOutcome::NotFound {
            target: query.target.clone(),
            visible,
            artifact,
        }
    }

    /// `window.devicePixelRatio`, or 1.0 when missing or not positive.
    async fn device_pixel_ratio(&self) -> Result<f64, WorkflowError> {
        let value = self.driver.evaluate("window.devicePixelRatio").await?;
        Ok(ratio_or_default(&value))
    }
}

fn ratio_or_default(value: &Value) -> f64 {
    match value.as_f64() {
        Some(dpr) if dpr.is_finite() && dpr > 0.0 => dpr,
        _ => 1.0,
    }
}

/// Image pixels to CSS pixels, truncating toward zero.
fn to_css_pixels(center: Point, dpr: f64) -> Point {
    Point::new(
        (f64::from(center.x) / dpr) as i32,
        (f64::from(center.y) / dpr) as i32,
    )
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
