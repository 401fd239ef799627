use std::fmt;

/// Steps of one click run, in the order they are reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Connected,
    ScreenshotTaken,
    Matched,
    NotFound,
    Clicked,
    Waiting,
    PostScreenshot,
    Verified,
    VerifyFailed,
}

impl WorkflowState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connected => "CONNECTED",
            Self::ScreenshotTaken => "SCREENSHOT_TAKEN",
            Self::Matched => "MATCHED",
            Self::NotFound => "NOT_FOUND",
            Self::Clicked => "CLICKED",
            Self::Waiting => "WAIT",
            Self::PostScreenshot => "POST_SCREENSHOT",
            Self::Verified => "VERIFIED",
            Self::VerifyFailed => "VERIFY_FAILED",
        }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(WorkflowState::ScreenshotTaken.to_string(), "SCREENSHOT_TAKEN");
        assert_eq!(WorkflowState::Waiting.to_string(), "WAIT");
    }
}
