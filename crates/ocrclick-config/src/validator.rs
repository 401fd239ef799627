//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Highest Tesseract page segmentation mode.
const MAX_PAGE_SEGMENTATION: u8 = 13;
/// Longest accepted post-click wait (one day).
const MAX_WAIT_SECONDS: f64 = 86_400.0;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Turn the first error into a [`ConfigError`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(e) => Err(ConfigError::InvalidValue {
                field: e.path,
                message: e.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_recognition(config, &mut result);
        Self::validate_browser(config, &mut result);
        Self::validate_workflow(config, &mut result);

        result
    }

    fn validate_http_url(path: &str, value: &str, result: &mut ValidationResult) {
        match url::Url::parse(value) {
            Ok(u) if u.scheme() == "http" || u.scheme() == "https" => {}
            Ok(u) => result.add_error(ValidationError::new(
                path,
                format!("unsupported scheme '{}', expected http or https", u.scheme()),
            )),
            Err(e) => result.add_error(ValidationError::new(path, format!("invalid URL: {}", e))),
        }
    }

    fn validate_recognition(config: &Config, result: &mut ValidationResult) {
        let recognition = &config.recognition;
        Self::validate_http_url("recognition.server_url", &recognition.server_url, result);

        if recognition.probe_timeout_ms == 0 {
            result.add_error(ValidationError::new(
                "recognition.probe_timeout_ms",
                "probe_timeout_ms must be greater than 0",
            ));
        }

        if recognition.probe_timeout_ms > 10_000 {
            result.add_warning(ValidationWarning::new(
                "recognition.probe_timeout_ms",
                "probe timeout is above 10s, startup will stall when the service is down",
            ));
        }

        if recognition.local.languages.trim().is_empty() {
            result.add_error(ValidationError::new(
                "recognition.local.languages",
                "languages cannot be empty",
            ));
        }

        if recognition.local.page_segmentation > MAX_PAGE_SEGMENTATION {
            result.add_error(ValidationError::new(
                "recognition.local.page_segmentation",
                format!("page_segmentation must be between 0 and {}", MAX_PAGE_SEGMENTATION),
            ));
        }
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        Self::validate_http_url("browser.cdp_url", &config.browser.cdp_url, result);

        if config.browser.viewport_width == 0 || config.browser.viewport_height == 0 {
            result.add_error(ValidationError::new(
                "browser.viewport",
                "viewport dimensions must be greater than 0",
            ));
        }

        if let Some(ref path) = config.browser.chrome_path {
            if !path.exists() {
                result.add_warning(ValidationWarning::new(
                    "browser.chrome_path",
                    format!("Chrome path does not exist: {:?}", path),
                ));
            }
        }
    }

    fn validate_workflow(config: &Config, result: &mut ValidationResult) {
        let wait = config.workflow.wait_seconds;
        if !wait.is_finite() || wait < 0.0 {
            result.add_error(ValidationError::new(
                "workflow.wait_seconds",
                "wait_seconds must be a finite, non-negative number",
            ));
        } else if wait > MAX_WAIT_SECONDS {
            result.add_error(ValidationError::new(
                "workflow.wait_seconds",
                format!("wait_seconds must not exceed {} seconds", MAX_WAIT_SECONDS),
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
