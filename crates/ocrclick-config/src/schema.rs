//! Configuration schema definitions.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub recognition: RecognitionConfig,

    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub workflow: WorkflowConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How the recognition backend is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    /// Probe the remote service once, fall back to the local engine.
    #[default]
    Auto,
    Remote,
    Local,
}

/// How images are handed to the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageTransport {
    /// Send a filesystem path the service can read directly.
    #[default]
    Path,
    /// Send the image bytes base64-encoded.
    Base64,
}

/// Recognition backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionConfig {
    #[serde(default)]
    pub backend: BackendMode,

    #[serde(default = "default_server_url")]
    pub server_url: String,

    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub image_transport: ImageTransport,

    #[serde(default)]
    pub local: LocalEngineConfig,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            backend: BackendMode::default(),
            server_url: default_server_url(),
            probe_timeout_ms: default_probe_timeout_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            image_transport: ImageTransport::default(),
            local: LocalEngineConfig::default(),
        }
    }
}

fn default_server_url() -> String {
    "http://127.0.0.1:8089".to_string()
}

fn default_probe_timeout_ms() -> u64 {
    1000
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Local OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalEngineConfig {
    #[serde(default = "default_binary")]
    pub binary: String,

    /// Language packs, `+`-separated (e.g. `eng+chi_sim`).
    #[serde(default = "default_languages")]
    pub languages: String,

    #[serde(default = "default_page_segmentation")]
    pub page_segmentation: u8,
}

impl Default for LocalEngineConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            languages: default_languages(),
            page_segmentation: default_page_segmentation(),
        }
    }
}

fn default_binary() -> String {
    "tesseract".to_string()
}

fn default_languages() -> String {
    "eng".to_string()
}

fn default_page_segmentation() -> u8 {
    3
}

/// Browser connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_cdp_url")]
    pub cdp_url: String,

    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,

    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,

    #[serde(default = "default_true")]
    pub headless: bool,

    #[serde(default)]
    pub chrome_path: Option<PathBuf>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            cdp_url: default_cdp_url(),
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            headless: true,
            chrome_path: None,
        }
    }
}

fn default_cdp_url() -> String {
    "http://127.0.0.1:18800".to_string()
}

fn default_viewport_width() -> u32 {
    1280
}

fn default_viewport_height() -> u32 {
    720
}

fn default_true() -> bool {
    true
}

/// Click workflow configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Delay between click and verification screenshot. Zero skips verification.
    #[serde(default = "default_wait_seconds")]
    pub wait_seconds: f64,

    #[serde(default = "default_debug_dir")]
    pub debug_dir: PathBuf,

    /// How many recognized texts to report on a failed lookup.
    #[serde(default = "default_visible_text_limit")]
    pub visible_text_limit: usize,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            wait_seconds: default_wait_seconds(),
            debug_dir: default_debug_dir(),
            visible_text_limit: default_visible_text_limit(),
        }
    }
}

fn default_wait_seconds() -> f64 {
    3.0
}

fn default_debug_dir() -> PathBuf {
    PathBuf::from("~/.ocrclick/debug")
}

fn default_visible_text_limit() -> usize {
    20
}

/// OCR server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8089
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,

    /// Directory for rolling log files. Defaults to `~/.ocrclick/logs`.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            log_dir: None,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
