//! Throwaway headless Chrome for URL sources.

use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use ocrclick_config::BrowserConfig;
use tempfile::TempDir;
use tokio::process::{Child, Command};
use tracing::{debug, info};

use crate::client::CdpClient;
use crate::error::CdpError;
use crate::session::PageSession;

const STARTUP_ATTEMPTS: u32 = 30;
const STARTUP_POLL_INTERVAL: Duration = Duration::from_millis(200);
const STARTUP_REQUEST_TIMEOUT: Duration = Duration::from_millis(500);

/// A Chrome process owned by this invocation.
///
/// The process is killed and its profile directory removed on drop.
pub struct ChromeLauncher {
    endpoint: String,
    _child: Child,
    _profile: TempDir,
}

impl ChromeLauncher {
    /// Find a Chrome/Chromium executable.
    pub fn find_chrome() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        let paths: &[&str] = &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
        ];

        #[cfg(target_os = "windows")]
        let paths: &[&str] = &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
        ];

        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        let paths: &[&str] = &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
        ];

        paths.iter().map(PathBuf::from).find(|p| p.exists())
    }

    /// Launch Chrome and wait until its debugging endpoint answers.
    pub async fn launch(config: &BrowserConfig) -> Result<Self, CdpError> {
        let chrome_path = match &config.chrome_path {
            Some(path) => path.clone(),
            None => Self::find_chrome().ok_or(CdpError::ChromeNotFound)?,
        };
        let port = free_port()?;
        let profile = tempfile::Builder::new()
            .prefix("ocrclick-profile-")
            .tempdir()
            .map_err(|e| CdpError::LaunchFailed(format!("profile directory: {}", e)))?;

        let child = spawn_chrome(&chrome_path, port, profile.path(), config.headless)?;
        info!("Chrome launched with PID: {:?} on port {}", child.id(), port);

        let endpoint = format!("http://127.0.0.1:{}", port);
        let launcher = Self {
            endpoint,
            _child: child,
            _profile: profile,
        };
        launcher.wait_until_ready().await?;
        Ok(launcher)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Open a fresh tab sized to the configured viewport.
    pub async fn open_page(&self, config: &BrowserConfig) -> Result<PageSession, CdpError> {
        let client = CdpClient::connect(&self.endpoint).await?;
        let page = client.new_page(None).await?;
        page.set_viewport(config.viewport_width, config.viewport_height)
            .await?;
        Ok(page)
    }

    async fn wait_until_ready(&self) -> Result<(), CdpError> {
        wait_for_endpoint(&self.endpoint, STARTUP_ATTEMPTS, STARTUP_POLL_INTERVAL).await
    }
}

/// Poll `<endpoint>/json/version` until it answers, `attempts` times.
///
/// Each poll is bounded by [`STARTUP_REQUEST_TIMEOUT`].
async fn wait_for_endpoint(
    endpoint: &str,
    attempts: u32,
    interval: Duration,
) -> Result<(), CdpError> {
    let client = reqwest::Client::builder()
        .timeout(STARTUP_REQUEST_TIMEOUT)
        .build()?;
    let version_url = format!("{}/json/version", endpoint);
    for attempt in 0..attempts {
        tokio::time::sleep(interval).await;
        if client.get(&version_url).send().await.is_ok() {
            debug!("Chrome ready after {} polls", attempt + 1);
            return Ok(());
        }
    }
    Err(CdpError::LaunchFailed(
        "Chrome failed to start within timeout".to_string(),
    ))
}

fn spawn_chrome(path: &Path, port: u16, profile: &Path, headless: bool) -> Result<Child, CdpError> {
    let mut cmd = Command::new(path);
    cmd.arg(format!("--remote-debugging-port={}", port))
        .arg(format!("--user-data-dir={}", profile.display()))
        .arg("--no-first-run")
        .arg("--no-default-browser-check")
        .arg("--disable-background-networking")
        .arg("--disable-sync")
        .arg("--disable-translate")
        .arg("--hide-scrollbars")
        .arg("--force-device-scale-factor=1")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true);

    if headless {
        cmd.arg("--headless=new");
    }

    cmd.spawn()
        .map_err(|e| CdpError::LaunchFailed(format!("{}: {}", path.display(), e)))
}

/// Ask the OS for an unused local port.
fn free_port() -> Result<u16, CdpError> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|e| CdpError::LaunchFailed(format!("no free port: {}", e)))?;
    listener
        .local_addr()
        .map(|addr| addr.port())
        .map_err(|e| CdpError::LaunchFailed(format!("no free port: {}", e)))
}
