//! CDP browser-level client.

use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use crate::connection::Connection;
use crate::error::CdpError;
use crate::protocol::{BrowserVersion, PageInfo};
use crate::session::PageSession;

/// Browser-level CDP client.
///
/// Page sessions share its WebSocket and stay usable after the client is
/// dropped.
pub struct CdpClient {
    http_endpoint: String,
    browser: String,
    conn: Arc<Connection>,
}

impl CdpClient {
    /// Connect to Chrome at its debugging endpoint (e.g. `http://127.0.0.1:18800`).
    pub async fn connect(endpoint: &str) -> Result<Self, CdpError> {
        let http_endpoint = url::Url::parse(endpoint)?
            .as_str()
            .trim_end_matches('/')
            .to_string();

        let version_url = format!("{}/json/version", http_endpoint);
        debug!("Fetching browser version from {}", version_url);

        let version: BrowserVersion = reqwest::get(&version_url)
            .await
            .map_err(|e| CdpError::ChromeNotAvailable(format!("{}: {}", endpoint, e)))?
            .json()
            .await
            .map_err(|e| CdpError::ChromeNotAvailable(format!("{}: {}", endpoint, e)))?;

        let conn = Connection::open(&version.web_socket_debugger_url).await?;
        debug!("Connected to browser: {}", version.browser);

        Ok(Self {
            http_endpoint,
            browser: version.browser,
            conn,
        })
    }

    /// Browser product string, e.g. `Chrome/126.0.0.0`.
    pub fn browser(&self) -> &str {
        &self.browser
    }

    pub fn endpoint(&self) -> &str {
        &self.http_endpoint
    }

    /// List all targets.
    pub async fn list_pages(&self) -> Result<Vec<PageInfo>, CdpError> {
        let url = format!("{}/json/list", self.http_endpoint);
        let pages: Vec<PageInfo> = reqwest::get(&url).await?.json().await?;
        Ok(pages)
    }

    /// Open a new tab and attach to it.
    pub async fn new_page(&self, url: Option<&str>) -> Result<PageSession, CdpError> {
        let create_url = match url {
            Some(u) => format!("{}/json/new?{}", self.http_endpoint, u),
            None => format!("{}/json/new", self.http_endpoint),
        };

        // Chrome requires PUT for /json/new.
        let page_info: PageInfo = reqwest::Client::new()
            .put(&create_url)
            .send()
            .await?
            .json()
            .await?;
        debug!("Created new page: {} - {}", page_info.id, page_info.url);

        self.attach_page(&page_info.id).await
    }

    /// Attach to an existing target.
    pub async fn attach_page(&self, target_id: &str) -> Result<PageSession, CdpError> {
        let result = self
            .conn
            .call(
                "Target.attachToTarget",
                Some(json!({
                    "targetId": target_id,
                    "flatten": true
                })),
                None,
            )
            .await?;

        let session_id = result["sessionId"]
            .as_str()
            .ok_or_else(|| CdpError::InvalidResponse("Missing sessionId".to_string()))?
            .to_string();

        let session = PageSession::new(target_id.to_string(), session_id, self.conn.clone());
        session.enable_domains().await?;
        Ok(session)
    }

    /// Close a target.
    pub async fn close_page(&self, target_id: &str) -> Result<(), CdpError> {
        self.conn
            .call(
                "Target.closeTarget",
                Some(json!({"targetId": target_id})),
                None,
            )
            .await?;
        Ok(())
    }
}
