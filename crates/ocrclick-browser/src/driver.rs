//! [`PageDriver`] implementation over a CDP page session.

use async_trait::async_trait;
use ocrclick_protocols::{DriverError, PageDriver};
use serde_json::Value;
use tracing::info;

use crate::client::CdpClient;
use crate::error::CdpError;
use crate::session::PageSession;

/// Attach to the first open tab of an already running browser, or open one.
pub async fn connect_page(cdp_url: &str) -> Result<PageSession, CdpError> {
    let client = CdpClient::connect(cdp_url).await?;
    let pages = client.list_pages().await?;

    match pages.iter().find(|p| p.is_page()) {
        Some(page) => {
            info!("Attaching to page {} ({})", page.id, page.url);
            client.attach_page(&page.id).await
        }
        None => {
            info!("No open page at {}, creating one", cdp_url);
            client.new_page(None).await
        }
    }
}

#[async_trait]
impl PageDriver for PageSession {
    async fn screenshot(&self) -> Result<Vec<u8>, DriverError> {
        self.capture_png()
            .await
            .map_err(|e| DriverError::ScreenshotFailed(e.to_string()))
    }

    async fn click(&self, x: i32, y: i32) -> Result<(), DriverError> {
        PageSession::click(self, f64::from(x), f64::from(y))
            .await
            .map_err(DriverError::from)
    }

    async fn evaluate(&self, expression: &str) -> Result<Value, DriverError> {
        PageSession::evaluate(self, expression)
            .await
            .map_err(DriverError::from)
    }
}
