//! Chrome DevTools Protocol (CDP) page driver.
//!
//! Connects to Chrome/Chromium over its remote debugging WebSocket and
//! drives a single page: screenshots, clicks and script evaluation.
//!
//! ## Usage
//!
//! 1. Start Chrome with remote debugging:
//!    ```bash
//!    chrome --remote-debugging-port=18800
//!    ```
//!
//! 2. Attach to its page:
//!    ```rust,ignore
//!    let page = connect_page("http://127.0.0.1:18800").await?;
//!    let png = page.capture_png().await?;
//!    page.click(120.0, 48.0).await?;
//!    ```
//!
//! Or let [`ChromeLauncher`] start a throwaway headless browser.

mod client;
mod connection;
mod driver;
mod error;
mod launcher;
mod protocol;
mod session;

pub use client::CdpClient;
pub use driver::connect_page;
pub use error::CdpError;
pub use launcher::ChromeLauncher;
pub use protocol::*;
pub use session::PageSession;
