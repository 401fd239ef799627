//! CLI definitions for ocrclick.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use ocrclick_config::{BackendMode, Config};
use ocrclick_protocols::{MatchQuery, Region};
use ocrclick_workflow::{ClickOptions, Expectation};

/// ocrclick CLI.
#[derive(Parser, Debug)]
#[command(name = "ocrclick")]
#[command(about = "Find text on a page or image with OCR, click it, and verify the result")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
#[command(after_help = "\
Examples:
  ocrclick screenshot.png                      # OCR a local image
  ocrclick screenshot.png -t Login             # find a text
  ocrclick --cdp                               # OCR the page of a running browser
  ocrclick --cdp -t Publish --click            # find and click
  ocrclick --cdp -t Post --exact --click       # exact match (\"Post\" does not match \"posts\")
  ocrclick --cdp -t Save -c --expect Saved     # click, then verify
  ocrclick https://example.com                 # open a URL headless and OCR it
  ocrclick serve --port 8089                   # run the OCR service")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Run the OCR HTTP service over the local engine
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Listen port
        #[arg(long)]
        port: Option<u16>,

        /// Configuration file
        #[arg(long, env = "OCRCLICK_CONFIG")]
        config: Option<PathBuf>,
    },
}

/// Arguments of the default (page/image) command.
#[derive(Args, Debug, Default)]
pub(crate) struct RunArgs {
    /// Image path or http(s) URL
    #[arg(conflicts_with = "cdp")]
    pub source: Option<String>,

    /// Text to find
    #[arg(short, long)]
    pub target: Option<String>,

    /// Exact, case-sensitive match
    #[arg(short, long)]
    pub exact: bool,

    /// Click the match (needs --cdp)
    #[arg(short, long, requires = "cdp")]
    pub click: bool,

    /// JSON output
    #[arg(short, long)]
    pub json: bool,

    /// Only warnings in logs; no visible-text dump on failure
    #[arg(short, long)]
    pub quiet: bool,

    /// Print `(x1,y1) (x2,y2) | text` lines
    #[arg(short = 'p', long)]
    pub with_position: bool,

    /// Keep a copy of the screenshot
    #[arg(long, value_name = "PATH")]
    pub save: Option<PathBuf>,

    /// Seconds between click and verification (0 skips verification)
    #[arg(long, value_name = "SECS")]
    pub wait: Option<f64>,

    /// Text that must appear after the click
    #[arg(long, value_name = "TEXT")]
    pub expect: Option<String>,

    /// Text that must disappear after the click
    #[arg(long, value_name = "TEXT")]
    pub expect_gone: Option<String>,

    /// Restrict matches to a part of the image
    #[arg(long, value_name = "top|bottom|left|right|center")]
    pub region: Option<Region>,

    /// Prefer the match closest to this text
    #[arg(long, value_name = "TEXT")]
    pub near: Option<String>,

    /// Use the page of a running browser (default URL from config)
    #[arg(long, value_name = "URL", num_args = 0..=1, default_missing_value = "")]
    pub cdp: Option<String>,

    /// Where screenshots of failed runs are kept
    #[arg(long, value_name = "DIR")]
    pub debug_dir: Option<PathBuf>,

    /// Force the local OCR engine
    #[arg(long)]
    pub local: bool,

    /// OCR service URL
    #[arg(long, env = "OCR_SERVER_URL", value_name = "URL")]
    pub server_url: Option<String>,

    /// Configuration file
    #[arg(long, env = "OCRCLICK_CONFIG")]
    pub config: Option<PathBuf>,
}

impl RunArgs {
    /// Layer command-line flags over the file configuration.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(url) = &self.server_url {
            config.recognition.server_url = url.clone();
        }
        if self.local {
            config.recognition.backend = BackendMode::Local;
        }
        if let Some(url) = self.cdp.as_deref().filter(|u| !u.is_empty()) {
            config.browser.cdp_url = url.to_string();
        }
        if let Some(dir) = &self.debug_dir {
            config.workflow.debug_dir = dir.clone();
        }
        if let Some(wait) = self.wait {
            config.workflow.wait_seconds = wait;
        }
        if self.quiet {
            config.logging.level = "warn".to_string();
        }
    }

    pub fn query(&self) -> Option<MatchQuery> {
        self.target.as_ref().map(|target| {
            MatchQuery::new(target.clone())
                .with_exact(self.exact)
                .with_region(self.region)
                .with_near(self.near.clone())
        })
    }

    /// Workflow options; `config` must already carry the overrides.
    pub fn click_options(&self, config: &Config) -> ClickOptions {
        ClickOptions {
            wait: Duration::from_secs_f64(config.workflow.wait_seconds),
            expectation: Expectation::new(self.expect.clone(), self.expect_gone.clone()),
            save_screenshot: self.save.clone(),
            visible_text_limit: config.workflow.visible_text_limit,
        }
    }

    pub fn is_url(&self) -> bool {
        self.source
            .as_deref()
            .is_some_and(|s| s.starts_with("http://") || s.starts_with("https://"))
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
