//! The default command: image, URL and live-page modes.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context};
use ocrclick_browser::{connect_page, ChromeLauncher, PageSession};
use ocrclick_config::{Config, ConfigLoader};
use ocrclick_protocols::{sort_reading_order, MatchQuery, RecognitionError, RecognizedItem, Recognizer};
use ocrclick_recognition::RecognitionAdapter;
use ocrclick_workflow::{visible_texts, ArtifactStore, ClickOutcome, ClickWorkflow};
use tracing::{debug, info, warn};

use crate::cli::RunArgs;
use crate::output::{diagnostics, render_outcome, render_scan, ScanFormat};

/// Run one invocation. `config` already carries the command-line overrides.
pub(crate) async fn run(args: &RunArgs, config: &Config) -> anyhow::Result<ExitCode> {
    let adapter = RecognitionAdapter::new(config.recognition.clone());

    if args.cdp.is_some() {
        info!("Attaching to browser at {}", config.browser.cdp_url);
        let page = connect_page(&config.browser.cdp_url)
            .await
            .with_context(|| format!("Cannot attach to {}", config.browser.cdp_url))?;
        return on_page(&page, &adapter, args, config).await;
    }

    match args.source.as_deref() {
        Some(url) if args.is_url() => {
            info!("Opening {} in a headless browser", url);
            let launcher = ChromeLauncher::launch(&config.browser).await?;
            let page = launcher.open_page(&config.browser).await?;
            page.navigate(url).await?;
            on_page(&page, &adapter, args, config).await
        }
        Some(image) => on_image(Path::new(image), &adapter, args, config).await,
        None => bail!("nothing to do: give an image path, a URL or --cdp"),
    }
}

async fn on_image(
    image: &Path,
    adapter: &RecognitionAdapter,
    args: &RunArgs,
    config: &Config,
) -> anyhow::Result<ExitCode> {
    if !image.is_file() {
        bail!("Image not found: {}", image.display());
    }
    if let Some(dest) = &args.save {
        std::fs::copy(image, dest)
            .with_context(|| format!("Failed to save a copy to {}", dest.display()))?;
    }

    let Some(query) = args.query() else {
        let mut items = adapter.recognize(image).await?;
        sort_reading_order(&mut items);
        print_scan(&items, args);
        return Ok(ExitCode::SUCCESS);
    };

    let outcome = locate_in_image(
        adapter,
        image,
        &query,
        !args.quiet,
        config.workflow.visible_text_limit,
    )
    .await?;
    Ok(finish(&outcome, args))
}

/// Find `query` in a still image.
///
/// On a miss the visible texts come from a second recognition pass when
/// `collect_visible` is set; a failure of that pass leaves them empty.
pub(crate) async fn locate_in_image(
    recognizer: &dyn Recognizer,
    image: &Path,
    query: &MatchQuery,
    collect_visible: bool,
    visible_limit: usize,
) -> Result<ClickOutcome, RecognitionError> {
    if let Some(item) = recognizer.find(image, query).await? {
        return Ok(ClickOutcome::Found { item });
    }

    let visible = if collect_visible {
        match recognizer.recognize(image).await {
            Ok(items) => visible_texts(&items, visible_limit),
            Err(e) => {
                warn!("Could not list visible texts: {}", e);
                Vec::new()
            }
        }
    } else {
        Vec::new()
    };
    Ok(ClickOutcome::NotFound {
        target: query.target.clone(),
        visible,
        artifact: None,
    })
}

async fn on_page(
    page: &PageSession,
    adapter: &RecognitionAdapter,
    args: &RunArgs,
    config: &Config,
) -> anyhow::Result<ExitCode> {
    let artifacts = ArtifactStore::new(ConfigLoader::expand_path(&config.workflow.debug_dir));
    let workflow = ClickWorkflow::new(page, adapter, artifacts);
    let options = args.click_options(config);

    let Some(query) = args.query() else {
        let mut items = workflow.scan(&options).await?;
        sort_reading_order(&mut items);
        print_scan(&items, args);
        return Ok(ExitCode::SUCCESS);
    };

    let report = if args.click {
        workflow.run(&query, &options).await?
    } else {
        workflow.locate(&query, &options).await?
    };
    debug!(
        "Workflow states: {}",
        report
            .states
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(" -> ")
    );
    log_outcome(&query, &report.outcome);
    Ok(finish(&report.outcome, args))
}

fn log_outcome(query: &MatchQuery, outcome: &ClickOutcome) {
    match outcome.item() {
        Some(item) => info!("Matched {:?} for target {:?}", item.text, query.target),
        None => info!("No match for target {:?}", query.target),
    }
}

fn print_scan(items: &[RecognizedItem], args: &RunArgs) {
    let format = ScanFormat::from_flags(args.json, args.with_position);
    println!("{}", render_scan(items, format));
}

fn finish(outcome: &ClickOutcome, args: &RunArgs) -> ExitCode {
    println!("{}", render_outcome(outcome, args.json));
    for line in diagnostics(outcome, args.quiet) {
        eprintln!("{}", line);
    }
    if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
