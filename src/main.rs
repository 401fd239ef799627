//! ocrclick - find text on rendered pages and images with OCR, click it,
//! and verify the result.

mod cli;
mod commands;
mod output;
mod server;

use std::path::Path;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing::{error, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ocrclick_config::{Config, ConfigLoader, ConfigValidator, LoggingConfig};

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config_path = match &cli.command {
        Some(Commands::Serve { config, .. }) => config.as_deref(),
        None => cli.run.config.as_deref(),
    };
    let mut config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match &cli.command {
        Some(Commands::Serve { host, port, .. }) => {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
        }
        None => cli.run.apply_to(&mut config),
    }

    init_tracing(&config.logging);

    let warnings = match ConfigValidator::validate(&config).into_result() {
        Ok(warnings) => warnings,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    for warning in warnings {
        warn!("Config {}: {}", warning.path, warning.message);
    }

    let result = match cli.command {
        Some(Commands::Serve { .. }) => server::run_server(config).await.map(|_| ExitCode::SUCCESS),
        None => {
            if cli.run.source.is_none() && cli.run.cdp.is_none() {
                let _ = Cli::command().print_help();
                return ExitCode::FAILURE;
            }
            commands::run(&cli.run, &config).await
        }
    };

    result.unwrap_or_else(|e| {
        error!("{:#}", e);
        eprintln!("error: {:#}", e);
        ExitCode::FAILURE
    })
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    Ok(ConfigLoader::load_or_default(path)?)
}

/// Initialize tracing with a stderr console layer and a daily-rolling file layer.
///
/// stdout carries command output only. If the log directory cannot be
/// prepared, logging continues on the console alone.
fn init_tracing(logging: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let console = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    let log_dir = logging
        .log_dir
        .as_deref()
        .map(ConfigLoader::expand_path)
        .unwrap_or_else(|| ConfigLoader::home_dir().join("logs"));

    let file_appender = std::fs::create_dir_all(&log_dir)
        .map_err(|e| e.to_string())
        .and_then(|_| {
            RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("ocrclick")
                .filename_suffix("log")
                .max_log_files(30)
                .build(&log_dir)
                .map_err(|e| e.to_string())
        });

    match file_appender {
        Ok(appender) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);

            // Keep the worker alive for the whole process.
            static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
                std::sync::OnceLock::new();
            let _ = GUARD.set(guard);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(console)
                .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
                .init();
        }
        Err(e) => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(console)
                .init();
            warn!("File logging disabled ({}): {}", log_dir.display(), e);
        }
    }
}
