//! `callejero-tui` — Terminal front-end for the callejero street directory.
//!
//! Built on [ratatui](https://ratatui.rs) over reactive state from
//! `callejero-core`: cascading selection of autonomous community →
//! province → municipality, plus a postal-code-scoped street search.
//!
//! Logs are written to a file (default `/tmp/callejero-tui.log`) to avoid
//! corrupting the terminal UI. A background data bridge task performs the
//! startup regions fetch and streams controller state into the action loop.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and app launch.

mod action;
mod app;
mod bridge;
mod config;
mod event;
mod theme;
mod tui;

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use callejero_api::{CallejeroClient, TransportConfig};
use callejero_core::Controller;

use crate::app::App;
use crate::config::TuiConfig;

/// Terminal UI for browsing the Spanish callejero (street directory).
#[derive(Parser, Debug)]
#[command(name = "callejero-tui", version, about)]
struct Cli {
    /// Base URL of the callejero API (e.g., http://127.0.0.1:8000)
    #[arg(short = 'u', long, env = "CALLEJERO_API_URL")]
    api_url: Option<String>,

    /// Log file path (defaults to /tmp/callejero-tui.log)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr — that would
/// corrupt the TUI output. Returns a guard that must be held for the
/// lifetime of the application to ensure logs are flushed.
fn setup_tracing(log_file: &Path, verbose: u8) -> WorkerGuard {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("callejero={log_level}")));

    let log_dir = log_file.parent().unwrap_or(Path::new("/tmp"));
    let log_filename = log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("callejero-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    let config = config::load_config().unwrap_or_else(|e| {
        eprintln!("warning: {e}; falling back to defaults");
        TuiConfig::default()
    });

    // Precedence: CLI flags > env > config file > defaults
    let api_url = cli.api_url.clone().unwrap_or_else(|| config.api_url.clone());
    let log_file = cli.log_file.clone().unwrap_or_else(|| config.log_file.clone());

    // Tracing to file — hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&log_file, cli.verbose);

    info!(api_url = %api_url, "starting callejero-tui");

    let mut transport = TransportConfig::default();
    if let Some(secs) = config.timeout_secs {
        transport = transport.with_timeout(Duration::from_secs(secs));
    }

    let client = CallejeroClient::new(&api_url, &transport)
        .map_err(|e| eyre!("cannot build API client for {api_url}: {e}"))?;
    let controller = Controller::new(client);

    let mut app = App::new(controller);
    app.run().await?;

    Ok(())
}
