//! File-backed tracing setup. The terminal belongs to the TUI, so logs never go to stdout.

use std::{fs, path::Path, sync::Mutex};

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

const QUIET: &str = "hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn";

/// Directives used when `RUST_LOG` is unset or unparsable.
fn default_directives(debug: bool) -> String {
    let level = if debug { "debug" } else { "info" };
    format!("{},{}", level, QUIET)
}

/// A parsable `RUST_LOG` value wins over `debug`.
fn build_filter(rust_log: Option<&str>, debug: bool) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default_directives(debug)))
}

/// Install the file subscriber. `RUST_LOG` wins over `debug`.
pub fn init(log_file: &Path, debug: bool) -> Result<()> {
    if let Some(dir) = log_file.parent() {
        fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("failed to open log file {}", log_file.display()))?;

    let filter = build_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref(), debug);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {}", e))
}
