// 📜 Logging setup for the binaries
//
// The library only emits `tracing` events; subscribers are installed here.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// RUST_LOG wins; otherwise the configured directive, falling back to "info"
pub fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Terminal UI: log to a file, or nowhere. Writing to stdout/stderr would
/// corrupt the alternate screen.
pub fn init_for_tui(default_directive: &str, log_file: Option<&Path>) -> Result<()> {
    let filter = env_filter(default_directive);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {:?}", path))?;

            tracing_subscriber::registry()
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .with(filter)
                .try_init()
                .context("Failed to install tracing subscriber")?;

            tracing::info!(path = %path.display(), "logging initialized");
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .try_init()
                .context("Failed to install tracing subscriber")?;
        }
    }

    Ok(())
}

/// HTTP server: log to stderr
pub fn init_for_server(default_directive: &str) -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter(default_directive))
        .try_init()
        .context("Failed to install tracing subscriber")?;
    Ok(())
}
