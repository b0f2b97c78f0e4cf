//! Logging init: human-readable lines on stdout, one per terminal job event.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
const DEFAULT_FILTER: &str = "info";

/// Initialize logging to stdout.
///
/// Honours `RUST_LOG`; falls back to `info`. Returns Err if a global subscriber
/// is already installed so the caller can decide whether that matters.
pub fn init_logging() -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stdout)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {}", e))?;

    tracing::debug!("oam logging initialized");

    Ok(())
}

/// Fixed `info` filter on stdout. Used when `init_logging` fails so per-job
/// lines are still printed. Returns false if a subscriber was already installed.
pub fn init_logging_plain() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(DEFAULT_FILTER))
        .with_writer(std::io::stdout)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .is_ok()
}
