//! Default action: fetch every manifest entry.

use anyhow::Result;
use oam_core::config::{OamConfig, DEFAULT_SOURCE_BASE_URL};
use oam_core::fetch::{Credentials, CurlFetcher};
use oam_core::manifest::Manifest;
use oam_core::pipeline::Pipeline;
use oam_core::sink::FsSink;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Load the manifest and run the pipeline. Only manifest errors are returned;
/// per-job failures are logged by the workers.
pub async fn run_fetch(cfg: &OamConfig, manifest_path: &Path, max_concurrent: usize) -> Result<()> {
    let manifest = Manifest::load(manifest_path)?;
    let source_base = source_base_or_default(cfg);
    let jobs = manifest.jobs(&source_base);
    let total = jobs.len();

    let credentials = Credentials::from_env(&cfg.username_env, &cfg.token_env);
    let fetcher = CurlFetcher::new(credentials).with_timeouts(cfg.connect_timeout(), cfg.timeout());
    tracing::debug!(
        jobs = total,
        max_concurrent,
        authenticated = fetcher.has_credentials(),
        "starting fetch of {}",
        manifest_path.display()
    );

    let pipeline = Pipeline::new(Arc::new(fetcher), Arc::new(FsSink), max_concurrent);

    let cancel = CancellationToken::new();
    let interrupt = spawn_interrupt_listener(cancel.clone());
    let dispatched = pipeline.run(jobs, &cancel).await;
    interrupt.abort();

    if dispatched < total {
        tracing::warn!("dispatched {} of {} job(s) before cancellation", dispatched, total);
    } else {
        tracing::debug!("run completed {} job(s)", dispatched);
    }
    Ok(())
}

/// Configured source base, or the default host when it is not a valid http(s) URL.
pub(super) fn source_base_or_default(cfg: &OamConfig) -> String {
    match cfg.source_base() {
        Ok(base) => base,
        Err(e) => {
            tracing::warn!("{:#}; using {}", e, DEFAULT_SOURCE_BASE_URL);
            DEFAULT_SOURCE_BASE_URL.to_string()
        }
    }
}

/// Ctrl-C stops further dispatch; workers already running finish.
fn spawn_interrupt_listener(cancel: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received; waiting for running fetches");
            cancel.cancel();
        }
    })
}
