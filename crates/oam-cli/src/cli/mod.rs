//! CLI for OAM. With no arguments it reads `oam.yaml` from the working directory.

mod fetch;

use anyhow::Result;
use clap::Parser;
use oam_core::config::{self, OamConfig};
use std::path::PathBuf;

use fetch::run_fetch;

/// Fetch the OpenAPI documents listed in a manifest.
#[derive(Debug, Parser)]
#[command(name = "oam")]
#[command(about = "Fetch the OpenAPI documents listed in an oam.yaml manifest", long_about = None)]
pub struct Cli {
    /// Manifest to read (default: `manifest_file` from config, normally oam.yaml).
    #[arg(long, value_name = "PATH")]
    pub manifest: Option<PathBuf>,

    /// Maximum number of concurrent fetches (default: config, normally 20).
    #[arg(long, short = 'j', value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub jobs: Option<u16>,
}

impl Cli {
    pub async fn run_from_args() -> Result<()> {
        Cli::parse().run().await
    }

    pub async fn run(self) -> Result<()> {
        let cfg = match config::load_or_init() {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!("could not load config ({:#}); using defaults", e);
                OamConfig::default()
            }
        };
        tracing::debug!("loaded config: {:?}", cfg);

        let manifest = self
            .manifest
            .unwrap_or_else(|| PathBuf::from(&cfg.manifest_file));
        let max_concurrent = self
            .jobs
            .map(usize::from)
            .unwrap_or(cfg.max_concurrent_fetches);

        run_fetch(&cfg, &manifest, max_concurrent).await
    }
}
