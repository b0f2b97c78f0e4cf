use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default raw-content host that serves files by `<repo>/<ref>/<path>`.
pub const DEFAULT_SOURCE_BASE_URL: &str = "https://raw.githubusercontent.com";

/// Default manifest file name, looked up in the current working directory.
pub const DEFAULT_MANIFEST_FILE: &str = "oam.yaml";

/// Global configuration loaded from `~/.config/oam/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OamConfig {
    /// Maximum number of fetches allowed in flight at once.
    pub max_concurrent_fetches: usize,
    /// Base URL of the raw-content host.
    pub source_base_url: String,
    /// Environment variable holding the username for HTTP Basic auth.
    pub username_env: String,
    /// Environment variable holding the token for HTTP Basic auth.
    pub token_env: String,
    /// Connect timeout per request, in seconds.
    pub connect_timeout_secs: u64,
    /// Overall timeout per request (including body), in seconds.
    pub timeout_secs: u64,
    /// Manifest file read when no `--manifest` is given.
    pub manifest_file: String,
}

impl Default for OamConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: crate::pipeline::DEFAULT_MAX_CONCURRENT,
            source_base_url: DEFAULT_SOURCE_BASE_URL.to_string(),
            username_env: "GITHUB_USERNAME".to_string(),
            token_env: "GITHUB_TOKEN".to_string(),
            connect_timeout_secs: 30,
            timeout_secs: 300,
            manifest_file: DEFAULT_MANIFEST_FILE.to_string(),
        }
    }
}

impl OamConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs.max(1))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Validated source base URL (http or https), without a trailing slash.
    pub fn source_base(&self) -> Result<String> {
        let parsed = url::Url::parse(&self.source_base_url)
            .with_context(|| format!("invalid source_base_url: {}", self.source_base_url))?;
        match parsed.scheme() {
            "http" | "https" => {}
            other => anyhow::bail!("source_base_url must be http or https, got {}", other),
        }
        Ok(self.source_base_url.trim_end_matches('/').to_string())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("oam")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<OamConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = OamConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::debug!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from_path(&path)
}

/// Load configuration from an explicit file. Missing keys take their defaults.
pub fn load_from_path(path: &Path) -> Result<OamConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: OamConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
