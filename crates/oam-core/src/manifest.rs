//! Manifest (`oam.yaml`): output directory plus named source entries.
//!
//! ```yaml
//! output_dir: out
//! repos:
//!   widgets: { url: org/widgets, version: v1.0.0, path: openapi.yaml }
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::job::{JobDescriptor, SourceCoordinates};

/// One named entry under `repos`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepoEntry {
    /// Repository identifier (`org/repo`).
    pub url: String,
    /// Branch, tag or commit.
    pub version: String,
    /// Path of the file inside the repository.
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    pub output_dir: PathBuf,
    pub repos: BTreeMap<String, RepoEntry>,
}

/// Manifest unreadable or unparsable. Fatal: the run aborts before any fetch.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to read manifest {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse manifest {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let data = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&data).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// One descriptor per entry, resolving against `source_base`.
    pub fn jobs(&self, source_base: &str) -> Vec<JobDescriptor> {
        let base: Arc<str> = Arc::from(source_base);
        self.repos
            .iter()
            .map(|(name, entry)| {
                JobDescriptor::new(
                    name.clone(),
                    SourceCoordinates::new(&entry.url, &entry.version, &entry.path),
                    &self.output_dir,
                    Arc::clone(&base),
                )
            })
            .collect()
    }
}
