//! Job descriptors: one named fetch-and-write unit per manifest entry.
//!
//! A descriptor is immutable once built and fully determines both the remote
//! URL it resolves to and the destination path it is written to.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::sink;

/// Location of a file in the remote source: repository, reference and path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceCoordinates {
    /// Repository identifier, e.g. `org/widgets`.
    pub repo: String,
    /// Branch, tag or commit.
    pub reference: String,
    /// Path to the file within the repository at `reference`.
    pub path: String,
}

impl SourceCoordinates {
    pub fn new(
        repo: impl Into<String>,
        reference: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            repo: repo.into(),
            reference: reference.into(),
            path: path.into(),
        }
    }

    /// Raw-content URL for these coordinates under `base`
    /// (`<base>/<repo>/<reference>/<path>`).
    pub fn resolve(&self, base: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            base.trim_end_matches('/'),
            self.repo,
            self.reference,
            self.path.trim_start_matches('/')
        )
    }
}

/// One fetch-and-write task.
#[derive(Debug, Clone)]
pub struct JobDescriptor {
    name: String,
    source: SourceCoordinates,
    output_root: PathBuf,
    source_base: Arc<str>,
}

impl JobDescriptor {
    /// `source_base` is the run-wide raw-content base URL; it is shared, not per job.
    pub fn new(
        name: impl Into<String>,
        source: SourceCoordinates,
        output_root: impl Into<PathBuf>,
        source_base: Arc<str>,
    ) -> Self {
        Self {
            name: name.into(),
            source,
            output_root: output_root.into(),
            source_base,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &SourceCoordinates {
        &self.source
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub fn resolved_url(&self) -> String {
        self.source.resolve(&self.source_base)
    }

    /// `<output_root>/<name>/<name>.yaml`
    pub fn destination(&self) -> PathBuf {
        sink::destination_path(&self.output_root, &self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(name: &str, repo: &str, reference: &str, path: &str) -> JobDescriptor {
        JobDescriptor::new(
            name,
            SourceCoordinates::new(repo, reference, path),
            "out",
            Arc::from("https://raw.githubusercontent.com"),
        )
    }

    #[test]
    fn resolves_raw_content_url() {
        let j = job("widgets", "org/widgets", "v1.0.0", "openapi.yaml");
        assert_eq!(
            j.resolved_url(),
            "https://raw.githubusercontent.com/org/widgets/v1.0.0/openapi.yaml"
        );
    }

    #[test]
    fn base_trailing_slash_and_leading_path_slash_not_doubled() {
        let coords = SourceCoordinates::new("org/gadgets", "main", "/spec/api.yaml");
        assert_eq!(
            coords.resolve("http://127.0.0.1:9000/"),
            "http://127.0.0.1:9000/org/gadgets/main/spec/api.yaml"
        );
    }

    #[test]
    fn identical_coordinates_share_url() {
        let a = job("a", "org/shared", "main", "openapi.yaml");
        let b = job("b", "org/shared", "main", "openapi.yaml");
        assert_eq!(a.resolved_url(), b.resolved_url());
        assert_ne!(a.destination(), b.destination());
    }

    #[test]
    fn destination_is_name_dir_and_yaml_file() {
        let j = job("widgets", "org/widgets", "v1.0.0", "openapi.yaml");
        assert_eq!(
            j.destination(),
            Path::new("out").join("widgets").join("widgets.yaml")
        );
    }
}
