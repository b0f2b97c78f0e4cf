//! Destination writer: `<output_root>/<name>/<name>.yaml`.
//!
//! Bytes go to a `.part` sibling first and are renamed into place, so a failed
//! write never leaves a truncated destination. Existing files are replaced.

mod name;

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

pub use self::name::validate_name;

/// Suffix of the temporary file written before the atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Extension of every written document.
pub const OUTPUT_EXTENSION: &str = "yaml";

/// Why writing a job's bytes failed. Job-level; the run continues.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("invalid output name {name:?}: must be a single path segment")]
    InvalidName { name: String },
    #[error("failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to move {} into place: {source}", .path.display())]
    Finalize {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Writes a job's bytes to its destination and returns the final path.
pub trait Sink: Send + Sync {
    fn write(&self, output_root: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf, SinkError>;
}

/// `<output_root>/<name>`
pub fn destination_dir(output_root: &Path, name: &str) -> PathBuf {
    output_root.join(name)
}

/// `<output_root>/<name>/<name>.yaml`
pub fn destination_path(output_root: &Path, name: &str) -> PathBuf {
    destination_dir(output_root, name).join(format!("{}.{}", name, OUTPUT_EXTENSION))
}

/// Path for the temp file: appends `.part` to the final path.
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Filesystem sink. No cross-job locking: two jobs with the same name race and
/// the last rename wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSink;

impl FsSink {
    fn write_temp(temp: &Path, bytes: &[u8]) -> std::io::Result<()> {
        let mut file = File::create(temp)?;
        file.write_all(bytes)?;
        file.sync_all()
    }
}

impl Sink for FsSink {
    fn write(&self, output_root: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf, SinkError> {
        validate_name(name)?;

        let dir = destination_dir(output_root, name);
        fs::create_dir_all(&dir).map_err(|source| SinkError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        let final_path = destination_path(output_root, name);
        let temp = temp_path(&final_path);
        if let Err(source) = Self::write_temp(&temp, bytes) {
            let _ = fs::remove_file(&temp);
            return Err(SinkError::Write {
                path: final_path,
                source,
            });
        }
        if let Err(source) = fs::rename(&temp, &final_path) {
            let _ = fs::remove_file(&temp);
            return Err(SinkError::Finalize {
                path: final_path,
                source,
            });
        }
        Ok(final_path)
    }
}
