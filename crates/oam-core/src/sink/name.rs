//! Output names double as a directory and a file stem, so they must be a
//! single safe path segment.

use super::{SinkError, OUTPUT_EXTENSION, TEMP_SUFFIX};

/// Linux NAME_MAX.
const NAME_MAX: usize = 255;

/// Rejects names that would escape `output_root` or not fit in a file name.
///
/// - empty, `.` and `..`
/// - NUL, `/`, `\` and control characters
/// - longer than NAME_MAX once `.yaml.part` is appended
pub fn validate_name(name: &str) -> Result<(), SinkError> {
    let max = NAME_MAX - (1 + OUTPUT_EXTENSION.len() + TEMP_SUFFIX.len());
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.len() > max
        || name
            .chars()
            .any(|c| c == '/' || c == '\\' || c == '\0' || c.is_control());
    if invalid {
        return Err(SinkError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}
