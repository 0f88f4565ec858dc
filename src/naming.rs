//! Centralized path-segment validation and output-path derivation.
//!
//! `person_name` and `image_id` come straight out of the manifest and are
//! spliced into filesystem paths, so they are validated here before any I/O
//! happens. The policy is reject, not sanitize: a row whose segments would
//! escape the output tree is refused and the run moves on.
//!
//! ## Output Layout
//!
//! ```text
//! <root>/<person>/<imageId>.jpg         full image
//! <root>_crop/<person>/<imageId>.jpg    face crop
//! ```
//!
//! The crop root is derived by suffixing `_crop` onto the output root's
//! final path component — `out/faces` becomes `out/faces_crop`, a sibling
//! directory, never a child.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SegmentError {
    #[error("empty path segment")]
    Empty,
    #[error("path segment {0:?} contains a path separator")]
    Separator(String),
    #[error("path segment {0:?} is a directory traversal")]
    Traversal(String),
    #[error("path segment {0:?} contains a NUL byte")]
    Nul(String),
}

/// Check that a manifest value is safe to use as a single path segment.
///
/// Rejects empty strings, `.` and `..`, `/` and `\` (the manifest format
/// originated on Windows tooling, so both separators count), and NUL bytes.
pub fn validate_segment(segment: &str) -> Result<(), SegmentError> {
    if segment.is_empty() {
        return Err(SegmentError::Empty);
    }
    if segment == "." || segment == ".." {
        return Err(SegmentError::Traversal(segment.to_string()));
    }
    if segment.contains(['/', '\\']) {
        return Err(SegmentError::Separator(segment.to_string()));
    }
    if segment.contains('\0') {
        return Err(SegmentError::Nul(segment.to_string()));
    }
    Ok(())
}

/// Derive the crop-tree root: `_crop` appended to the root path itself.
pub fn crop_root(root: &Path) -> PathBuf {
    let mut os = root.as_os_str().to_os_string();
    os.push("_crop");
    PathBuf::from(os)
}

/// Resolved destination paths for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordPaths {
    /// Per-person directory under the output root.
    pub full_dir: PathBuf,
    /// Full-image destination, `<root>/<person>/<imageId>.jpg`.
    pub full: PathBuf,
    /// Per-person directory under the crop root.
    pub crop_dir: PathBuf,
    /// Crop destination, `<root>_crop/<person>/<imageId>.jpg`.
    pub crop: PathBuf,
}

/// Validate a record's segments and derive both destination paths.
pub fn record_paths(
    root: &Path,
    person_name: &str,
    image_id: &str,
) -> Result<RecordPaths, SegmentError> {
    validate_segment(person_name)?;
    validate_segment(image_id)?;

    let filename = format!("{image_id}.jpg");
    let full_dir = root.join(person_name);
    let crop_dir = crop_root(root).join(person_name);
    Ok(RecordPaths {
        full: full_dir.join(&filename),
        crop: crop_dir.join(&filename),
        full_dir,
        crop_dir,
    })
}
