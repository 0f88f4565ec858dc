//! Manifest parsing.
//!
//! Stage 1 of the facegrab pipeline. Reads a tab-separated manifest file and
//! maps each data row positionally into an [`ImageRecord`].
//!
//! ## Manifest Variants
//!
//! Public face-dataset manifests ship in two near-identical layouts, modeled
//! here as one record type plus a [`ManifestVariant`]:
//!
//! ```text
//! five-col (1 header row):
//!     name \t imageId \t url \t bbox \t hash
//! six-col  (2 header rows):
//!     name \t imageId \t faceId \t url \t bbox \t hash
//! ```
//!
//! Binding is strictly positional — no column-name lookup, no sniffing. The
//! number of leading header rows to discard defaults per variant but is a
//! plain configuration knob: if it disagrees with the file, the unskipped
//! header is parsed as data and comes out as one corrupted record. That is
//! deliberate; auto-detection would hide manifest/flag mismatches instead of
//! surfacing them on the first record.
//!
//! The `bbox` field is carried as the raw `"x0,y0,x1,y1"` string and only
//! parsed at crop time (see [`crate::imaging::BBox`]), so a malformed box
//! fails its record, not the whole parse.

use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: expected {expected} tab-separated fields, found {found}")]
    ShortRow {
        line: usize,
        expected: usize,
        found: usize,
    },
}

/// Manifest column layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestVariant {
    /// 5 columns, no face id. One header row by convention.
    FiveColumn,
    /// 6 columns with a face id between the image id and the URL. Two
    /// header rows by convention.
    SixColumn,
}

impl ManifestVariant {
    /// Header rows discarded by default for this variant.
    pub fn default_header_rows(self) -> usize {
        match self {
            Self::FiveColumn => 1,
            Self::SixColumn => 2,
        }
    }

    /// Minimum fields a data row must carry.
    pub fn field_count(self) -> usize {
        match self {
            Self::FiveColumn => 5,
            Self::SixColumn => 6,
        }
    }
}

/// One manifest row: a labeled face image to fetch and materialize.
///
/// Immutable after construction; created by [`parse`] and consumed exactly
/// once by the materializer. `content_hash` is carried verbatim from the
/// manifest but never checked against the fetched bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    /// Identity label; becomes a directory segment (validated, not trusted).
    pub person_name: String,
    /// Unique-per-person identifier; becomes the output filename stem.
    pub image_id: String,
    /// Face identifier, present only in six-column manifests.
    pub face_id: Option<String>,
    /// Source location of the raw image bytes.
    pub url: String,
    /// Face rectangle as the raw `"x0,y0,x1,y1"` string.
    pub bbox: String,
    /// Integrity token from the manifest; carried but unused.
    pub content_hash: String,
}

/// Parse a manifest with the variant's conventional header-row count.
pub fn parse(path: &Path, variant: ManifestVariant) -> Result<Vec<ImageRecord>, ManifestError> {
    parse_with_header_rows(path, variant, variant.default_header_rows())
}

/// Parse a manifest, discarding an explicit number of leading header rows.
///
/// Rows map 1:1 to records, in file order. Blank lines are skipped. A row
/// with fewer fields than the variant requires is fatal (the manifest is
/// broken, not one image); extra trailing fields are ignored.
pub fn parse_with_header_rows(
    path: &Path,
    variant: ManifestVariant,
    header_rows: usize,
) -> Result<Vec<ImageRecord>, ManifestError> {
    let content = fs::read_to_string(path)?;

    let mut records = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if idx < header_rows || line.is_empty() {
            continue;
        }
        records.push(parse_row(line, variant, idx + 1)?);
    }
    Ok(records)
}

fn parse_row(
    line: &str,
    variant: ManifestVariant,
    line_number: usize,
) -> Result<ImageRecord, ManifestError> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < variant.field_count() {
        return Err(ManifestError::ShortRow {
            line: line_number,
            expected: variant.field_count(),
            found: fields.len(),
        });
    }

    Ok(match variant {
        ManifestVariant::FiveColumn => ImageRecord {
            person_name: fields[0].to_string(),
            image_id: fields[1].to_string(),
            face_id: None,
            url: fields[2].to_string(),
            bbox: fields[3].to_string(),
            content_hash: fields[4].to_string(),
        },
        ManifestVariant::SixColumn => ImageRecord {
            person_name: fields[0].to_string(),
            image_id: fields[1].to_string(),
            face_id: Some(fields[2].to_string()),
            url: fields[3].to_string(),
            bbox: fields[4].to_string(),
            content_hash: fields[5].to_string(),
        },
    })
}
