//! Per-record materialization and the run driver.
//!
//! Stage 2 of the facegrab pipeline. For each [`ImageRecord`] the procedure
//! is a single linear attempt:
//!
//! 1. Validate `person_name`/`image_id` and derive both destination paths
//! 2. Fetch the image bytes from the record's URL
//! 3. Decode them into an in-memory image
//! 4. Ensure `<root>/<person>` exists and save the full image as JPEG
//! 5. Parse the bounding box and crop
//! 6. Ensure `<root>_crop/<person>` exists and save the crop as JPEG
//!
//! The bounding box is parsed *after* the full image is saved, so a bad box
//! leaves the full image on disk — no cleanup is attempted. Every write is
//! an overwrite and directory creation is idempotent, so re-running a
//! manifest converges.
//!
//! Any failure is caught at the record boundary as a [`MaterializeError`],
//! reported through the outcome channel, and counted by class in the
//! [`RunSummary`]; the run itself never aborts because of one bad record.
//!
//! [`run`] drives the whole record sequence: strictly sequential in
//! manifest order by default, or over rayon workers when `jobs > 1`.

use crate::fetch::{FetchError, Fetcher};
use crate::imaging::{self, BBox, DecodeError, GeometryError};
use crate::manifest::ImageRecord;
use crate::naming::{self, RecordPaths, SegmentError};
use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

const JPEG_QUALITY: u8 = 90;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to create {path}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to encode JPEG {path}: {source}")]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Everything that can fail for a single record.
#[derive(Error, Debug)]
pub enum MaterializeError {
    #[error("unsafe manifest value: {0}")]
    UnsafePath(#[from] SegmentError),
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),
    #[error("bad crop geometry: {0}")]
    Geometry(#[from] GeometryError),
    #[error("storage failed: {0}")]
    Storage(#[from] StorageError),
}

/// Failure class, for run-summary accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    UnsafePath,
    Fetch,
    Decode,
    Geometry,
    Storage,
}

impl MaterializeError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::UnsafePath(_) => FailureKind::UnsafePath,
            Self::Fetch(_) => FailureKind::Fetch,
            Self::Decode(_) => FailureKind::Decode,
            Self::Geometry(_) => FailureKind::Geometry,
            Self::Storage(_) => FailureKind::Storage,
        }
    }
}

/// Materialize one record: fetch, decode, save full image, crop, save crop.
///
/// Returns the destination paths on success. On failure nothing is cleaned
/// up; outputs already written for this record stay on disk.
pub fn materialize(
    fetcher: &dyn Fetcher,
    record: &ImageRecord,
    root: &Path,
) -> Result<RecordPaths, MaterializeError> {
    let paths = naming::record_paths(root, &record.person_name, &record.image_id)?;

    let bytes = fetcher.fetch(&record.url)?;
    let img = imaging::decode(&bytes)?;

    ensure_dir(&paths.full_dir)?;
    save_jpeg(&img, &paths.full)?;

    let bbox: BBox = record.bbox.parse()?;
    let cropped = imaging::crop_to_box(&img, &bbox)?;

    ensure_dir(&paths.crop_dir)?;
    save_jpeg(&cropped, &paths.crop)?;

    Ok(paths)
}

/// Create a directory and its parents; a no-op if it already exists.
fn ensure_dir(dir: &Path) -> Result<(), StorageError> {
    fs::create_dir_all(dir).map_err(|source| StorageError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Save as JPEG, overwriting any existing file.
///
/// JPEG has no alpha channel, so the image is flattened to RGB8 first —
/// PNG and WebP sources with alpha still materialize.
fn save_jpeg(img: &DynamicImage, path: &Path) -> Result<(), StorageError> {
    let file = File::create(path).map_err(|source| StorageError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    let encoder = JpegEncoder::new_with_quality(BufWriter::new(file), JPEG_QUALITY);
    img.to_rgb8()
        .write_with_encoder(encoder)
        .map_err(|source| StorageError::Encode {
            path: path.to_path_buf(),
            source,
        })
}

/// Outcome of one record attempt, emitted to the printer channel.
#[derive(Debug)]
pub struct RecordOutcome {
    /// 1-based manifest position.
    pub index: usize,
    pub person_name: String,
    pub image_id: String,
    pub url: String,
    pub result: Result<RecordPaths, MaterializeError>,
}

/// Aggregate counts for a whole run, failures broken down by class.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub unsafe_path_failures: usize,
    pub fetch_failures: usize,
    pub decode_failures: usize,
    pub geometry_failures: usize,
    pub storage_failures: usize,
}

impl RunSummary {
    pub fn failed(&self) -> usize {
        self.attempted - self.succeeded
    }

    fn tally(&mut self, failure: Option<FailureKind>) {
        self.attempted += 1;
        match failure {
            None => self.succeeded += 1,
            Some(FailureKind::UnsafePath) => self.unsafe_path_failures += 1,
            Some(FailureKind::Fetch) => self.fetch_failures += 1,
            Some(FailureKind::Decode) => self.decode_failures += 1,
            Some(FailureKind::Geometry) => self.geometry_failures += 1,
            Some(FailureKind::Storage) => self.storage_failures += 1,
        }
    }
}

/// Materialize every record against the output root.
///
/// With `jobs <= 1` records run sequentially in manifest order, so outcome
/// events arrive in order too. With `jobs > 1` records run on the rayon
/// pool and event order follows completion order.
pub fn run(
    fetcher: &dyn Fetcher,
    records: &[ImageRecord],
    root: &Path,
    jobs: usize,
    events: Option<Sender<RecordOutcome>>,
) -> RunSummary {
    let mut summary = RunSummary::default();

    if jobs > 1 {
        let failures: Vec<Option<FailureKind>> = records
            .par_iter()
            .enumerate()
            .map(|(i, record)| attempt(fetcher, i + 1, record, root, events.as_ref()))
            .collect();
        for failure in failures {
            summary.tally(failure);
        }
    } else {
        for (i, record) in records.iter().enumerate() {
            let failure = attempt(fetcher, i + 1, record, root, events.as_ref());
            summary.tally(failure);
        }
    }

    summary
}

fn attempt(
    fetcher: &dyn Fetcher,
    index: usize,
    record: &ImageRecord,
    root: &Path,
    events: Option<&Sender<RecordOutcome>>,
) -> Option<FailureKind> {
    let result = materialize(fetcher, record, root);
    let failure = result.as_ref().err().map(MaterializeError::kind);

    if let Some(tx) = events {
        // A dropped receiver just means nobody is printing
        tx.send(RecordOutcome {
            index,
            person_name: record.person_name.clone(),
            image_id: record.image_id.clone(),
            url: record.url.clone(),
            result,
        })
        .ok();
    }

    failure
}
