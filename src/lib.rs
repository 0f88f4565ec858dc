//! # facegrab
//!
//! A manifest-driven downloader for labeled face-image datasets. A
//! tab-separated manifest is the data source: each row names a person, an
//! image id, a source URL, a face bounding box, and a content hash. facegrab
//! fetches every row's image and writes two JPEGs per record:
//!
//! ```text
//! <root>/<person>/<imageId>.jpg        full image
//! <root>_crop/<person>/<imageId>.jpg   face crop
//! ```
//!
//! Note that the crop tree is a *sibling* of the output root — `_crop` is
//! suffixed onto the root path itself, not nested under it.
//!
//! # Architecture: Parse, Then Materialize
//!
//! The pipeline is two stages composed linearly:
//!
//! ```text
//! 1. Parse        manifest.tsv  →  Vec<ImageRecord>     (fatal on error)
//! 2. Materialize  each record   →  two JPEGs on disk    (failures isolated)
//! ```
//!
//! A manifest that cannot be parsed aborts the run — there is nothing to do.
//! Everything after that is recovered per record: a dead link, a corrupt
//! image body, a malformed bounding box, or a disk error fails *that record
//! only*, is logged with its id and URL, and the run moves on. Bulk dataset
//! manifests are full of dead URLs; one bad row must never sink the other
//! ten thousand.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`manifest`] | Parses the TSV manifest into ordered [`manifest::ImageRecord`]s |
//! | [`fetch`] | Blocking HTTP retrieval behind the [`fetch::Fetcher`] trait |
//! | [`imaging`] | In-memory pixel work: decode, bounding-box parsing, crop |
//! | [`naming`] | Path-segment safety and output-path derivation |
//! | [`materialize`] | Per-record fetch→decode→save→crop→save procedure and the run driver |
//! | [`output`] | CLI output formatting — per-record outcomes and the run summary |
//!
//! # Design Decisions
//!
//! ## Split Error Taxonomy
//!
//! Each failure class gets its own `thiserror` enum (`ManifestError`,
//! `FetchError`, `DecodeError`, `GeometryError`, `StorageError`), collapsed
//! only at the per-record boundary into [`materialize::MaterializeError`].
//! The run summary counts failures per class, so a run against a stale
//! manifest reads as "mostly fetch failures" rather than an
//! undifferentiated error pile.
//!
//! ## Rejected, Not Sanitized
//!
//! `person` and `imageId` come from the manifest and become path segments
//! verbatim. Rows whose segments contain separators, `..`, or NUL bytes are
//! rejected as per-record failures — no escaping, no best-effort mangling.
//!
//! ## No Cleanup On Partial Failure
//!
//! The full image is written before the bounding box is parsed. If the crop
//! step fails, the full image stays on disk. Dataset downloads are re-run
//! constantly; every output write is an overwrite, so a re-run converges
//! without a cleanup pass.
//!
//! ## Sequential By Default
//!
//! Records are processed one at a time in manifest order unless `--jobs`
//! asks for a rayon worker pool. Sequential order is the reference behavior
//! the output log contract is tested against.

pub mod fetch;
pub mod imaging;
pub mod manifest;
pub mod materialize;
pub mod naming;
pub mod output;

#[cfg(test)]
pub(crate) mod test_helpers;
