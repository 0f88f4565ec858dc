//! CLI output formatting for record outcomes and the run summary.
//!
//! Each entity follows a two-level pattern: a header line with the record's
//! identity, then indented context lines. Format functions are pure (return
//! `Vec<String>`, no I/O) for testability; each has a `print_*` wrapper
//! that writes to stdout.
//!
//! The failure header keeps the dataset tooling's historical wording —
//! `<imageId>  <url> has trouble !` — verbatim, because downstream scripts
//! grep for it. The indented detail line underneath names the actual
//! failure class.
//!
//! ```text
//! 001 Aaron Eckhart/1
//!     Saved: faces/Aaron Eckhart/1.jpg
//!     Crop:  faces_crop/Aaron Eckhart/1.jpg
//! 2  http://example.com/a2.jpg has trouble !
//!     fetch failed: transport error: connection refused
//! ```

use crate::materialize::{RecordOutcome, RunSummary};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Format one record's outcome: identity header plus context lines.
pub fn format_record_outcome(outcome: &RecordOutcome) -> Vec<String> {
    match &outcome.result {
        Ok(paths) => vec![
            format!(
                "{} {}/{}",
                format_index(outcome.index),
                outcome.person_name,
                outcome.image_id
            ),
            format!("    Saved: {}", paths.full.display()),
            format!("    Crop:  {}", paths.crop.display()),
        ],
        Err(err) => vec![
            format!("{}  {} has trouble !", outcome.image_id, outcome.url),
            format!("    {err}"),
        ],
    }
}

/// Format the end-of-run summary. Failure classes with zero hits are
/// omitted so a clean run is a single line.
pub fn format_run_summary(summary: &RunSummary) -> Vec<String> {
    let mut lines = vec![format!(
        "Materialized {} of {} records",
        summary.succeeded, summary.attempted
    )];

    let classes = [
        ("fetch failures", summary.fetch_failures),
        ("decode failures", summary.decode_failures),
        ("geometry failures", summary.geometry_failures),
        ("storage failures", summary.storage_failures),
        ("unsafe rows rejected", summary.unsafe_path_failures),
    ];
    for (label, count) in classes {
        if count > 0 {
            lines.push(format!("    {label}: {count}"));
        }
    }
    lines
}

pub fn print_record_outcome(outcome: &RecordOutcome) {
    for line in format_record_outcome(outcome) {
        println!("{line}");
    }
}

pub fn print_run_summary(summary: &RunSummary) {
    for line in format_run_summary(summary) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchError;
    use crate::materialize::MaterializeError;
    use crate::naming::RecordPaths;
    use std::path::PathBuf;

    fn success_outcome() -> RecordOutcome {
        RecordOutcome {
            index: 1,
            person_name: "Aaron Eckhart".to_string(),
            image_id: "1".to_string(),
            url: "http://x/a1.jpg".to_string(),
            result: Ok(RecordPaths {
                full_dir: PathBuf::from("faces/Aaron Eckhart"),
                full: PathBuf::from("faces/Aaron Eckhart/1.jpg"),
                crop_dir: PathBuf::from("faces_crop/Aaron Eckhart"),
                crop: PathBuf::from("faces_crop/Aaron Eckhart/1.jpg"),
            }),
        }
    }

    #[test]
    fn success_shows_identity_and_both_paths() {
        let lines = format_record_outcome(&success_outcome());
        assert_eq!(lines[0], "001 Aaron Eckhart/1");
        assert_eq!(lines[1], "    Saved: faces/Aaron Eckhart/1.jpg");
        assert_eq!(lines[2], "    Crop:  faces_crop/Aaron Eckhart/1.jpg");
    }

    #[test]
    fn failure_keeps_historical_trouble_line() {
        let outcome = RecordOutcome {
            index: 7,
            person_name: "Zach Braff".to_string(),
            image_id: "42".to_string(),
            url: "http://x/z42.jpg".to_string(),
            result: Err(MaterializeError::Fetch(FetchError::Transport(
                "connection refused".to_string(),
            ))),
        };

        let lines = format_record_outcome(&outcome);
        assert_eq!(lines[0], "42  http://x/z42.jpg has trouble !");
        assert_eq!(
            lines[1],
            "    fetch failed: transport error: connection refused"
        );
    }

    #[test]
    fn clean_summary_is_one_line() {
        let summary = RunSummary {
            attempted: 3,
            succeeded: 3,
            ..Default::default()
        };
        assert_eq!(
            format_run_summary(&summary),
            vec!["Materialized 3 of 3 records"]
        );
    }

    #[test]
    fn summary_lists_only_nonzero_classes() {
        let summary = RunSummary {
            attempted: 10,
            succeeded: 7,
            fetch_failures: 2,
            geometry_failures: 1,
            ..Default::default()
        };

        let lines = format_run_summary(&summary);
        assert_eq!(
            lines,
            vec![
                "Materialized 7 of 10 records",
                "    fetch failures: 2",
                "    geometry failures: 1",
            ]
        );
    }
}
