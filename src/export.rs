use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use serde::Serialize;
use thiserror::Error;

use crate::models::{MatchReport, MatchedPair};

/// Header row of the per-match spreadsheet
pub const MATCH_COLUMNS: [&str; 13] = [
    "Rank",
    "Person 1 Name",
    "Person 1 Email",
    "Person 2 Name",
    "Person 2 Email",
    "Compatibility Score",
    "Shared Hobbies",
    "Shared Interests",
    "Key Matches",
    "Reasoning",
    "Potential Concerns",
    "Person 1 Looking For",
    "Person 2 Looking For",
];

/// Errors that can occur when writing a report
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write match rows: {0}")]
    Csv(#[from] csv::Error),
}

/// One spreadsheet row, in `MATCH_COLUMNS` order
#[derive(Debug, Serialize)]
struct MatchRow<'a> {
    rank: usize,
    person1_name: &'a str,
    person1_email: &'a str,
    person2_name: &'a str,
    person2_email: &'a str,
    score: String,
    shared_hobbies: String,
    shared_interests: String,
    key_matches: String,
    reasoning: &'a str,
    concerns: String,
    person1_looking_for: &'a str,
    person2_looking_for: &'a str,
}

impl<'a> From<&'a MatchedPair> for MatchRow<'a> {
    fn from(matched: &'a MatchedPair) -> Self {
        let shared_hobbies = if matched.shared_hobbies.is_empty() {
            "None".to_string()
        } else {
            matched.shared_hobbies.join(", ")
        };

        Self {
            rank: matched.rank,
            person1_name: &matched.person1_name,
            person1_email: &matched.person1_email,
            person2_name: &matched.person2_name,
            person2_email: &matched.person2_email,
            score: matched.formatted_score(),
            shared_hobbies,
            shared_interests: matched.shared_interests.join(", "),
            key_matches: matched.key_matches.join(", "),
            reasoning: matched.rationale.as_deref().unwrap_or_default(),
            concerns: matched.concerns.join(", "),
            person1_looking_for: matched.person1_looking_for.as_deref().unwrap_or_default(),
            person2_looking_for: matched.person2_looking_for.as_deref().unwrap_or_default(),
        }
    }
}

/// Write the report as pretty-printed JSON
pub fn write_report<P: AsRef<Path>>(report: &MatchReport, path: P) -> Result<(), ExportError> {
    let path = path.as_ref();
    let io_error = |source| ExportError::Io {
        path: path.display().to_string(),
        source,
    };

    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.write_all(b"\n").map_err(io_error)?;
    writer.flush().map_err(io_error)?;

    tracing::info!(
        "Wrote {} matches to {}",
        report.matches.len(),
        path.display()
    );
    Ok(())
}

/// Write one CSV row per match, best first
///
/// The header row is written even when nothing matched.
pub fn write_match_rows<P: AsRef<Path>>(report: &MatchReport, path: P) -> Result<(), ExportError> {
    let path = path.as_ref();
    let io_error = |source| ExportError::Io {
        path: path.display().to_string(),
        source,
    };

    let file = File::create(path).map_err(io_error)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(BufWriter::new(file));

    writer.write_record(MATCH_COLUMNS)?;
    for matched in &report.matches {
        writer.serialize(MatchRow::from(matched))?;
    }
    writer.flush().map_err(io_error)?;

    tracing::info!(
        "Wrote {} match rows to {}",
        report.matches.len(),
        path.display()
    );
    Ok(())
}

/// Human-readable summary of the best `top_n` matches
pub fn render_summary(report: &MatchReport, top_n: usize) -> String {
    let rule = "=".repeat(50);
    let mut out = String::new();

    let _ = writeln!(out, "Found {} matches!", report.stats.matched_pairs);
    let _ = writeln!(out, "{} people unmatched", report.stats.unmatched_people);
    if report.stats.degraded_pairs > 0 {
        let _ = writeln!(
            out,
            "{} pairs were scored without a collaborator result",
            report.stats.degraded_pairs
        );
    }

    if top_n == 0 || report.matches.is_empty() {
        return out;
    }

    let _ = writeln!(out, "\n{}\nTOP MATCHES:\n{}", rule, rule);
    for matched in report.matches.iter().take(top_n) {
        let _ = writeln!(out, "\nMatch #{}: {}", matched.rank, matched.formatted_score());
        let _ = writeln!(out, "  {} + {}", matched.person1_name, matched.person2_name);
        if let Some(rationale) = &matched.rationale {
            let _ = writeln!(out, "  Reasoning: {}", rationale);
        }

        let shared = if matched.shared_interests.is_empty() {
            &matched.shared_hobbies
        } else {
            &matched.shared_interests
        };
        if !shared.is_empty() {
            let _ = writeln!(out, "  Shared interests: {}", shared.join(", "));
        }
    }

    out
}
