use std::path::Path;
use thiserror::Error;

use crate::models::{Person, SurveyResponse};

/// Errors that can occur when reading survey responses
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed survey export: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed survey export: {0}")]
    Csv(#[from] csv::Error),
}

/// Layout of a form export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// Spreadsheet export with the form questions as the header row
    Csv,
    /// Array with one object per response
    Json,
}

impl InputFormat {
    /// Format implied by the file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Format guessed from the document itself
    pub fn detect(text: &str) -> Self {
        match strip_bom(text).trim_start().chars().next() {
            Some('[') | Some('{') => Self::Json,
            _ => Self::Csv,
        }
    }
}

/// Load a form export from disk
///
/// `.csv` and `.json` files are read as such, anything else is detected from
/// its content. Rows without both a name and an email are skipped with a
/// warning.
pub fn load_responses<P: AsRef<Path>>(path: P) -> Result<Vec<Person>, IngestError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let format = InputFormat::from_path(path).unwrap_or_else(|| InputFormat::detect(&text));
    let people = parse_responses_as(&text, format)?;

    tracing::info!(
        "Loaded {} respondents from {} ({:?})",
        people.len(),
        path.display(),
        format
    );
    Ok(people)
}

/// Parse an in-memory export, detecting CSV or JSON from the content
pub fn parse_responses(text: &str) -> Result<Vec<Person>, IngestError> {
    parse_responses_as(text, InputFormat::detect(text))
}

/// Parse an in-memory export in a known format
pub fn parse_responses_as(text: &str, format: InputFormat) -> Result<Vec<Person>, IngestError> {
    let text = strip_bom(text);
    let responses: Vec<SurveyResponse> = match format {
        InputFormat::Json => serde_json::from_str(text)?,
        InputFormat::Csv => read_csv(text)?,
    };
    Ok(normalize_responses(responses))
}

fn read_csv(text: &str) -> Result<Vec<SurveyResponse>, csv::Error> {
    // Form exports leave trailing blanks off short rows
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes());

    reader.deserialize().collect()
}

fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

fn normalize_responses(responses: Vec<SurveyResponse>) -> Vec<Person> {
    let total = responses.len();
    let people: Vec<Person> = responses
        .into_iter()
        .enumerate()
        .filter_map(|(row, response)| {
            let person = response.into_person();
            if person.is_none() {
                tracing::warn!("Skipping response row {}: no name or email", row + 1);
            }
            person
        })
        .collect();

    if people.len() < total {
        tracing::warn!("Skipped {} of {} responses", total - people.len(), total);
    }
    people
}
