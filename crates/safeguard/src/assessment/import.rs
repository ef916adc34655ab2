use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde_json::{Map, Value};

use super::domain::Submission;

#[derive(Debug)]
pub enum SubmissionImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Row { line: u64, source: serde_json::Error },
}

impl std::fmt::Display for SubmissionImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionImportError::Io(err) => write!(f, "failed to read submission export: {}", err),
            SubmissionImportError::Csv(err) => write!(f, "invalid submission CSV data: {}", err),
            SubmissionImportError::Row { line, source } => {
                write!(f, "could not read submission on line {}: {}", line, source)
            }
        }
    }
}

impl std::error::Error for SubmissionImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SubmissionImportError::Io(err) => Some(err),
            SubmissionImportError::Csv(err) => Some(err),
            SubmissionImportError::Row { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for SubmissionImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for SubmissionImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads submissions from a CSV export whose header row names submission fields.
///
/// Cells go through the same coercion as JSON form posts, so `"13"` hours and
/// `"no"` for PPE behave exactly like their typed equivalents. Empty cells are
/// absent.
pub struct SubmissionCsvImporter;

impl SubmissionCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Submission>, SubmissionImportError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Submission>, SubmissionImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|header| header.to_ascii_lowercase().replace([' ', '-'], "_"))
            .collect();

        let mut submissions = Vec::new();
        for row in csv_reader.records() {
            let row = row?;
            let line = row.position().map(|position| position.line()).unwrap_or_default();

            let fields: Map<String, Value> = headers
                .iter()
                .zip(row.iter())
                .filter(|(_, cell)| !cell.is_empty())
                .map(|(header, cell)| (header.clone(), Value::String(cell.to_string())))
                .collect();

            let submission = serde_json::from_value(Value::Object(fields))
                .map_err(|source| SubmissionImportError::Row { line, source })?;
            submissions.push(submission);
        }

        Ok(submissions)
    }
}
