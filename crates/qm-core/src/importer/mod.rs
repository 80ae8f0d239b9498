//! Importer for the legacy submission CSV export.
//!
//! The historical system exports one row per evaluation with fixed German
//! metadata columns and one column per (sanitized) question key. The
//! importer turns such an export into [`Submission`] records, tolerating
//! decimal commas, broken timestamps, and unknown extra columns.

use crate::scoring::{AnswerSet, AnswerValue, Scorecard};
use crate::submission::{parse_wire_timestamp, Submission};
use std::io::Read;
use std::path::Path;

/// Metadata columns of the legacy export; everything else is an answer.
const COLUMN_EVALUATOR: &str = "Bewertername";
const COLUMN_TEAM: &str = "Projekt";
const COLUMN_CATALOG: &str = "Kriterienkatalog";
const COLUMN_TIMESTAMP: &str = "Datum";
const COLUMN_EMPLOYEE: &str = "Name";
const COLUMN_POINTS: &str = "Punkte";
const COLUMN_MAX_POINTS: &str = "Erreichbare_Punkte";
const COLUMN_PERCENT: &str = "Prozent";

const META_COLUMNS: &[&str] = &[
    COLUMN_EVALUATOR,
    COLUMN_TEAM,
    COLUMN_CATALOG,
    COLUMN_TIMESTAMP,
    COLUMN_EMPLOYEE,
    COLUMN_POINTS,
    COLUMN_MAX_POINTS,
    COLUMN_PERCENT,
];

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read submission export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid submission CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid catalog JSON data: {0}")]
    Json(#[from] serde_json::Error),
}

pub struct SubmissionImporter;

impl SubmissionImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Submission>, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Submission>, ImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let mut submissions = Vec::new();

        for record in csv_reader.records() {
            let record = record?;
            let field = |name: &str| -> Option<&str> {
                headers
                    .iter()
                    .position(|h| h == name)
                    .and_then(|i| record.get(i))
                    .filter(|value| !value.is_empty())
            };

            let points = field(COLUMN_POINTS).and_then(parse_decimal).unwrap_or(0.0);
            let max_points = field(COLUMN_MAX_POINTS)
                .and_then(parse_decimal)
                .unwrap_or(0.0);
            let percent = field(COLUMN_PERCENT)
                .and_then(parse_decimal)
                .unwrap_or(0.0);

            let mut answers = AnswerSet::new();
            for (index, header) in headers.iter().enumerate() {
                if META_COLUMNS.contains(&header) {
                    continue;
                }
                let Some(raw) = record.get(index).filter(|value| !value.is_empty()) else {
                    continue;
                };
                answers.insert(header.to_string(), parse_answer(raw));
            }

            submissions.push(Submission {
                employee: field(COLUMN_EMPLOYEE).unwrap_or_default().to_string(),
                evaluator: field(COLUMN_EVALUATOR).unwrap_or_default().to_string(),
                team: field(COLUMN_TEAM).unwrap_or_default().to_string(),
                catalog: field(COLUMN_CATALOG).unwrap_or_default().to_string(),
                submitted_at: field(COLUMN_TIMESTAMP).and_then(parse_wire_timestamp),
                answers,
                computed: Scorecard {
                    points,
                    max_points,
                    percent,
                },
            });
        }

        Ok(submissions)
    }
}

fn parse_decimal(value: &str) -> Option<f64> {
    value.trim().replace(',', ".").parse::<f64>().ok()
}

fn parse_answer(raw: &str) -> AnswerValue {
    if let Ok(number) = raw.trim().parse::<f64>() {
        return AnswerValue::Number(number);
    }
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => AnswerValue::Flag(true),
        "false" => AnswerValue::Flag(false),
        _ => AnswerValue::Text(raw.to_string()),
    }
}
