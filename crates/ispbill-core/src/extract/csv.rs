//! Flat per-service CSV extraction.
//!
//! Declared schema: a header row containing `line_number` and `amount`
//! columns (case-insensitive, extra columns ignored), then one row per
//! service. Rows without a line number are skipped with a warning.

use tracing::{debug, warn};

use crate::error::CsvError;

use super::{Candidate, ExtractionOutcome, ExtractionWarning, MatchKey};

const COLUMN_LINE_NUMBER: &str = "line_number";
const COLUMN_AMOUNT: &str = "amount";

/// Extractor for flat per-service CSVs.
#[derive(Debug, Default)]
pub struct CsvExtractor;

impl CsvExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract one (line number, raw amount) candidate per data row.
    pub fn extract(&self, data: &[u8]) -> Result<ExtractionOutcome, CsvError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(data);

        let headers = reader
            .headers()
            .map_err(|e| CsvError::Malformed(e.to_string()))?
            .clone();

        let line_number_col = column_index(&headers, COLUMN_LINE_NUMBER)
            .ok_or_else(|| CsvError::MissingColumn(COLUMN_LINE_NUMBER.to_string()))?;
        let amount_col = column_index(&headers, COLUMN_AMOUNT)
            .ok_or_else(|| CsvError::MissingColumn(COLUMN_AMOUNT.to_string()))?;

        let mut outcome = ExtractionOutcome::default();

        for (row, record) in reader.records().enumerate() {
            let record = record.map_err(|e| CsvError::Malformed(e.to_string()))?;

            let line_number = record.get(line_number_col).unwrap_or("").trim();
            if line_number.is_empty() {
                warn!(row = row + 1, "row without line number");
                outcome
                    .warnings
                    .push(ExtractionWarning::RowKeyMissing { row: row + 1 });
                continue;
            }

            let raw_amount = record.get(amount_col).unwrap_or("").to_string();
            outcome.candidates.push(Candidate {
                key: MatchKey::LineNumber(line_number.to_string()),
                raw_amount,
            });
        }

        debug!(
            candidates = outcome.candidates.len(),
            warnings = outcome.warnings.len(),
            "flat CSV extraction complete"
        );
        Ok(outcome)
    }
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
}
