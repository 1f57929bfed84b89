//! ZIP archive extraction for per-account CSV exports.
//!
//! STC-style exports ship one CSV per billing account inside a ZIP. The
//! account number is embedded in each entry's filename after an `ACT`
//! marker, and the due amount sits at a fixed cell of the entry's CSV.

use std::io::{Cursor, Read};

use tracing::{debug, warn};
use zip::ZipArchive;

use crate::error::ArchiveError;
use crate::models::config::ArchiveConfig;

use super::{Candidate, ExtractionOutcome, ExtractionWarning, MatchKey};

/// Resource-fork junk that macOS-produced archives carry.
const RESOURCE_FORK_PREFIX: &str = "__MACOSX";

/// Extractor for ZIP archives of per-account CSVs.
pub struct ArchiveExtractor<'a> {
    config: &'a ArchiveConfig,
}

impl<'a> ArchiveExtractor<'a> {
    pub fn new(config: &'a ArchiveConfig) -> Self {
        Self { config }
    }

    /// Extract one (billing account, raw amount) candidate per qualifying
    /// entry. Entry-level problems become warnings; only an unreadable
    /// archive is fatal.
    pub fn extract(&self, data: &[u8]) -> Result<ExtractionOutcome, ArchiveError> {
        let mut archive = ZipArchive::new(Cursor::new(data))
            .map_err(|e| ArchiveError::Open(e.to_string()))?;

        if archive.len() > self.config.max_entries {
            return Err(ArchiveError::TooManyEntries {
                found: archive.len(),
                limit: self.config.max_entries,
            });
        }

        let mut outcome = ExtractionOutcome::default();

        for index in 0..archive.len() {
            let mut entry = match archive.by_index(index) {
                Ok(entry) => entry,
                Err(e) => {
                    outcome.warnings.push(ExtractionWarning::EntryUnreadable {
                        entry: format!("#{index}"),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let name = entry.name().to_string();
            if entry.is_dir()
                || name.starts_with(RESOURCE_FORK_PREFIX)
                || !name.to_ascii_lowercase().ends_with(".csv")
            {
                continue;
            }

            let Some(account) = derive_account_key(&name, &self.config.account_marker) else {
                warn!(entry = %name, "no account marker in entry name");
                outcome
                    .warnings
                    .push(ExtractionWarning::AccountMarkerMissing { entry: name });
                continue;
            };

            let mut bytes = Vec::new();
            if let Err(e) = entry.read_to_end(&mut bytes) {
                outcome.warnings.push(ExtractionWarning::EntryUnreadable {
                    entry: name,
                    reason: e.to_string(),
                });
                continue;
            }

            // Provider exports are 8-bit single-byte text; undecodable
            // bytes are replaced, never fatal.
            let (text, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);

            match read_amount_cell(&text, self.config.amount_row, self.config.amount_col) {
                Ok(raw_amount) => {
                    debug!(entry = %name, account = %account, "extracted amount cell");
                    outcome.candidates.push(Candidate {
                        key: MatchKey::BillingAccount(account),
                        raw_amount,
                    });
                }
                Err(CellError::ShortEntry(rows)) => {
                    warn!(entry = %name, rows, "amount cell missing");
                    outcome
                        .warnings
                        .push(ExtractionWarning::AmountCellMissing { entry: name, rows });
                }
                Err(CellError::Malformed(reason)) => {
                    warn!(entry = %name, reason, "entry CSV unparseable");
                    outcome
                        .warnings
                        .push(ExtractionWarning::EntryUnreadable { entry: name, reason });
                }
            }
        }

        Ok(outcome)
    }
}

/// Derive the billing-account key from an entry filename.
///
/// Convention: the text after the *last* marker occurrence, up to the
/// first `_`. `"FOO_ACT987654321_001.csv"` yields `"987654321"`.
pub fn derive_account_key(entry_name: &str, marker: &str) -> Option<String> {
    let base = entry_name.rsplit('/').next().unwrap_or(entry_name);
    let pos = base.rfind(marker)?;
    let after = &base[pos + marker.len()..];
    Some(after.split('_').next().unwrap_or(after).to_string())
}

/// Why the amount cell could not be read from an entry.
enum CellError {
    /// The CSV parsed cleanly but has too few rows (count attached).
    ShortEntry(usize),
    /// A record failed to parse. Dropping it would silently shift the
    /// fixed row index for everything after it, so the whole entry is
    /// rejected instead.
    Malformed(String),
}

/// Read the fixed amount cell out of an entry's CSV text.
fn read_amount_cell(text: &str, row: usize, col: usize) -> Result<String, CellError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows: Vec<csv::StringRecord> = Vec::new();
    for record in reader.records() {
        rows.push(record.map_err(|e| CellError::Malformed(e.to_string()))?);
    }

    match rows.get(row).and_then(|record| record.get(col)) {
        Some(cell) => Ok(cell.to_string()),
        None => Err(CellError::ShortEntry(rows.len())),
    }
}
