//! Format-specific extraction strategies.
//!
//! Every extractor shares one contract: raw bytes in, an
//! [`ExtractionOutcome`] out. Candidates carry an unresolved match key and
//! the raw amount text; resolution against the service directory and
//! amount normalization happen later, in the assembler. Per-entry and
//! per-service problems never abort a run; they become structured
//! warnings in the outcome.

pub mod archive;
pub mod csv;
pub mod pdf;

pub use archive::ArchiveExtractor;
pub use csv::CsvExtractor;
pub use pdf::PdfExtractor;

use serde::Serialize;

/// Key an extractor uses to identify the billed service(s).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKey {
    /// Provider line number, unique to one service (PDF and flat CSV paths).
    LineNumber(String),
    /// Billing-account number, may fan out to several services
    /// (archive path).
    BillingAccount(String),
}

impl std::fmt::Display for MatchKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LineNumber(n) => write!(f, "line {n}"),
            Self::BillingAccount(a) => write!(f, "account {a}"),
        }
    }
}

/// A candidate (match key, raw amount) pair produced by an extractor.
/// Transient: never persisted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub key: MatchKey,
    pub raw_amount: String,
}

/// A non-fatal problem recorded during extraction or resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ExtractionWarning {
    /// A service's line number never appeared in the document.
    ServiceNotMatched { line_number: String },
    /// The line after a matched line number had too few tokens.
    AmountFieldMissing { line_number: String },
    /// A raw amount did not survive normalization.
    AmountUnparseable { key: String, raw: String },
    /// An archive entry name carried no account marker.
    AccountMarkerMissing { entry: String },
    /// An archive entry's CSV had fewer rows than the amount cell needs.
    AmountCellMissing { entry: String, rows: usize },
    /// An archive entry could not be read.
    EntryUnreadable { entry: String, reason: String },
    /// No service in the directory carries this key.
    NoServiceForKey { key: String },
    /// A flat CSV row had no usable match key.
    RowKeyMissing { row: usize },
}

impl std::fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ServiceNotMatched { line_number } => {
                write!(f, "line number {line_number} not found in document")
            }
            Self::AmountFieldMissing { line_number } => {
                write!(f, "no amount field after line number {line_number}")
            }
            Self::AmountUnparseable { key, raw } => {
                write!(f, "unparseable amount {raw:?} for {key}")
            }
            Self::AccountMarkerMissing { entry } => {
                write!(f, "entry {entry:?} has no account marker")
            }
            Self::AmountCellMissing { entry, rows } => {
                write!(f, "entry {entry:?} has only {rows} rows")
            }
            Self::EntryUnreadable { entry, reason } => {
                write!(f, "entry {entry:?} unreadable: {reason}")
            }
            Self::NoServiceForKey { key } => {
                write!(f, "no service found for {key}")
            }
            Self::RowKeyMissing { row } => {
                write!(f, "row {row} has no match key")
            }
        }
    }
}

/// Result of one extraction pass over a payload.
#[derive(Debug, Clone, Default)]
pub struct ExtractionOutcome {
    /// Candidates in document order.
    pub candidates: Vec<Candidate>,
    /// Non-fatal problems, in the order they were hit.
    pub warnings: Vec<ExtractionWarning>,
}

impl ExtractionOutcome {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}
