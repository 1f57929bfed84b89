//! Error types for the ispbill-core library.

use thiserror::Error;

/// Main error type for the ispbill library.
#[derive(Error, Debug)]
pub enum ImportError {
    /// Filename extension is not one of pdf, zip, csv.
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Billing period end precedes its start.
    #[error("invalid billing period: {date_to} is before {date_from}")]
    InvalidPeriod {
        date_from: chrono::NaiveDate,
        date_to: chrono::NaiveDate,
    },

    /// An identical import (provider, period, payload) was already persisted.
    #[error("duplicate import: fingerprint {0} already billed")]
    DuplicateImport(String),

    /// A bill state transition that the lifecycle does not allow.
    #[error("invalid bill state: expected {expected}, found {found}")]
    InvalidState { expected: String, found: String },

    /// PDF extraction error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// ZIP archive extraction error.
    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// Flat CSV extraction error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Persistence error from the bill store.
    #[error("store error: {0}")]
    Store(String),
}

/// Errors related to PDF document processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF payload.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from the PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The document exceeds the configured page budget.
    #[error("too many pages: {found} (limit {limit})")]
    TooManyPages { found: usize, limit: usize },
}

/// Errors related to ZIP archive processing.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// The payload is not a readable ZIP archive.
    #[error("failed to open archive: {0}")]
    Open(String),

    /// The archive exceeds the configured entry budget.
    #[error("too many entries: {found} (limit {limit})")]
    TooManyEntries { found: usize, limit: usize },
}

/// Errors related to flat per-service CSV processing.
#[derive(Error, Debug)]
pub enum CsvError {
    /// The payload could not be parsed as CSV at all.
    #[error("malformed CSV: {0}")]
    Malformed(String),

    /// A required column is absent from the header row.
    #[error("missing required column: {0}")]
    MissingColumn(String),
}

/// Errors from amount normalization.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AmountError {
    /// Nothing survived cleaning (no digits or dots in the raw token).
    #[error("empty amount after cleaning: {0:?}")]
    Empty(String),

    /// Cleaned token is not a parseable decimal.
    #[error("malformed amount: {0:?}")]
    Malformed(String),
}

/// Result type for the ispbill library.
pub type Result<T> = std::result::Result<T, ImportError>;
