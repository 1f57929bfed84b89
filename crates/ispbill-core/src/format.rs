//! Upload format detection.
//!
//! Dispatch is by filename extension only, case-insensitive. Content
//! sniffing is deliberately out: an explicit, testable contract beats a
//! heuristic one for operator-uploaded files.

use serde::{Deserialize, Serialize};

use crate::error::{ImportError, Result};

/// Supported invoice upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileFormat {
    /// Paginated provider statement (Mobily-style).
    Pdf,
    /// ZIP of per-account CSV exports (STC-style).
    Zip,
    /// Flat per-service CSV.
    Csv,
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pdf => "pdf",
            Self::Zip => "zip",
            Self::Csv => "csv",
        };
        f.write_str(s)
    }
}

impl FileFormat {
    /// Classify a filename by its extension.
    pub fn detect(filename: &str) -> Result<Self> {
        let extension = match filename.rsplit_once('.') {
            Some((_, ext)) => ext.to_ascii_lowercase(),
            None => String::new(),
        };

        match extension.as_str() {
            "pdf" => Ok(Self::Pdf),
            "zip" => Ok(Self::Zip),
            "csv" => Ok(Self::Csv),
            _ => Err(ImportError::UnsupportedFormat(filename.to_string())),
        }
    }
}
