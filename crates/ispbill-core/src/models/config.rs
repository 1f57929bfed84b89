//! Configuration for the import pipeline.
//!
//! The positional conventions of the provider documents (which token on the
//! line after a matched line number, which cell of an archive entry) live
//! here so format drift is a one-line change.

use serde::{Deserialize, Serialize};

/// Main configuration for the import pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// PDF extraction configuration.
    pub pdf: PdfConfig,

    /// ZIP archive extraction configuration.
    pub archive: ArchiveConfig,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            pdf: PdfConfig::default(),
            archive: ArchiveConfig::default(),
        }
    }
}

/// PDF extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Whitespace-token index of the amount on the line following a
    /// matched line number.
    pub amount_token_index: usize,

    /// Page budget for hostile or runaway documents.
    pub max_pages: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            amount_token_index: 1,
            max_pages: 500,
        }
    }
}

/// ZIP archive extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Marker preceding the billing-account number in entry filenames.
    pub account_marker: String,

    /// 0-based row of the due-amount cell in each entry's CSV.
    pub amount_row: usize,

    /// 0-based column of the due-amount cell in each entry's CSV.
    pub amount_col: usize,

    /// Entry budget for hostile or runaway archives.
    pub max_entries: usize,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            account_marker: "ACT".to_string(),
            amount_row: 13,
            amount_col: 0,
            max_entries: 2000,
        }
    }
}

impl ImportConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}
