//! Core library for ISP invoice import processing.
//!
//! This crate provides:
//! - Format detection for uploaded provider invoices (PDF, ZIP of CSVs, flat CSV)
//! - Per-format extraction of (match key, raw amount) candidates
//! - Reconciliation against a read-only service directory
//! - Idempotent bill assembly and payment posting

pub mod amount;
pub mod directory;
pub mod error;
pub mod extract;
pub mod format;
pub mod import;
pub mod models;
pub mod payment;
pub mod store;

pub use amount::{clean_amount, parse_amount};
pub use directory::{InMemoryServiceDirectory, ServiceDirectory};
pub use error::{ImportError, Result};
pub use extract::{Candidate, ExtractionOutcome, ExtractionWarning, MatchKey};
pub use format::FileFormat;
pub use import::{ImportOutcome, ImportRequest, Importer};
pub use models::bill::{Bill, BillLine, BillStatus, Period};
pub use models::config::ImportConfig;
pub use models::service::{Service, ServiceStatus};
pub use models::{BillId, LineId, ProviderId, ServiceId};
pub use payment::{post_payment, PaymentRecord};
pub use store::{BillDraft, BillStore, InMemoryBillStore};
