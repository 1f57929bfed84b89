//! Bill and bill line models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{ImportError, Result};

use super::{BillId, ProviderId, ServiceId};

/// An inclusive billing period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
}

impl Period {
    /// Build a period, rejecting `date_to < date_from`.
    pub fn new(date_from: NaiveDate, date_to: NaiveDate) -> Result<Self> {
        if date_to < date_from {
            return Err(ImportError::InvalidPeriod { date_from, date_to });
        }
        Ok(Self { date_from, date_to })
    }

    /// Inclusive day count: a single-day period counts as 1.
    pub fn total_days(&self) -> i64 {
        (self.date_to - self.date_from).num_days() + 1
    }

    /// Period label used for payment history, e.g. "Aug 2026".
    pub fn month_label(&self) -> String {
        self.date_from.format("%b %Y").to_string()
    }
}

/// Workflow status of a bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    Draft,
    Requested,
    Paid,
    Cancelled,
}

impl std::fmt::Display for BillStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Draft => "draft",
            Self::Requested => "requested",
            Self::Paid => "paid",
            Self::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// One service's due amount within a bill.
///
/// Lines are immutable once created; they live and die with their bill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillLine {
    pub service_id: ServiceId,

    /// Non-negative due amount.
    pub amount: Decimal,

    /// Denormalized from the service for display.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number: Option<String>,

    /// Denormalized from the service for display.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_account_number: Option<String>,
}

/// One billing-period charge record for a provider, composed of
/// per-service lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bill {
    pub id: BillId,
    pub provider_id: ProviderId,
    pub period: Period,
    pub status: BillStatus,

    /// Display name, derived from the source filename with its
    /// extension stripped.
    pub name: String,

    /// Idempotency key over (provider, period, payload).
    pub fingerprint: String,

    lines: Vec<BillLine>,

    /// Always equals the sum of line amounts.
    total_amount: Decimal,
}

impl Bill {
    pub fn new(
        id: BillId,
        provider_id: ProviderId,
        period: Period,
        name: impl Into<String>,
        fingerprint: impl Into<String>,
    ) -> Self {
        Self {
            id,
            provider_id,
            period,
            status: BillStatus::Draft,
            name: name.into(),
            fingerprint: fingerprint.into(),
            lines: Vec::new(),
            total_amount: Decimal::ZERO,
        }
    }

    /// Append a line, keeping the total in sync.
    pub fn push_line(&mut self, line: BillLine) {
        self.total_amount += line.amount;
        self.lines.push(line);
    }

    pub fn lines(&self) -> &[BillLine] {
        &self.lines
    }

    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    /// Move a draft bill to Requested (payment approval requested).
    pub fn confirm(&mut self) -> Result<()> {
        self.transition(BillStatus::Draft, BillStatus::Requested)
    }

    /// Cancel a bill from any non-paid state.
    pub fn cancel(&mut self) -> Result<()> {
        if self.status == BillStatus::Paid {
            return Err(ImportError::InvalidState {
                expected: "draft or requested".to_string(),
                found: self.status.to_string(),
            });
        }
        self.status = BillStatus::Cancelled;
        Ok(())
    }

    pub(crate) fn transition(&mut self, from: BillStatus, to: BillStatus) -> Result<()> {
        if self.status != from {
            return Err(ImportError::InvalidState {
                expected: from.to_string(),
                found: self.status.to_string(),
            });
        }
        self.status = to;
        Ok(())
    }
}

/// Strip the extension from a source filename to name the bill.
pub fn bill_name_from_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);
    match base.rfind('.') {
        Some(pos) if pos > 0 => base[..pos].to_string(),
        _ => base.to_string(),
    }
}
