//! Service records consumed from the service directory.

use serde::{Deserialize, Serialize};

use super::{ProviderId, ServiceId};

/// Lifecycle status of a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    Active,
    Deactive,
    Canceled,
}

impl Default for ServiceStatus {
    fn default() -> Self {
        Self::Active
    }
}

/// A single billable service (one mobile number or circuit) with a provider.
///
/// Read-only to the import pipeline: the pipeline matches against services
/// but never mutates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,

    pub provider_id: ProviderId,

    /// Display name, e.g. "Service - STC".
    pub name: String,

    /// Provider-assigned identifier unique to one service within a provider.
    /// Primary match key for the PDF path. Services without one are never
    /// matched there.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number: Option<String>,

    /// Provider-assigned account id that may cover multiple services.
    /// Match key for the archive path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_account_number: Option<String>,

    #[serde(default)]
    pub status: ServiceStatus,
}

impl Service {
    /// Minimal constructor used by tests and directory loaders.
    pub fn new(id: ServiceId, provider_id: ProviderId, name: impl Into<String>) -> Self {
        Self {
            id,
            provider_id,
            name: name.into(),
            line_number: None,
            billing_account_number: None,
            status: ServiceStatus::Active,
        }
    }

    pub fn with_line_number(mut self, line_number: impl Into<String>) -> Self {
        self.line_number = Some(line_number.into());
        self
    }

    pub fn with_billing_account(mut self, account: impl Into<String>) -> Self {
        self.billing_account_number = Some(account.into());
        self
    }
}
