//! Read-only service directory consumed by the import pipeline.
//!
//! The directory is an explicit dependency passed into each import call,
//! never ambient state. The pipeline only reads from it; many concurrent
//! imports may share one directory.

use crate::models::service::Service;
use crate::models::ProviderId;

/// Lookup interface over known services.
pub trait ServiceDirectory {
    /// All services belonging to a provider. Return order is backend
    /// defined; the PDF extractor scans services in this order.
    fn find_by_provider(&self, provider: ProviderId) -> Vec<Service>;

    /// Services of a provider sharing one billing-account number.
    /// One account may back multiple services.
    fn find_by_billing_account(&self, provider: ProviderId, account: &str) -> Vec<Service>;
}

/// In-memory directory backed by a flat service list.
///
/// Used by tests and the CLI (which loads it from a services CSV);
/// a production deployment would implement [`ServiceDirectory`] over its
/// own persistence.
#[derive(Debug, Clone, Default)]
pub struct InMemoryServiceDirectory {
    services: Vec<Service>,
}

impl InMemoryServiceDirectory {
    pub fn new(services: Vec<Service>) -> Self {
        Self { services }
    }

    pub fn push(&mut self, service: Service) {
        self.services.push(service);
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl ServiceDirectory for InMemoryServiceDirectory {
    fn find_by_provider(&self, provider: ProviderId) -> Vec<Service> {
        self.services
            .iter()
            .filter(|s| s.provider_id == provider)
            .cloned()
            .collect()
    }

    fn find_by_billing_account(&self, provider: ProviderId, account: &str) -> Vec<Service> {
        self.services
            .iter()
            .filter(|s| {
                s.provider_id == provider
                    && s.billing_account_number.as_deref() == Some(account)
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ServiceId;
    use pretty_assertions::assert_eq;

    fn directory() -> InMemoryServiceDirectory {
        InMemoryServiceDirectory::new(vec![
            Service::new(ServiceId(1), ProviderId(1), "Service - Mobily")
                .with_line_number("0501234567"),
            Service::new(ServiceId(2), ProviderId(2), "Service - STC")
                .with_billing_account("987654321"),
            Service::new(ServiceId(3), ProviderId(2), "Service - STC")
                .with_billing_account("987654321"),
        ])
    }

    #[test]
    fn test_find_by_provider() {
        let dir = directory();
        assert_eq!(dir.find_by_provider(ProviderId(1)).len(), 1);
        assert_eq!(dir.find_by_provider(ProviderId(2)).len(), 2);
        assert_eq!(dir.find_by_provider(ProviderId(9)).len(), 0);
    }

    #[test]
    fn test_billing_account_fans_out() {
        let dir = directory();
        let hits = dir.find_by_billing_account(ProviderId(2), "987654321");
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_billing_account_scoped_to_provider() {
        let dir = directory();
        assert!(dir.find_by_billing_account(ProviderId(1), "987654321").is_empty());
    }
}
