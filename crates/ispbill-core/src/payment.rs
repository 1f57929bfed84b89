//! Payment posting for confirmed bills.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use crate::error::{ImportError, Result};
use crate::models::bill::{BillStatus, Period};
use crate::models::{BillId, ServiceId};
use crate::store::BillStore;

/// One settled charge in a service's payment history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentRecord {
    pub service_id: ServiceId,
    pub amount: Decimal,
    pub period: Period,
    /// Display label, e.g. "STC - Aug 2026".
    pub period_name: String,
}

/// Post payment for a requested bill: one payment record per line, then
/// mark the store-held bill Paid. Called when finance confirms the
/// payment.
pub fn post_payment(
    store: &mut dyn BillStore,
    bill_id: BillId,
    provider_name: &str,
) -> Result<()> {
    let bill = store
        .get_bill(bill_id)
        .ok_or_else(|| ImportError::Store(format!("no bill {bill_id}")))?;

    if bill.status != BillStatus::Requested {
        return Err(ImportError::InvalidState {
            expected: BillStatus::Requested.to_string(),
            found: bill.status.to_string(),
        });
    }

    let period_name = format!("{provider_name} - {}", bill.period.month_label());
    let records: Vec<PaymentRecord> = bill
        .lines()
        .iter()
        .map(|line| PaymentRecord {
            service_id: line.service_id,
            amount: line.amount,
            period: bill.period,
            period_name: period_name.clone(),
        })
        .collect();
    let line_count = records.len();

    for record in records {
        store.record_payment(record)?;
    }

    store
        .get_bill_mut(bill_id)
        .ok_or_else(|| ImportError::Store(format!("no bill {bill_id}")))?
        .transition(BillStatus::Requested, BillStatus::Paid)?;

    info!(bill = %bill_id, lines = line_count, "payment posted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::bill::BillLine;
    use crate::models::ProviderId;
    use crate::store::{BillDraft, InMemoryBillStore};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn period() -> Period {
        Period::new(
            NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 8, 31).unwrap(),
        )
        .unwrap()
    }

    fn stored_bill(store: &mut InMemoryBillStore) -> BillId {
        let id = store
            .create_bill(BillDraft {
                provider_id: ProviderId(1),
                period: period(),
                name: "stc_aug".to_string(),
                fingerprint: "fp".to_string(),
            })
            .unwrap();
        store
            .create_bill_line(
                id,
                BillLine {
                    service_id: ServiceId(1),
                    amount: Decimal::from_str("138.00").unwrap(),
                    line_number: None,
                    billing_account_number: None,
                },
            )
            .unwrap();
        store
            .create_bill_line(
                id,
                BillLine {
                    service_id: ServiceId(2),
                    amount: Decimal::from_str("61.50").unwrap(),
                    line_number: None,
                    billing_account_number: None,
                },
            )
            .unwrap();
        id
    }

    #[test]
    fn test_posts_one_record_per_line_and_marks_store_bill_paid() {
        let mut store = InMemoryBillStore::new();
        let id = stored_bill(&mut store);
        store.get_bill_mut(id).unwrap().confirm().unwrap();

        post_payment(&mut store, id, "STC").unwrap();

        // The store-held bill itself reads Paid, not just a caller copy.
        assert_eq!(store.get_bill(id).unwrap().status, BillStatus::Paid);
        assert_eq!(store.payments().len(), 2);
        assert_eq!(store.payments()[0].period_name, "STC - Aug 2026");
        assert_eq!(
            store.payments()[0].amount,
            Decimal::from_str("138.00").unwrap()
        );
    }

    #[test]
    fn test_draft_bill_cannot_be_posted() {
        let mut store = InMemoryBillStore::new();
        let id = stored_bill(&mut store);

        let err = post_payment(&mut store, id, "STC").unwrap_err();
        assert!(matches!(err, ImportError::InvalidState { .. }));
        assert!(store.payments().is_empty());
        assert_eq!(store.get_bill(id).unwrap().status, BillStatus::Draft);
    }

    #[test]
    fn test_unknown_bill_is_a_store_error() {
        let mut store = InMemoryBillStore::new();
        let err = post_payment(&mut store, BillId(99), "STC").unwrap_err();
        assert!(matches!(err, ImportError::Store(_)));
    }
}
