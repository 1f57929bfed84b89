//! Persistence interface produced to by the import pipeline.

use crate::error::{ImportError, Result};
use crate::models::bill::{Bill, BillLine, Period};
use crate::models::{BillId, LineId, ProviderId};
use crate::payment::PaymentRecord;

/// Header fields for a bill about to be created.
#[derive(Debug, Clone)]
pub struct BillDraft {
    pub provider_id: ProviderId,
    pub period: Period,
    pub name: String,
    pub fingerprint: String,
}

/// Write-side interface the assembler persists through.
///
/// Each call is atomic at the single-record level. The assembler only
/// writes after extraction has fully succeeded, so a failed import never
/// leaves a partial bill behind.
pub trait BillStore {
    /// Create a bill header in Draft state.
    fn create_bill(&mut self, draft: BillDraft) -> Result<BillId>;

    /// Attach one line to an existing bill, keeping its total in sync.
    fn create_bill_line(&mut self, bill: BillId, line: BillLine) -> Result<LineId>;

    /// Look up a previous import by its idempotency fingerprint.
    fn find_by_fingerprint(&self, fingerprint: &str) -> Option<BillId>;

    fn get_bill(&self, id: BillId) -> Option<&Bill>;

    fn get_bill_mut(&mut self, id: BillId) -> Option<&mut Bill>;

    /// Append a payment history record.
    fn record_payment(&mut self, record: PaymentRecord) -> Result<()>;
}

/// In-memory store used by tests and the CLI.
#[derive(Debug, Default)]
pub struct InMemoryBillStore {
    bills: Vec<Bill>,
    payments: Vec<PaymentRecord>,
    next_line_id: u64,
}

impl InMemoryBillStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bills(&self) -> &[Bill] {
        &self.bills
    }

    pub fn payments(&self) -> &[PaymentRecord] {
        &self.payments
    }
}

impl BillStore for InMemoryBillStore {
    fn create_bill(&mut self, draft: BillDraft) -> Result<BillId> {
        let id = BillId(self.bills.len() as u64 + 1);
        self.bills.push(Bill::new(
            id,
            draft.provider_id,
            draft.period,
            draft.name,
            draft.fingerprint,
        ));
        Ok(id)
    }

    fn create_bill_line(&mut self, bill: BillId, line: BillLine) -> Result<LineId> {
        let bill = self
            .bills
            .iter_mut()
            .find(|b| b.id == bill)
            .ok_or_else(|| ImportError::Store(format!("no bill {bill}")))?;
        bill.push_line(line);
        self.next_line_id += 1;
        Ok(LineId(self.next_line_id))
    }

    fn find_by_fingerprint(&self, fingerprint: &str) -> Option<BillId> {
        self.bills
            .iter()
            .find(|b| b.fingerprint == fingerprint)
            .map(|b| b.id)
    }

    fn get_bill(&self, id: BillId) -> Option<&Bill> {
        self.bills.iter().find(|b| b.id == id)
    }

    fn get_bill_mut(&mut self, id: BillId) -> Option<&mut Bill> {
        self.bills.iter_mut().find(|b| b.id == id)
    }

    fn record_payment(&mut self, record: PaymentRecord) -> Result<()> {
        self.payments.push(record);
        Ok(())
    }
}
