//! The invoice import pipeline: detect, extract, reconcile, persist.

use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::amount::parse_amount;
use crate::directory::ServiceDirectory;
use crate::error::{ImportError, Result};
use crate::extract::{
    ArchiveExtractor, Candidate, CsvExtractor, ExtractionOutcome, ExtractionWarning, MatchKey,
    PdfExtractor,
};
use crate::format::FileFormat;
use crate::models::bill::{bill_name_from_filename, Bill, BillLine, Period};
use crate::models::config::ImportConfig;
use crate::models::service::Service;
use crate::models::ProviderId;
use crate::store::{BillDraft, BillStore};

/// One invoice upload to import.
#[derive(Debug, Clone)]
pub struct ImportRequest {
    pub provider_id: ProviderId,
    /// Validated billing period ([`Period::new`] rejects reversed dates
    /// before any import work starts).
    pub period: Period,
    /// Source filename; drives format dispatch and the bill name.
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Result of a successful import call.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ImportOutcome {
    /// The persisted bill with its lines.
    pub bill: Bill,
    /// Every non-fatal problem hit during extraction and resolution, so
    /// callers can render "N of M services billed".
    pub diagnostics: Vec<ExtractionWarning>,
}

/// The bill assembler: orchestrates one import call end to end.
///
/// The service directory is an explicit read-only dependency; the store is
/// passed per call and only written to after extraction has fully
/// succeeded.
pub struct Importer<'a> {
    directory: &'a dyn ServiceDirectory,
    config: ImportConfig,
}

impl<'a> Importer<'a> {
    pub fn new(directory: &'a dyn ServiceDirectory, config: ImportConfig) -> Self {
        Self { directory, config }
    }

    /// Import one provider invoice, producing a Draft bill with one line
    /// per matched service. Zero matches is a valid outcome.
    pub fn import_invoice(
        &self,
        store: &mut dyn BillStore,
        request: &ImportRequest,
    ) -> Result<ImportOutcome> {
        let format = FileFormat::detect(&request.filename)?;

        let fingerprint = import_fingerprint(request.provider_id, &request.period, &request.bytes);
        if store.find_by_fingerprint(&fingerprint).is_some() {
            return Err(ImportError::DuplicateImport(fingerprint));
        }

        info!(
            provider = %request.provider_id,
            %format,
            filename = %request.filename,
            days = request.period.total_days(),
            "starting invoice import"
        );

        let services = self.directory.find_by_provider(request.provider_id);
        let extraction = self.run_extractor(format, &request.bytes, &services)?;

        let mut diagnostics = extraction.warnings;
        let lines = self.resolve(&extraction.candidates, &services, request, &mut diagnostics);

        // All persistence happens after extraction and resolution, so a
        // failed run never leaves a partial bill visible.
        let bill_id = store.create_bill(BillDraft {
            provider_id: request.provider_id,
            period: request.period,
            name: bill_name_from_filename(&request.filename),
            fingerprint,
        })?;
        for line in lines {
            store.create_bill_line(bill_id, line)?;
        }

        let bill = store
            .get_bill(bill_id)
            .cloned()
            .ok_or_else(|| ImportError::Store(format!("bill {bill_id} vanished after create")))?;

        info!(
            bill = %bill_id,
            lines = bill.lines().len(),
            total = %bill.total_amount(),
            warnings = diagnostics.len(),
            "invoice import complete"
        );
        Ok(ImportOutcome { bill, diagnostics })
    }

    fn run_extractor(
        &self,
        format: FileFormat,
        bytes: &[u8],
        services: &[Service],
    ) -> Result<ExtractionOutcome> {
        let outcome = match format {
            FileFormat::Pdf => PdfExtractor::new(&self.config.pdf).extract(bytes, services)?,
            FileFormat::Zip => ArchiveExtractor::new(&self.config.archive).extract(bytes)?,
            FileFormat::Csv => CsvExtractor::new().extract(bytes)?,
        };
        debug!(candidates = outcome.candidates.len(), "extraction finished");
        Ok(outcome)
    }

    /// Resolve candidates against the directory and normalize amounts.
    ///
    /// A line-number key resolves to at most one service; a billing-account
    /// key fans out to every service under that account, all sharing the
    /// one parsed amount. Unresolvable keys and unparseable amounts are
    /// skip-and-warn in every path.
    fn resolve(
        &self,
        candidates: &[Candidate],
        services: &[Service],
        request: &ImportRequest,
        diagnostics: &mut Vec<ExtractionWarning>,
    ) -> Vec<BillLine> {
        let mut lines = Vec::new();

        for candidate in candidates {
            let matched: Vec<Service> = match &candidate.key {
                MatchKey::LineNumber(number) => services
                    .iter()
                    .filter(|s| s.line_number.as_deref() == Some(number.as_str()))
                    .take(1)
                    .cloned()
                    .collect(),
                MatchKey::BillingAccount(account) => self
                    .directory
                    .find_by_billing_account(request.provider_id, account),
            };

            if matched.is_empty() {
                diagnostics.push(ExtractionWarning::NoServiceForKey {
                    key: candidate.key.to_string(),
                });
                continue;
            }

            let amount = match parse_amount(&candidate.raw_amount) {
                Ok(amount) => amount,
                Err(e) => {
                    warn!(key = %candidate.key, error = %e, "skipping unparseable amount");
                    diagnostics.push(ExtractionWarning::AmountUnparseable {
                        key: candidate.key.to_string(),
                        raw: candidate.raw_amount.clone(),
                    });
                    continue;
                }
            };

            for service in &matched {
                lines.push(BillLine {
                    service_id: service.id,
                    amount,
                    line_number: service.line_number.clone(),
                    billing_account_number: service.billing_account_number.clone(),
                });
            }
        }

        lines
    }
}

/// Idempotency key over (provider, period, payload).
pub fn import_fingerprint(provider: ProviderId, period: &Period, bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(provider.0.to_be_bytes());
    hasher.update(period.date_from.to_string().as_bytes());
    hasher.update(period.date_to.to_string().as_bytes());
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
