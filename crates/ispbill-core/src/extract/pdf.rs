//! PDF statement extraction using lopdf and pdf-extract.
//!
//! Mobily-style statements list each service's line number on its own line
//! with the charges on the line below it. Layout-based text extraction is
//! unreliable enough that matching is an exact trimmed-line scan, never a
//! regex over the whole document.

use lopdf::Document;
use tracing::{debug, warn};

use crate::error::PdfError;
use crate::models::config::PdfConfig;
use crate::models::service::Service;

use super::{Candidate, ExtractionOutcome, ExtractionWarning, MatchKey};

/// Extractor for paginated PDF statements.
pub struct PdfExtractor<'a> {
    config: &'a PdfConfig,
}

impl<'a> PdfExtractor<'a> {
    pub fn new(config: &'a PdfConfig) -> Self {
        Self { config }
    }

    /// Extract (line number, raw amount) candidates for the given services.
    ///
    /// Services without a line number are skipped silently; services whose
    /// line number never appears become `ServiceNotMatched` warnings.
    pub fn extract(
        &self,
        data: &[u8],
        services: &[Service],
    ) -> Result<ExtractionOutcome, PdfError> {
        let doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            debug!("PDF has no pages, nothing to extract");
            return Ok(ExtractionOutcome::default());
        }
        if page_count > self.config.max_pages {
            return Err(PdfError::TooManyPages {
                found: page_count,
                limit: self.config.max_pages,
            });
        }

        let text = pdf_extract::extract_text_from_mem(data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;
        let lines: Vec<&str> = text.lines().collect();

        debug!(pages = page_count, lines = lines.len(), "extracted PDF text");
        Ok(scan_lines(&lines, services, self.config.amount_token_index))
    }
}

/// Scan an ordered line sequence for each service's line number.
///
/// First exact-trim match wins; at most one candidate per service. The raw
/// amount is the token at `amount_token_index` of the immediately
/// following line.
pub fn scan_lines(
    lines: &[&str],
    services: &[Service],
    amount_token_index: usize,
) -> ExtractionOutcome {
    let mut outcome = ExtractionOutcome::default();

    for service in services {
        let Some(line_number) = service.line_number.as_deref() else {
            continue;
        };

        let Some(pos) = lines.iter().position(|l| l.trim() == line_number) else {
            outcome.warnings.push(ExtractionWarning::ServiceNotMatched {
                line_number: line_number.to_string(),
            });
            continue;
        };

        let tokens: Vec<&str> = lines
            .get(pos + 1)
            .map(|l| l.split_whitespace().collect())
            .unwrap_or_default();

        match tokens.get(amount_token_index) {
            Some(raw) => outcome.candidates.push(Candidate {
                key: MatchKey::LineNumber(line_number.to_string()),
                raw_amount: (*raw).to_string(),
            }),
            None => {
                warn!(line_number, "amount field missing after matched line");
                outcome.warnings.push(ExtractionWarning::AmountFieldMissing {
                    line_number: line_number.to_string(),
                });
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::PdfConfig;
    use crate::models::{ProviderId, ServiceId};
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};
    use pretty_assertions::assert_eq;

    fn service(id: u32, line_number: &str) -> Service {
        Service::new(ServiceId(id), ProviderId(1), "Service - Mobily")
            .with_line_number(line_number)
    }

    /// Build a PDF with one text line per `Tj`, one page per slice.
    fn build_pdf(pages: &[&[&str]]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for page_lines in pages {
            let mut operations = vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![50.into(), 750.into()]),
            ];
            for (i, line) in page_lines.iter().enumerate() {
                if i > 0 {
                    operations.push(Operation::new("Td", vec![0.into(), (-16).into()]));
                }
                operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
            }
            operations.push(Operation::new("ET", vec![]));

            let content = Content { operations };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_extract_from_document_bytes() {
        let config = PdfConfig::default();
        let data = build_pdf(&[&["Statement of account", "1234567", "0.00 138.00 9.99"]]);

        let outcome = PdfExtractor::new(&config)
            .extract(&data, &[service(1, "1234567")])
            .unwrap();

        assert_eq!(
            outcome.candidates,
            vec![Candidate {
                key: MatchKey::LineNumber("1234567".to_string()),
                raw_amount: "138.00".to_string(),
            }]
        );
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_zero_pages_yields_zero_candidates() {
        let config = PdfConfig::default();
        let data = build_pdf(&[]);

        let outcome = PdfExtractor::new(&config)
            .extract(&data, &[service(1, "1234567")])
            .unwrap();

        assert!(outcome.candidates.is_empty());
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_page_budget_enforced() {
        let config = PdfConfig {
            max_pages: 1,
            ..PdfConfig::default()
        };
        let data = build_pdf(&[&["page one"], &["page two"]]);

        let err = PdfExtractor::new(&config)
            .extract(&data, &[service(1, "1234567")])
            .unwrap_err();
        assert!(matches!(err, PdfError::TooManyPages { found: 2, limit: 1 }));
    }

    #[test]
    fn test_garbage_payload_is_a_parse_error() {
        let config = PdfConfig::default();
        let err = PdfExtractor::new(&config)
            .extract(b"definitely not a pdf", &[])
            .unwrap_err();
        assert!(matches!(err, PdfError::Parse(_)));
    }

    #[test]
    fn test_matches_second_token_of_following_line() {
        let lines = vec!["Statement of account", "1234567", "0.00 138.00 9.99"];
        let outcome = scan_lines(&lines, &[service(1, "1234567")], 1);

        assert_eq!(
            outcome.candidates,
            vec![Candidate {
                key: MatchKey::LineNumber("1234567".to_string()),
                raw_amount: "138.00".to_string(),
            }]
        );
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_trimmed_exact_match_only() {
        // Substring noise must not match; padded exact content must.
        let lines = vec!["x1234567y", "  1234567  ", "0.00 42.00"];
        let outcome = scan_lines(&lines, &[service(1, "1234567")], 1);

        assert_eq!(outcome.candidates.len(), 1);
        assert_eq!(outcome.candidates[0].raw_amount, "42.00");
    }

    #[test]
    fn test_first_occurrence_wins() {
        let lines = vec!["1234567", "0.00 10.00", "1234567", "0.00 20.00"];
        let outcome = scan_lines(&lines, &[service(1, "1234567")], 1);

        assert_eq!(outcome.candidates.len(), 1);
        assert_eq!(outcome.candidates[0].raw_amount, "10.00");
    }

    #[test]
    fn test_too_few_tokens_warns_and_skips() {
        let lines = vec!["1234567", "only-one-token"];
        let outcome = scan_lines(&lines, &[service(1, "1234567")], 1);

        assert!(outcome.candidates.is_empty());
        assert_eq!(
            outcome.warnings,
            vec![ExtractionWarning::AmountFieldMissing {
                line_number: "1234567".to_string()
            }]
        );
    }

    #[test]
    fn test_match_on_last_line_warns() {
        let lines = vec!["header", "1234567"];
        let outcome = scan_lines(&lines, &[service(1, "1234567")], 1);

        assert!(outcome.candidates.is_empty());
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn test_unmatched_service_recorded() {
        let lines = vec!["nothing", "relevant"];
        let outcome = scan_lines(&lines, &[service(1, "7654321")], 1);

        assert!(outcome.candidates.is_empty());
        assert_eq!(
            outcome.warnings,
            vec![ExtractionWarning::ServiceNotMatched {
                line_number: "7654321".to_string()
            }]
        );
    }

    #[test]
    fn test_service_without_line_number_skipped_silently() {
        let lines = vec!["1234567", "0.00 138.00"];
        let bare = Service::new(ServiceId(9), ProviderId(1), "Service - Mobily");
        let outcome = scan_lines(&lines, &[bare], 1);

        assert!(outcome.candidates.is_empty());
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_multiple_services_scanned_in_order() {
        let lines = vec!["1111111", "0.00 10.50", "2222222", "0.00 20.75"];
        let services = vec![service(2, "2222222"), service(1, "1111111")];
        let outcome = scan_lines(&lines, &services, 1);

        // Candidate order follows directory order, not document order.
        assert_eq!(outcome.candidates.len(), 2);
        assert_eq!(outcome.candidates[0].raw_amount, "20.75");
        assert_eq!(outcome.candidates[1].raw_amount, "10.50");
    }
}
