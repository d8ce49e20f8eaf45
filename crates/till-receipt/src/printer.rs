//! # Receipt Printer
//!
//! End-to-end flow: validate the record, generate the code, build the
//! document.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  render(&record)                                                        │
//! │       │                                                                 │
//! │       ├── validate_record()  ── Err ──► ReceiptError::Core (only       │
//! │       │                                   hard failure)                 │
//! │       ▼                                                                 │
//! │  QrGenerator::generate()    → CodeOutcome (never fails)                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ReceiptBuilder::build_receipt() → ReceiptDocument                     │
//! │                                                                         │
//! │  render_async(record): same, with generate() on the blocking pool.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The printer holds only immutable configuration. Clone it freely and
//! render any number of receipts concurrently.

use till_core::validation::validate_record;
use till_core::TransactionRecord;
use tracing::{debug, info, warn};

use crate::config::ReceiptConfig;
use crate::document::{ReceiptBuilder, ReceiptDocument};
use crate::error::ReceiptResult;
use crate::qr::{CodeOutcome, QrGenerator};

/// Renders complete receipts.
#[derive(Debug, Clone, Default)]
pub struct ReceiptPrinter {
    generator: QrGenerator,
    builder: ReceiptBuilder,
}

impl ReceiptPrinter {
    pub fn new(config: ReceiptConfig) -> Self {
        ReceiptPrinter {
            generator: QrGenerator::new(config.qr.clone()),
            builder: ReceiptBuilder::new(config),
        }
    }

    pub fn generator(&self) -> &QrGenerator {
        &self.generator
    }

    pub fn builder(&self) -> &ReceiptBuilder {
        &self.builder
    }

    /// Renders a receipt synchronously.
    ///
    /// ## Errors
    /// Only a malformed record fails; it is rejected before encoding.
    pub fn render(&self, record: &TransactionRecord) -> ReceiptResult<ReceiptDocument> {
        validate_record(record)?;

        let code = self.generator.generate(record);
        Ok(self.finish(record, &code))
    }

    /// Renders a receipt with QR encoding on tokio's blocking pool.
    ///
    /// A panicked or cancelled encoding task yields the fallback branch.
    pub async fn render_async(&self, record: TransactionRecord) -> ReceiptResult<ReceiptDocument> {
        validate_record(&record)?;

        let generator = self.generator.clone();
        let task_record = record.clone();
        let code = tokio::task::spawn_blocking(move || generator.generate(&task_record))
            .await
            .unwrap_or_else(|e| {
                warn!(identifier = %record.identifier, error = %e, "QR encoding task failed");
                CodeOutcome::Failed {
                    reason: e.to_string(),
                }
            });

        Ok(self.finish(&record, &code))
    }

    fn finish(&self, record: &TransactionRecord, code: &CodeOutcome) -> ReceiptDocument {
        let document = self.builder.build_receipt(record, code);

        match code {
            CodeOutcome::Embedded(_) => {
                debug!(identifier = %record.identifier, bytes = document.len(), "Receipt rendered")
            }
            _ => info!(
                identifier = %record.identifier,
                bytes = document.len(),
                "Receipt rendered without QR code"
            ),
        }

        document
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{FALLBACK_TEXT, SCAN_LABEL_ELEMENT};
    use crate::error::ReceiptError;
    use till_core::{CoreError, LineItem, PaymentMethod, Settlement};

    fn record(identifier: &str) -> TransactionRecord {
        TransactionRecord {
            identifier: identifier.to_string(),
            timestamp: chrono::Utc::now(),
            items: vec![LineItem {
                name: "Product 1".to_string(),
                quantity: 1.0,
                unit_price_cents: 1500,
                line_total_cents: 1500,
            }],
            subtotal_cents: 1500,
            tax_cents: 0,
            discount_cents: 0,
            total_cents: 1500,
            settlement: Settlement::Sale {
                amount_tendered_cents: 2000,
                change_cents: 500,
                payment_method: PaymentMethod::Cash,
                customer: None,
            },
        }
    }

    #[test]
    fn test_render_embeds_code() {
        let html = ReceiptPrinter::default()
            .render(&record("TEST-001"))
            .unwrap()
            .into_string();
        assert!(html.contains("src=\"data:image/png;base64,"));
        assert!(!html.contains(FALLBACK_TEXT));
    }

    #[test]
    fn test_missing_identifier_fails_before_encoding() {
        let err = ReceiptPrinter::default().render(&record("  ")).unwrap_err();
        assert!(matches!(err, ReceiptError::Core(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_render_async_matches_sync() {
        let printer = ReceiptPrinter::default();
        let r = record("TEST-002");
        let sync = printer.render(&r).unwrap();
        let async_doc = printer.render_async(r).await.unwrap();
        assert_eq!(sync, async_doc);
    }

    #[tokio::test]
    async fn test_concurrent_renders() {
        let printer = ReceiptPrinter::default();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let printer = printer.clone();
                tokio::spawn(async move { printer.render_async(record(&format!("R-{i}"))).await })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let html = handle.await.unwrap().unwrap().into_string();
            assert_eq!(html.matches(SCAN_LABEL_ELEMENT).count(), 1);
            assert!(html.contains(&format!("Receipt #: R-{i}</div>")));
        }
    }
}
