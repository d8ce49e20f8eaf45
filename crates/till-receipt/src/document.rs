//! # Receipt Document Builder
//!
//! Assembles the printable HTML for one transaction.
//!
//! ## Document Layout
//! ```text
//! ┌──────────────────────────────┐
//! │        POS BUSINESS          │  header lines / business identity
//! │ 123 Business St, City        │
//! │ Tel: (123) 456-7890          │
//! ├──────────────────────────────┤
//! │ Receipt #:        TEST-001   │  transaction details
//! │ Date:           2026-01-05   │  (+ customer or supplier block)
//! │ Time:             10:30:00   │
//! ├──────────────────────────────┤
//! │ Product 1                    │  item table
//! │   2 × 10.00          20.00   │
//! ├──────────────────────────────┤
//! │ Subtotal:            35.00   │  totals
//! │ Total:               35.00   │
//! ├──────────────────────────────┤
//! │ Payment Method:       Cash   │  payment (sales only)
//! │ Amount Received:     40.00   │
//! │ Change:               5.00   │
//! ├──────────────────────────────┤
//! │      Scan for Details        │  code section (always)
//! │        ▓▓▓▓▓▓▓▓▓▓            │  image or fallback text
//! │      Receipt #: TEST-001     │  closing line (always)
//! ├──────────────────────────────┤
//! │         Thank You!           │  footer (always)
//! └──────────────────────────────┘
//! ```
//!
//! Building never fails. A missing, rejected or failed code renders the
//! fallback text instead of an image.
//!
//! ## Display-Time Hooks
//! The embedded `<img>` starts with `data-qr-status="pending"`. Its `onload`
//! hook sets `loaded`; its `onerror` hook hides the image, sets `failed` and
//! reveals the sibling `.qr-error` element. These run in the viewer, after
//! the document has been returned.

use chrono::{DateTime, FixedOffset};
use std::fmt::Write as _;
use till_core::{Money, Settlement, TransactionKind, TransactionRecord};

use crate::config::{LayoutSettings, ReceiptConfig};
use crate::qr::CodeOutcome;

/// Label above the code.
///
/// The label element ([`SCAN_LABEL_ELEMENT`]) is printed exactly once per
/// document. The bare text can still appear elsewhere when a caller puts it
/// in an item name or header line.
pub const SCAN_LABEL: &str = "Scan for Details";

/// Markup of the label element, as emitted above the code.
pub const SCAN_LABEL_ELEMENT: &str = "<div class=\"qr-label\">Scan for Details</div>";

/// Fallback text when no image is embedded.
pub const FALLBACK_TEXT: &str = "QR Code not available";

/// Text revealed by the `onerror` hook.
pub const LOAD_FAILED_TEXT: &str = "QR Code failed to load";

/// Maximum characters of an encoder error shown on the receipt.
const REASON_PREVIEW_CHARS: usize = 50;

// =============================================================================
// Receipt Document
// =============================================================================

/// Complete, self-contained HTML document. Owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptDocument(String);

impl ReceiptDocument {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for ReceiptDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn esc(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn money(value: Money) -> String {
    value.to_decimal_string()
}

fn line(label: &str, value: &str) -> String {
    format!(
        "<div class=\"line\"><span>{}</span><span>{}</span></div>",
        esc(label),
        esc(value)
    )
}

/// Formats with a user pattern, falling back when the pattern is rejected.
fn format_datetime(ts: &DateTime<FixedOffset>, pattern: &str, fallback: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", ts.format(pattern)).is_err() {
        out.clear();
        let _ = write!(out, "{}", ts.format(fallback));
    }
    out
}

fn reason_preview(reason: &str) -> String {
    let preview: String = reason.chars().take(REASON_PREVIEW_CHARS).collect();
    format!("QR Code generation failed: {}...", preview)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn html_shell(title: &str, layout: &LayoutSettings, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8"/>
<title>{title}</title>
<style>
body {{ font-family: 'Courier New', monospace; font-size: {font}; width: {paper}; margin: 0 auto; padding: 10px; color: #000; background: #fff; }}
.center {{ text-align: center; }}
.business-name {{ font-size: 16px; font-weight: bold; margin: 0 0 4px 0; }}
.section {{ margin-top: 8px; border-top: 1px dashed #000; padding-top: 6px; }}
.line {{ display: flex; justify-content: space-between; gap: 8px; }}
.line.total {{ font-weight: bold; }}
table.items {{ width: 100%; border-collapse: collapse; }}
table.items th {{ text-align: left; border-bottom: 1px solid #000; }}
table.items td.amount, table.items th.amount {{ text-align: right; }}
.qr-section {{ margin-top: 10px; text-align: center; }}
.qr-label {{ font-weight: bold; margin-bottom: 4px; }}
.qr-error, .qr-fallback {{ font-size: 10px; color: #666; }}
.qr-error {{ display: none; }}
.note {{ font-size: 9px; color: #666; }}
@media print {{ body {{ width: auto; }} }}
</style>
</head>
<body>
{body}</body>
</html>
"#,
        title = esc(title),
        font = esc(&layout.font_size),
        paper = esc(&layout.paper_width),
        body = body,
    )
}

// =============================================================================
// Builder
// =============================================================================

/// Renders [`ReceiptDocument`]s from records and code outcomes.
#[derive(Debug, Clone, Default)]
pub struct ReceiptBuilder {
    config: ReceiptConfig,
}

impl ReceiptBuilder {
    pub fn new(config: ReceiptConfig) -> Self {
        ReceiptBuilder { config }
    }

    pub fn config(&self) -> &ReceiptConfig {
        &self.config
    }

    /// Builds the receipt. Never fails.
    ///
    /// An `Embedded` image is re-checked against the validity threshold;
    /// a sub-threshold image is never embedded.
    pub fn build_receipt(
        &self,
        record: &TransactionRecord,
        code: &CodeOutcome,
    ) -> ReceiptDocument {
        let layout = &self.config.layout;
        let kind = record.kind();

        let mut body = String::new();
        self.push_header(&mut body);
        if layout.show_transaction_details {
            self.push_details(&mut body, record);
        }
        if layout.show_item_details {
            Self::push_items(&mut body, record);
        }
        if layout.show_totals {
            self.push_totals(&mut body, record);
        }
        if layout.show_payment_info {
            Self::push_payment(&mut body, record);
        }
        self.push_code_section(&mut body, record, code);
        self.push_footer(&mut body);

        let title = format!("{} {}", kind.document_label(), record.identifier);
        ReceiptDocument(html_shell(&title, layout, &body))
    }

    fn push_header(&self, body: &mut String) {
        let layout = &self.config.layout;
        let business = &self.config.business;

        if !layout.header_lines.is_empty() {
            body.push_str("<div class=\"center header\">");
            for header in &layout.header_lines {
                body.push_str(&format!("<div>{}</div>", esc(header)));
            }
            body.push_str("</div>\n");
            return;
        }

        if !layout.show_business_info {
            return;
        }

        body.push_str(&format!(
            "<div class=\"center header\"><h2 class=\"business-name\">{}</h2>",
            esc(&business.name)
        ));
        for address in &business.address_lines {
            body.push_str(&format!("<div>{}</div>", esc(address)));
        }
        if let Some(phone) = non_empty(&business.phone) {
            body.push_str(&format!("<div>Tel: {}</div>", esc(phone)));
        }
        body.push_str("</div>\n");
    }

    fn push_details(&self, body: &mut String, record: &TransactionRecord) {
        let layout = &self.config.layout;
        let local = record.timestamp.with_timezone(&layout.offset());

        let number_label = match record.kind() {
            TransactionKind::Sale => "Receipt #:",
            TransactionKind::Purchase => "Purchase Order #:",
        };

        body.push_str("<div class=\"section details\">");
        body.push_str(&line(number_label, &record.identifier));
        body.push_str(&line(
            "Date:",
            &format_datetime(&local, &layout.date_format, "%Y-%m-%d"),
        ));
        body.push_str(&line(
            "Time:",
            &format_datetime(&local, &layout.time_format, "%H:%M:%S"),
        ));

        match &record.settlement {
            Settlement::Sale {
                customer: Some(customer),
                ..
            } => {
                body.push_str("<div class=\"customer\">");
                body.push_str(&line("Customer:", &customer.name));
                if let Some(address) = non_empty(&customer.address) {
                    body.push_str(&line("Address:", address));
                }
                if let Some(email) = non_empty(&customer.email) {
                    body.push_str(&line("Email:", email));
                }
                if let Some(phone) = non_empty(&customer.phone) {
                    body.push_str(&line("Phone:", phone));
                }
                if let Some(points) = customer.loyalty_points {
                    body.push_str(&line("Loyalty Points:", &points.to_string()));
                }
                body.push_str("</div>");
            }
            Settlement::Sale { customer: None, .. } => {}
            Settlement::Purchase { supplier } => {
                body.push_str("<div class=\"supplier\">");
                body.push_str(&line("Supplier:", &supplier.name));
                if let Some(contact) = non_empty(&supplier.contact_person) {
                    body.push_str(&line("Contact:", contact));
                }
                body.push_str("</div>");
            }
        }

        body.push_str("</div>\n");
    }

    fn push_items(body: &mut String, record: &TransactionRecord) {
        body.push_str(
            "<div class=\"section\"><table class=\"items\"><thead><tr>\
             <th>Item</th><th>Qty × Price</th><th class=\"amount\">Total</th>\
             </tr></thead><tbody>",
        );
        for item in &record.items {
            body.push_str(&format!(
                "<tr class=\"item-row\"><td>{}</td><td>{} × {}</td><td class=\"amount\">{}</td></tr>",
                esc(&item.name),
                item.quantity_label(),
                money(item.unit_price()),
                money(item.line_total())
            ));
        }
        body.push_str("</tbody></table></div>\n");
    }

    fn push_totals(&self, body: &mut String, record: &TransactionRecord) {
        let hide_zero = self.config.layout.hide_zero_adjustments;

        body.push_str("<div class=\"section totals\">");
        body.push_str(&line("Subtotal:", &money(record.subtotal())));
        if !(hide_zero && record.tax().is_zero()) {
            body.push_str(&line("Tax:", &money(record.tax())));
        }
        if !(hide_zero && record.discount().is_zero()) {
            body.push_str(&line("Discount:", &money(record.discount())));
        }
        body.push_str(&format!(
            "<div class=\"line total\"><span>Total:</span><span>{}</span></div>",
            money(record.total())
        ));
        body.push_str("</div>\n");
    }

    fn push_payment(body: &mut String, record: &TransactionRecord) {
        let Settlement::Sale { payment_method, .. } = &record.settlement else {
            return;
        };
        let Some((tendered, change)) = record.tendered_and_change() else {
            return;
        };

        body.push_str("<div class=\"section payment\">");
        body.push_str(&line("Payment Method:", payment_method.label()));
        body.push_str(&line("Amount Received:", &money(tendered)));
        body.push_str(&line("Change:", &money(change)));
        body.push_str("</div>\n");
    }

    fn push_code_section(
        &self,
        body: &mut String,
        record: &TransactionRecord,
        code: &CodeOutcome,
    ) {
        let qr = &self.config.qr;

        body.push_str("<div class=\"qr-section\">");
        body.push_str(SCAN_LABEL_ELEMENT);

        match code.image().filter(|image| image.passes(qr.validity_threshold)) {
            Some(image) => {
                body.push_str(&format!(
                    "<img class=\"qr-code\" src=\"{src}\" alt=\"QR Code\" width=\"{size}\" height=\"{size}\" \
                     data-qr-status=\"pending\" \
                     onload=\"this.setAttribute('data-qr-status','loaded');\" \
                     onerror=\"this.style.display='none';this.setAttribute('data-qr-status','failed');\
                     this.nextElementSibling.style.display='block';\"/>",
                    src = esc(image.as_str()),
                    size = qr.display_size,
                ));
                body.push_str(&format!("<div class=\"qr-error\">{}</div>", LOAD_FAILED_TEXT));
            }
            None => {
                body.push_str(&format!("<div class=\"qr-fallback\">{}</div>", FALLBACK_TEXT));
                if let Some(reason) = code.failure_reason() {
                    body.push_str(&format!(
                        "<div class=\"note\">{}</div>",
                        esc(&reason_preview(reason))
                    ));
                }
            }
        }

        body.push_str(&format!(
            "<div style=\"font-size: 8px; margin-top: 5px;\">{} #: {}</div>",
            record.kind().document_label(),
            esc(&record.identifier)
        ));
        body.push_str("</div>\n");
    }

    fn push_footer(&self, body: &mut String) {
        body.push_str("<div class=\"section center footer\">");
        for footer in &self.config.layout.footer_lines {
            body.push_str(&format!("<div>{}</div>", esc(footer)));
        }
        if let Some(tagline) = non_empty(&self.config.business.tagline) {
            body.push_str(&format!("<div class=\"note\">{}</div>", esc(tagline)));
        }
        body.push_str("</div>\n");
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
