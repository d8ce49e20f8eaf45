use till_core::TransactionRecord;
use till_receipt::document::{FALLBACK_TEXT, LOAD_FAILED_TEXT, SCAN_LABEL, SCAN_LABEL_ELEMENT};
use till_receipt::{
    build_payload, CodeOutcome, EncodedImage, ErrorCorrection, QrOptions, ReceiptBuilder,
    ReceiptConfig, ReceiptError, ReceiptPrinter,
};

const SALE_JSON: &str = r#"{
    "identifier": "TEST-001",
    "timestamp": "2026-01-05T10:30:00Z",
    "items": [
        {"name": "Product 1", "quantity": 2, "unit_price_cents": 1000, "line_total_cents": 2000},
        {"name": "Product 2", "quantity": 1, "unit_price_cents": 1500, "line_total_cents": 1500}
    ],
    "subtotal_cents": 3500,
    "tax_cents": 0,
    "discount_cents": 0,
    "total_cents": 3500,
    "settlement": {"kind": "sale", "amount_tendered_cents": 4000, "change_cents": 500}
}"#;

const PURCHASE_JSON: &str = r#"{
    "identifier": "PO-2026-014",
    "timestamp": "2026-01-05T10:30:00Z",
    "items": [
        {"name": "Rice 25kg", "quantity": 4, "unit_price_cents": 3200, "line_total_cents": 12800}
    ],
    "subtotal_cents": 12800,
    "total_cents": 12800,
    "settlement": {"kind": "purchase", "supplier": {"name": "Acme Wholesale", "contact_person": "Jo"}}
}"#;

fn sale() -> TransactionRecord {
    TransactionRecord::from_json(SALE_JSON).unwrap()
}

fn purchase() -> TransactionRecord {
    TransactionRecord::from_json(PURCHASE_JSON).unwrap()
}

fn has_code_or_fallback(html: &str) -> bool {
    html.contains("src=\"data:image/png;base64,")
        || html.contains(FALLBACK_TEXT)
        || html.contains(LOAD_FAILED_TEXT)
}

#[test]
fn sale_round_trip_renders_items_totals_and_code() {
    let html = ReceiptPrinter::default().render(&sale()).unwrap().into_string();

    assert!(html.contains("Product 1"));
    assert!(html.contains("Product 2"));
    assert!(html.contains("<span>Total:</span><span>35.00</span>"));
    assert!(html.contains("<span>Amount Received:</span><span>40.00</span>"));
    assert!(html.contains("<span>Change:</span><span>5.00</span>"));
    assert!(has_code_or_fallback(&html));
    assert!(html.contains("Receipt #: TEST-001</div>"));
}

#[test]
fn scan_label_appears_exactly_once() {
    let printer = ReceiptPrinter::default();
    let mut empty = sale();
    empty.items.clear();

    for record in [sale(), purchase(), empty] {
        let html = printer.render(&record).unwrap().into_string();
        assert!(!html.is_empty());
        assert_eq!(html.matches(SCAN_LABEL_ELEMENT).count(), 1, "{}", record.identifier);
    }
}

#[test]
fn item_named_like_the_label_does_not_duplicate_it() {
    let mut record = sale();
    record.items[0].name = SCAN_LABEL.to_string();

    let html = ReceiptPrinter::default().render(&record).unwrap().into_string();
    assert!(html.contains(&format!("<td>{SCAN_LABEL}</td>")));
    assert_eq!(html.matches(SCAN_LABEL_ELEMENT).count(), 1);
}

#[test]
fn payload_is_byte_identical_for_identical_records() {
    let a = build_payload(&sale()).unwrap();
    let b = build_payload(&sale()).unwrap();
    assert_eq!(a.as_str(), b.as_str());
}

#[test]
fn payload_carries_the_transaction_facts() {
    let payload = build_payload(&sale()).unwrap();
    let value: serde_json::Value = serde_json::from_str(payload.as_str()).unwrap();

    assert_eq!(value["v"], 1);
    assert_eq!(value["kind"], "sale");
    assert_eq!(value["identifier"], "TEST-001");
    assert_eq!(value["items"][1]["name"], "Product 2");
    assert_eq!(value["items"][0]["line_total"], "20.00");
    assert_eq!(value["total"], "35.00");
    assert_eq!(value["change"], "5.00");
}

#[test]
fn identical_records_render_identical_documents() {
    let printer = ReceiptPrinter::default();
    assert_eq!(printer.render(&sale()).unwrap(), printer.render(&sale()).unwrap());
}

#[test]
fn sub_threshold_image_selects_fallback() {
    let builder = ReceiptBuilder::default();
    let tiny = CodeOutcome::Embedded(EncodedImage::new("data:image/png;base64,iVBOR"));
    let html = builder.build_receipt(&sale(), &tiny).into_string();

    assert!(!html.contains("<img"));
    assert!(html.contains(FALLBACK_TEXT));

    let mut config = ReceiptConfig::default();
    config.qr.validity_threshold = 1_000_000;
    let html = ReceiptPrinter::new(config).render(&sale()).unwrap().into_string();
    assert!(!html.contains("<img"));
    assert!(html.contains(FALLBACK_TEXT));
}

#[test]
fn encoding_failure_still_produces_document() {
    let mut record = sale();
    record.items = (0..120)
        .map(|i| till_core::LineItem {
            name: format!("Bulk item number {i} with an extended catalogue description"),
            quantity: 1.0,
            unit_price_cents: 100,
            line_total_cents: 100,
        })
        .collect();

    let config = ReceiptConfig {
        qr: QrOptions {
            error_correction: ErrorCorrection::H,
            ..QrOptions::default()
        },
        ..ReceiptConfig::default()
    };

    let html = ReceiptPrinter::new(config)
        .render(&record)
        .unwrap()
        .into_string();
    assert!(html.contains(FALLBACK_TEXT));
    assert!(html.contains("QR Code generation failed: Payload of "));
    assert_eq!(html.matches(SCAN_LABEL_ELEMENT).count(), 1);
    assert!(html.contains("Receipt #: TEST-001</div>"));
}

#[test]
fn total_always_has_two_decimals() {
    let mut record = sale();
    record.total_cents = 3500;
    let html = ReceiptPrinter::default().render(&record).unwrap().into_string();
    assert!(html.contains("<span>Total:</span><span>35.00</span>"));

    record.total_cents = 3505;
    let html = ReceiptPrinter::default().render(&record).unwrap().into_string();
    assert!(html.contains("<span>Total:</span><span>35.05</span>"));
}

#[test]
fn empty_items_render_totals_without_rows() {
    let mut record = sale();
    record.items.clear();
    let html = ReceiptPrinter::default().render(&record).unwrap().into_string();

    assert!(!html.contains("item-row"));
    assert!(html.contains("class=\"section totals\""));
    assert!(html.contains("<span>Total:</span><span>35.00</span>"));
}

#[test]
fn purchase_closing_line_uses_order_label() {
    let html = ReceiptPrinter::default()
        .render(&purchase())
        .unwrap()
        .into_string();

    assert!(html.contains("Order #: PO-2026-014</div>"));
    assert!(!html.contains("Receipt #:"));
    assert!(html.contains("<span>Supplier:</span><span>Acme Wholesale</span>"));
}

#[test]
fn malformed_record_is_rejected_before_encoding() {
    let mut record = sale();
    record.identifier.clear();
    let err = ReceiptPrinter::default().render(&record).unwrap_err();
    assert!(matches!(err, ReceiptError::Core(_)));
}

#[test]
fn caller_totals_are_printed_as_given() {
    let mut record = sale();
    record.total_cents = 9999;
    let html = ReceiptPrinter::default().render(&record).unwrap().into_string();
    assert!(html.contains("<span>Subtotal:</span><span>35.00</span>"));
    assert!(html.contains("<span>Total:</span><span>99.99</span>"));
}

#[tokio::test]
async fn async_render_degrades_like_sync() {
    let mut config = ReceiptConfig::default();
    config.qr.validity_threshold = usize::MAX;
    let printer = ReceiptPrinter::new(config);

    let html = printer.render_async(sale()).await.unwrap().into_string();
    assert!(html.contains(FALLBACK_TEXT));
    assert_eq!(html.matches(SCAN_LABEL_ELEMENT).count(), 1);
}
