//! # till-receipt: Printable Receipts with Embedded QR Codes
//!
//! Turns a validated [`TransactionRecord`](till_core::TransactionRecord)
//! into a self-contained HTML receipt carrying a QR code that summarizes
//! the transaction.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        till-receipt Layers                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  printer      ReceiptPrinter::render / render_async             │   │
//! │  └───────┬─────────────────────────────────────────┬───────────────┘   │
//! │          │                                         │                    │
//! │  ┌───────▼───────────────────┐       ┌─────────────▼───────────────┐   │
//! │  │  qr                       │       │  document                   │   │
//! │  │  QrGenerator              │──────►│  ReceiptBuilder             │   │
//! │  │  encode / validate        │ Code  │  build_receipt              │   │
//! │  │  generate → CodeOutcome   │Outcome│  HTML + inline CSS          │   │
//! │  └───────┬───────────────────┘       └─────────────────────────────┘   │
//! │          │                                                              │
//! │  ┌───────▼───────────────────┐       ┌─────────────────────────────┐   │
//! │  │  payload                  │       │  config                     │   │
//! │  │  ReceiptPayload (v1)      │       │  receipt.toml + TILL_* env  │   │
//! │  └───────────────────────────┘       └─────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use till_receipt::{ReceiptConfig, ReceiptPrinter};
//! use till_core::TransactionRecord;
//!
//! let record = TransactionRecord::from_json(r#"{
//!     "identifier": "TEST-001",
//!     "items": [{"name": "Product 1", "quantity": 2,
//!                "unit_price_cents": 1000, "line_total_cents": 2000}],
//!     "subtotal_cents": 2000,
//!     "total_cents": 2000,
//!     "settlement": {"kind": "sale", "amount_tendered_cents": 2000, "change_cents": 0}
//! }"#).unwrap();
//!
//! let printer = ReceiptPrinter::new(ReceiptConfig::default());
//! let html = printer.render(&record).unwrap();
//! assert!(html.as_str().contains("Scan for Details"));
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod payload;
pub mod printer;
pub mod qr;

pub use config::{ErrorCorrection, QrOptions, RasterFormat, ReceiptConfig};
pub use document::{ReceiptBuilder, ReceiptDocument};
pub use error::{EncodingError, ReceiptError, ReceiptResult};
pub use payload::{build_payload, EncodedPayload, ReceiptPayload};
pub use printer::ReceiptPrinter;
pub use qr::{CodeOutcome, EncodedImage, QrGenerator};
