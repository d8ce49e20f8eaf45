//! # QR Payload
//!
//! The canonical summary of a transaction that gets encoded into the
//! receipt's QR code.
//!
//! ## Wire Format (version 1)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  {"v":1,                                                                │
//! │   "kind":"sale",                                                        │
//! │   "identifier":"TEST-001",                                              │
//! │   "generated_at":"2026-01-05T10:30:00Z",                                │
//! │   "items":[{"name":"Product 1","quantity":"2",                          │
//! │             "unit_price":"10.00","line_total":"20.00"}],                │
//! │   "subtotal":"35.00","tax":"0.00","discount":"0.00","total":"35.00",   │
//! │   "amount_tendered":"40.00","change":"5.00","payment_method":"cash"}   │
//! │                                                                         │
//! │  purchases end with  ..."total":"35.00","supplier":"Acme Wholesale"}   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field order is the struct declaration order; every number is a
//! preformatted string. Identical records therefore produce identical bytes
//! in any language that follows this layout.

use chrono::SecondsFormat;
use serde::Serialize;
use till_core::{Settlement, TransactionKind, TransactionRecord};

use crate::error::EncodingError;

/// Current payload layout version.
pub const PAYLOAD_VERSION: u8 = 1;

// =============================================================================
// Payload Types
// =============================================================================

/// One item row in the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayloadItem {
    pub name: String,
    pub quantity: String,
    pub unit_price: String,
    pub line_total: String,
}

/// Versioned QR payload.
///
/// Sale-only fields and the purchase-only field are skipped when absent, so
/// each kind has exactly one layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptPayload {
    pub v: u8,
    pub kind: TransactionKind,
    pub identifier: String,
    pub generated_at: String,
    pub items: Vec<PayloadItem>,
    pub subtotal: String,
    pub tax: String,
    pub discount: String,
    pub total: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_tendered: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
}

impl ReceiptPayload {
    /// Builds the payload from a record. Pure; no validation.
    pub fn from_record(record: &TransactionRecord) -> Self {
        let items = record
            .items
            .iter()
            .map(|item| PayloadItem {
                name: item.name.clone(),
                quantity: item.quantity_label(),
                unit_price: item.unit_price().to_decimal_string(),
                line_total: item.line_total().to_decimal_string(),
            })
            .collect();

        let mut payload = ReceiptPayload {
            v: PAYLOAD_VERSION,
            kind: record.kind(),
            identifier: record.identifier.clone(),
            generated_at: record
                .timestamp
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            items,
            subtotal: record.subtotal().to_decimal_string(),
            tax: record.tax().to_decimal_string(),
            discount: record.discount().to_decimal_string(),
            total: record.total().to_decimal_string(),
            amount_tendered: None,
            change: None,
            payment_method: None,
            supplier: None,
        };

        match &record.settlement {
            Settlement::Sale { payment_method, .. } => {
                if let Some((tendered, change)) = record.tendered_and_change() {
                    payload.amount_tendered = Some(tendered.to_decimal_string());
                    payload.change = Some(change.to_decimal_string());
                }
                payload.payment_method = Some(payment_method.as_str());
            }
            Settlement::Purchase { supplier } => {
                payload.supplier = Some(supplier.name.clone());
            }
        }

        payload
    }

    /// Serializes to the exact bytes fed to the encoder.
    pub fn encode(&self) -> Result<EncodedPayload, EncodingError> {
        serde_json::to_string(self)
            .map(EncodedPayload)
            .map_err(|e| EncodingError::Serialization(e.to_string()))
    }
}

/// Builds and serializes the payload for a record in one step.
pub fn build_payload(record: &TransactionRecord) -> Result<EncodedPayload, EncodingError> {
    ReceiptPayload::from_record(record).encode()
}

// =============================================================================
// Encoded Payload
// =============================================================================

/// Serialized payload text, exactly as encoded into the QR symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodedPayload(String);

impl EncodedPayload {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
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

impl std::fmt::Display for EncodedPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
