//! # Domain Types
//!
//! The transaction record a receipt is printed from.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐   ┌─────────────────┐                          │
//! │  │  TransactionRecord  │   │    LineItem     │                          │
//! │  │  ─────────────────  │   │  ─────────────  │                          │
//! │  │  identifier         │──►│  name           │                          │
//! │  │  timestamp          │   │  quantity       │                          │
//! │  │  items              │   │  unit_price     │                          │
//! │  │  subtotal/tax/      │   │  line_total     │                          │
//! │  │  discount/total     │   └─────────────────┘                          │
//! │  │  settlement ────────┼──┐                                             │
//! │  └─────────────────────┘  │                                             │
//! │                           ▼                                             │
//! │        ┌──────────────────────────┬──────────────────────────┐         │
//! │        │ Settlement::Sale         │ Settlement::Purchase     │         │
//! │        │  amount_tendered, change │  supplier                │         │
//! │        │  payment_method          │   (name, contact)        │         │
//! │        │  customer (optional)     │                          │         │
//! │        └──────────────────────────┴──────────────────────────┘         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Trust Boundary
//! Totals arrive precomputed by the caller. Nothing here re-derives
//! `line_total` from quantity × price or `total` from subtotal + tax −
//! discount; the receipt shows exactly what the caller recorded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

// =============================================================================
// Transaction Kind
// =============================================================================

/// Whether the receipt documents money coming in (sale) or going out
/// (purchase from a supplier).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Sale,
    Purchase,
}

impl TransactionKind {
    /// Label used in front of the identifier on the closing line
    /// ("Receipt #:" / "Order #:").
    pub const fn document_label(&self) -> &'static str {
        match self {
            TransactionKind::Sale => "Receipt",
            TransactionKind::Purchase => "Order",
        }
    }

    /// Stable lowercase name used in QR payloads.
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Sale => "sale",
            TransactionKind::Purchase => "purchase",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer paid for a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    #[default]
    Cash,
    /// Card payment on an external terminal.
    Card,
    /// Mobile money transfer.
    MobileMoney,
    /// Bank transfer.
    BankTransfer,
    /// Sold on credit (recorded as customer debt).
    Credit,
}

impl PaymentMethod {
    /// Human-readable label printed on the receipt.
    pub const fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Card => "Card",
            PaymentMethod::MobileMoney => "Mobile Money",
            PaymentMethod::BankTransfer => "Bank Transfer",
            PaymentMethod::Credit => "Credit",
        }
    }

    /// Stable snake_case name used in QR payloads.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::MobileMoney => "mobile_money",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::Credit => "credit",
        }
    }
}

// =============================================================================
// Counterparties
// =============================================================================

/// Customer details printed on a sales receipt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerInfo {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Loyalty balance after this sale, if the customer is enrolled.
    #[serde(default)]
    pub loyalty_points: Option<i64>,
}

/// Supplier a purchase order was placed with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SupplierInfo {
    pub name: String,
    #[serde(default)]
    pub contact_person: Option<String>,
}

// =============================================================================
// Settlement
// =============================================================================

/// Kind-specific part of a transaction.
///
/// Sales carry tendered/change; purchases name the supplier instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Settlement {
    Sale {
        /// Amount the customer handed over.
        amount_tendered_cents: i64,
        /// Change returned to the customer.
        change_cents: i64,
        #[serde(default)]
        payment_method: PaymentMethod,
        #[serde(default)]
        customer: Option<CustomerInfo>,
    },
    Purchase {
        supplier: SupplierInfo,
    },
}

impl Settlement {
    /// Returns the transaction kind for this settlement.
    pub const fn kind(&self) -> TransactionKind {
        match self {
            Settlement::Sale { .. } => TransactionKind::Sale,
            Settlement::Purchase { .. } => TransactionKind::Purchase,
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One row of the item table.
///
/// `line_total_cents` is passed explicitly and never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    pub name: String,
    /// Fractional quantities are allowed for weighed goods.
    pub quantity: f64,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
}

impl LineItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }

    /// Quantity as printed: up to three decimals, trailing zeros trimmed.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::LineItem;
    ///
    /// let mut item = LineItem {
    ///     name: "Rice".into(),
    ///     quantity: 2.0,
    ///     unit_price_cents: 1000,
    ///     line_total_cents: 2000,
    /// };
    /// assert_eq!(item.quantity_label(), "2");
    /// item.quantity = 1.5;
    /// assert_eq!(item.quantity_label(), "1.5");
    /// item.quantity = 0.125;
    /// assert_eq!(item.quantity_label(), "0.125");
    /// ```
    pub fn quantity_label(&self) -> String {
        let fixed = format!("{:.3}", self.quantity);
        let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
        match trimmed {
            "-0" => "0".to_string(),
            _ => trimmed.to_string(),
        }
    }
}

// =============================================================================
// Transaction Record
// =============================================================================

/// A completed sale or purchase, as handed over by the dashboard.
///
/// ## JSON Shape
/// ```json
/// {
///   "identifier": "TEST-001",
///   "items": [{ "name": "Product 1", "quantity": 2,
///               "unit_price_cents": 1000, "line_total_cents": 2000 }],
///   "subtotal_cents": 2000, "tax_cents": 0, "discount_cents": 0,
///   "total_cents": 2000,
///   "settlement": { "kind": "sale", "amount_tendered_cents": 2000,
///                   "change_cents": 0 }
/// }
/// ```
/// `timestamp` may be omitted; it then defaults to the moment of parsing,
/// which is the receipt's generation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TransactionRecord {
    /// Receipt number (sales) or order number (purchases).
    pub identifier: String,

    /// Generation time printed on the receipt.
    #[serde(default = "Utc::now")]
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,

    #[serde(default)]
    pub items: Vec<LineItem>,

    pub subtotal_cents: i64,
    #[serde(default)]
    pub tax_cents: i64,
    #[serde(default)]
    pub discount_cents: i64,
    pub total_cents: i64,

    pub settlement: Settlement,
}

impl TransactionRecord {
    /// Parses a record from the dashboard's JSON.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        serde_json::from_str(json).map_err(|e| CoreError::InvalidRecord(e.to_string()))
    }

    /// Returns whether this is a sale or a purchase.
    #[inline]
    pub fn kind(&self) -> TransactionKind {
        self.settlement.kind()
    }

    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    #[inline]
    pub fn tax(&self) -> Money {
        Money::from_cents(self.tax_cents)
    }

    #[inline]
    pub fn discount(&self) -> Money {
        Money::from_cents(self.discount_cents)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Tendered amount and change, for sales only.
    pub fn tendered_and_change(&self) -> Option<(Money, Money)> {
        match &self.settlement {
            Settlement::Sale {
                amount_tendered_cents,
                change_cents,
                ..
            } => Some((
                Money::from_cents(*amount_tendered_cents),
                Money::from_cents(*change_cents),
            )),
            Settlement::Purchase { .. } => None,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
