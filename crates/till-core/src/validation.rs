//! # Validation Module
//!
//! Record validation run before a receipt is built.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Dashboard (TypeScript)                                       │
//! │  ├── Cart / purchase form checks                                       │
//! │  └── Business rules (stock, credit limits)                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Deserialization                                              │
//! │  └── Field types, settlement kind                                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: THIS MODULE                                                  │
//! │  ├── identifier present                                                │
//! │  ├── item names present, quantities positive                           │
//! │  └── no negative amounts                                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  QR encoding + document assembly (never fails)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Totals are deliberately not cross-checked: the caller owns the arithmetic.

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{Settlement, TransactionRecord};
use crate::{MAX_IDENTIFIER_LEN, MAX_RECEIPT_ITEMS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a transaction identifier (receipt / order number).
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most [`MAX_IDENTIFIER_LEN`] characters
///
/// ## Example
/// ```rust
/// use till_core::validation::validate_identifier;
///
/// assert!(validate_identifier("TEST-001").is_ok());
/// assert!(validate_identifier("   ").is_err());
/// ```
pub fn validate_identifier(identifier: &str) -> ValidationResult<()> {
    let identifier = identifier.trim();

    if identifier.is_empty() {
        return Err(ValidationError::Required {
            field: "identifier".to_string(),
        });
    }

    if identifier.chars().count() > MAX_IDENTIFIER_LEN {
        return Err(ValidationError::TooLong {
            field: "identifier".to_string(),
            max: MAX_IDENTIFIER_LEN,
        });
    }

    Ok(())
}

/// Validates a quantity: finite and strictly positive.
pub fn validate_quantity(field: &str, qty: f64) -> ValidationResult<()> {
    if !qty.is_finite() || qty <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a non-negative amount in cents.
///
/// ## Example
/// ```rust
/// use till_core::validation::validate_amount_cents;
///
/// assert!(validate_amount_cents("total", 0).is_ok());
/// assert!(validate_amount_cents("total", -1).is_err());
/// ```
pub fn validate_amount_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

fn require_text(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Record Validator
// =============================================================================

/// Validates a whole record.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Print Receipt                                                          │
/// │                                                                         │
/// │  validate_record(&record) ← THIS FUNCTION                              │
/// │       │                                                                 │
/// │       ├── no identifier?      → Error: "identifier is required"        │
/// │       ├── empty item name?    → Error: "items[1].name is required"     │
/// │       ├── quantity <= 0?      → Error: "items[0].quantity must be ..." │
/// │       ├── negative amount?    → Error: "tax_cents must be between ..." │
/// │       │                                                                 │
/// │       └── OK → build payload, encode QR, assemble document             │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
/// An empty item list is valid and prints a receipt with no item rows.
pub fn validate_record(record: &TransactionRecord) -> CoreResult<()> {
    validate_identifier(&record.identifier)?;

    if record.items.len() > MAX_RECEIPT_ITEMS {
        return Err(CoreError::TooManyItems {
            max: MAX_RECEIPT_ITEMS,
            actual: record.items.len(),
        });
    }

    for (index, item) in record.items.iter().enumerate() {
        require_text(&format!("items[{index}].name"), &item.name)?;
        validate_quantity(&format!("items[{index}].quantity"), item.quantity)?;
        validate_amount_cents(
            &format!("items[{index}].unit_price_cents"),
            item.unit_price_cents,
        )?;
        validate_amount_cents(
            &format!("items[{index}].line_total_cents"),
            item.line_total_cents,
        )?;
    }

    validate_amount_cents("subtotal_cents", record.subtotal_cents)?;
    validate_amount_cents("tax_cents", record.tax_cents)?;
    validate_amount_cents("discount_cents", record.discount_cents)?;
    validate_amount_cents("total_cents", record.total_cents)?;

    match &record.settlement {
        Settlement::Sale {
            amount_tendered_cents,
            change_cents,
            customer,
            ..
        } => {
            validate_amount_cents("amount_tendered_cents", *amount_tendered_cents)?;
            validate_amount_cents("change_cents", *change_cents)?;
            if let Some(customer) = customer {
                require_text("customer.name", &customer.name)?;
            }
        }
        Settlement::Purchase { supplier } => {
            require_text("supplier.name", &supplier.name)?;
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LineItem, PaymentMethod, SupplierInfo};
    use chrono::Utc;

    fn record() -> TransactionRecord {
        TransactionRecord {
            identifier: "TEST-001".to_string(),
            timestamp: Utc::now(),
            items: vec![LineItem {
                name: "Product 1".to_string(),
                quantity: 2.0,
                unit_price_cents: 1000,
                line_total_cents: 2000,
            }],
            subtotal_cents: 2000,
            tax_cents: 0,
            discount_cents: 0,
            total_cents: 2000,
            settlement: Settlement::Sale {
                amount_tendered_cents: 2000,
                change_cents: 0,
                payment_method: PaymentMethod::Cash,
                customer: None,
            },
        }
    }

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("TEST-001").is_ok());
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("   ").is_err());
        assert!(validate_identifier(&"A".repeat(65)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity("q", 1.0).is_ok());
        assert!(validate_quantity("q", 0.25).is_ok());
        assert!(validate_quantity("q", 0.0).is_err());
        assert!(validate_quantity("q", -1.0).is_err());
        assert!(validate_quantity("q", f64::NAN).is_err());
        assert!(validate_quantity("q", f64::INFINITY).is_err());
    }

    #[test]
    fn test_valid_record_passes() {
        assert!(validate_record(&record()).is_ok());
    }

    #[test]
    fn test_empty_items_is_valid() {
        let mut r = record();
        r.items.clear();
        assert!(validate_record(&r).is_ok());
    }

    #[test]
    fn test_missing_identifier_rejected() {
        let mut r = record();
        r.identifier = String::new();
        let err = validate_record(&r).unwrap_err();
        assert_eq!(err.to_string(), "Validation error: identifier is required");
    }

    #[test]
    fn test_item_errors_name_the_row() {
        let mut r = record();
        r.items[0].quantity = 0.0;
        let err = validate_record(&r).unwrap_err();
        assert!(err.to_string().contains("items[0].quantity"));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let mut r = record();
        r.tax_cents = -1;
        assert!(validate_record(&r).is_err());
    }

    #[test]
    fn test_inconsistent_total_is_not_corrected_or_rejected() {
        let mut r = record();
        r.total_cents = 99_999;
        assert!(validate_record(&r).is_ok());
    }

    #[test]
    fn test_purchase_requires_supplier_name() {
        let mut r = record();
        r.settlement = Settlement::Purchase {
            supplier: SupplierInfo {
                name: " ".to_string(),
                contact_person: None,
            },
        };
        assert!(validate_record(&r).is_err());
    }

    #[test]
    fn test_too_many_items() {
        let mut r = record();
        let item = r.items[0].clone();
        r.items = vec![item; MAX_RECEIPT_ITEMS + 1];
        assert!(matches!(
            validate_record(&r),
            Err(CoreError::TooManyItems { .. })
        ));
    }
}
