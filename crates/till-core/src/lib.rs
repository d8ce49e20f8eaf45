//! # till-core: Pure Domain Model for Till Receipts
//!
//! This crate holds the transaction record that every printed receipt is
//! built from, together with the money type and the validation rules that
//! guard it. Everything here is a pure function with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Till Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Web Dashboard (React)                          │   │
//! │  │    Sales Cart ──► Purchase Terminal ──► "Print receipt"         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ TransactionRecord (JSON, ts-rs types)  │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ till-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                  │   │
//! │  │   │   types   │  │   money   │  │ validation│                  │   │
//! │  │   │ Record    │  │   Money   │  │  record   │                  │   │
//! │  │   │ LineItem  │  │  "35.00"  │  │  checks   │                  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  till-receipt (Document Layer)                  │   │
//! │  │           QR payload, QR encoder, HTML receipt builder          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (TransactionRecord, LineItem, Settlement, etc.)
//! - [`money`] - Money type over integer cents (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Record validation run before any receipt is built
//!
//! ## Example Usage
//!
//! ```rust
//! use till_core::money::Money;
//!
//! // Create money from cents (never from floats!)
//! let total = Money::from_cents(3500);
//!
//! // Receipts always show exactly two decimals
//! assert_eq!(total.to_decimal_string(), "35.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use till_core::Money` instead of
// `use till_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items accepted on a single receipt.
///
/// ## Business Reason
/// A receipt with hundreds of lines cannot fit in a QR payload anyway, and
/// such records are almost always a frontend bug (duplicated cart rows).
pub const MAX_RECEIPT_ITEMS: usize = 500;

/// Maximum length of a transaction identifier (receipt / order number).
pub const MAX_IDENTIFIER_LEN: usize = 64;
