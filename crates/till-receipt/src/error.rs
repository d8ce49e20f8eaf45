//! # Receipt Error Types
//!
//! Error types for payload encoding, configuration and rendering.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Receipt Error Categories                           │
//! │                                                                         │
//! │  ┌──────────────────────────┐   ┌──────────────────────────────────┐   │
//! │  │  EncodingError           │   │  ReceiptError                    │   │
//! │  │  (recovered locally)     │   │  (returned to the caller)        │   │
//! │  │                          │   │                                  │   │
//! │  │  DataTooLong             │   │  Core       - malformed record   │   │
//! │  │  InvalidData             │   │  InvalidConfig                   │   │
//! │  │  Raster                  │   │  Io / TomlParse / TomlSerialize  │   │
//! │  │  Serialization           │   │  Encoding   - `?` on encode()    │   │
//! │  └────────────┬─────────────┘   └──────────────────────────────────┘   │
//! │               │                                                         │
//! │               ▼                                                         │
//! │  CodeOutcome::Failed { reason } → fallback text in the document        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `EncodingError` never escapes the printer: it becomes the fallback
//! branch of the code section. `ReceiptError::Encoding` is the `?`
//! conversion for callers that use [`crate::qr::QrGenerator::encode`]
//! directly.

use qrcode::EcLevel;
use thiserror::Error;
use till_core::CoreError;

/// Result type alias for receipt operations.
pub type ReceiptResult<T> = Result<T, ReceiptError>;

// =============================================================================
// Encoding Error
// =============================================================================

/// The QR encoder could not turn the payload into an image.
///
/// Encoding is deterministic, so none of these are retried.
#[derive(Debug, Error)]
pub enum EncodingError {
    /// Payload exceeds the largest symbol version at this correction level.
    #[error("Payload of {bytes} bytes does not fit a QR code at level {level:?}")]
    DataTooLong { bytes: usize, level: EcLevel },

    /// The encoder rejected the data for another reason.
    #[error("QR encoder rejected payload: {0}")]
    InvalidData(String),

    /// Rasterizing or compressing the module grid failed.
    #[error("Failed to write QR raster: {0}")]
    Raster(String),

    /// The payload could not be serialized.
    #[error("Failed to serialize QR payload: {0}")]
    Serialization(String),
}

// =============================================================================
// Receipt Error
// =============================================================================

/// Errors surfaced to callers of this crate.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// The transaction record was rejected before any encoding started.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// QR encoding failed. Lets callers that use
    /// [`QrGenerator::encode`](crate::qr::QrGenerator::encode) directly
    /// propagate with `?`; the printer itself never returns it.
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// Receipt configuration is invalid.
    #[error("Invalid receipt configuration: {0}")]
    InvalidConfig(String),

    /// Failed to save configuration.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    /// File system error (config file, CLI input/output).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for `ReceiptConfig`.
    #[error("Failed to parse config: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Config could not be written back as TOML.
    #[error("Failed to serialize config: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use till_core::ValidationError;

    #[test]
    fn test_data_too_long_message() {
        let err = EncodingError::DataTooLong {
            bytes: 4000,
            level: EcLevel::M,
        };
        assert_eq!(
            err.to_string(),
            "Payload of 4000 bytes does not fit a QR code at level M"
        );
    }

    #[test]
    fn test_encoding_error_converts_with_question_mark() {
        fn encode_oversized() -> ReceiptResult<()> {
            let err = EncodingError::DataTooLong {
                bytes: 9000,
                level: EcLevel::H,
            };
            Err(err)?;
            Ok(())
        }

        let err = encode_oversized().unwrap_err();
        assert!(matches!(
            err,
            ReceiptError::Encoding(EncodingError::DataTooLong { bytes: 9000, .. })
        ));
        assert_eq!(
            err.to_string(),
            "Payload of 9000 bytes does not fit a QR code at level H"
        );
    }

    #[test]
    fn test_core_error_is_transparent() {
        let core: CoreError = ValidationError::Required {
            field: "identifier".to_string(),
        }
        .into();
        let err: ReceiptError = core.into();
        assert_eq!(err.to_string(), "Validation error: identifier is required");
    }
}
