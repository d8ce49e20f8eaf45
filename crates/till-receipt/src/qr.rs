//! # QR Generator & Validator
//!
//! Turns a record's payload into a raster data URI, or says why it could not.
//!
//! ## Generation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  TransactionRecord                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  build_payload()  ──── Serialization ───────┐                           │
//! │       │                                     │                           │
//! │       ▼                                     │                           │
//! │  encode()  ─────────── DataTooLong ─────────┤                           │
//! │       │                InvalidData / Raster │                           │
//! │       ▼                                     ▼                           │
//! │  validate()  ── false ──► Rejected     Failed { reason }                │
//! │       │                                                                 │
//! │       ▼ true                                                            │
//! │  Embedded(image)                                                        │
//! │                                                                         │
//! │  generate() never fails; every branch is a CodeOutcome.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Raster Scaling
//! When the configured width can hold the symbol plus its quiet zone, the
//! module grid is stretched onto exactly `width` pixels (fractional scale).
//! Otherwise each module is drawn 4 px wide and the image grows past `width`.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, Rgb, RgbImage};
use qrcode::types::{Color, QrError};
use qrcode::QrCode;
use std::io::Cursor;
use till_core::TransactionRecord;
use tracing::{debug, warn};

use crate::config::QrOptions;
use crate::error::{EncodingError, ReceiptResult};
use crate::payload::{build_payload, EncodedPayload};

/// Pixels per module when the target width is too small for the symbol.
const FALLBACK_SCALE: f64 = 4.0;

/// Largest raster edge ever allocated. A version 40 symbol with the widest
/// accepted margin at 4 px per module fits well inside it.
const MAX_RASTER_SIDE: u32 = 4096;

// =============================================================================
// Encoded Image
// =============================================================================

/// A `data:<mime>;base64,...` URI holding the rendered code.
///
/// Created fresh for every receipt; never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage(String);

impl EncodedImage {
    /// Wraps an existing data URI.
    pub fn new(uri: impl Into<String>) -> Self {
        EncodedImage(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length check only: non-empty and strictly longer than `threshold`.
    ///
    /// The image is never decoded.
    ///
    /// ## Example
    /// ```rust
    /// use till_receipt::qr::EncodedImage;
    ///
    /// assert!(!EncodedImage::new("data:image/png;base64,").passes(100));
    /// assert!(EncodedImage::new("x".repeat(101)).passes(100));
    /// assert!(!EncodedImage::new("x".repeat(100)).passes(100));
    /// ```
    pub fn passes(&self, threshold: usize) -> bool {
        !self.0.is_empty() && self.0.len() > threshold
    }
}

// =============================================================================
// Code Outcome
// =============================================================================

/// Result of trying to produce a code for one receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeOutcome {
    /// An image that passed validation.
    Embedded(EncodedImage),

    /// An image was produced but failed the length check.
    Rejected { length: usize },

    /// Payload serialization or encoding failed.
    Failed { reason: String },
}

impl CodeOutcome {
    /// The image to embed, if any.
    pub fn image(&self) -> Option<&EncodedImage> {
        match self {
            CodeOutcome::Embedded(image) => Some(image),
            _ => None,
        }
    }

    /// Why no image is available, when known.
    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            CodeOutcome::Failed { reason } => Some(reason),
            _ => None,
        }
    }
}

// =============================================================================
// Generator
// =============================================================================

/// Stateless QR encoder configured by [`QrOptions`].
#[derive(Debug, Clone, Default)]
pub struct QrGenerator {
    options: QrOptions,
}

impl QrGenerator {
    pub fn new(options: QrOptions) -> Self {
        QrGenerator { options }
    }

    pub fn options(&self) -> &QrOptions {
        &self.options
    }

    /// Encodes a payload into a data URI.
    ///
    /// ## Errors
    /// - `DataTooLong` when the payload exceeds the largest symbol version
    ///   at the configured correction level
    /// - `InvalidData` for any other encoder rejection
    /// - `Raster` when the colors are invalid or the image writer fails
    pub fn encode(&self, payload: &EncodedPayload) -> Result<EncodedImage, EncodingError> {
        let level = self.options.error_correction.ec_level();

        let code = QrCode::with_error_correction_level(payload.as_bytes(), level).map_err(
            |e| match e {
                QrError::DataTooLong => EncodingError::DataTooLong {
                    bytes: payload.len(),
                    level,
                },
                other => EncodingError::InvalidData(other.to_string()),
            },
        )?;

        let raster = self.rasterize(&code)?;

        let format = self.options.format;
        let mut bytes: Vec<u8> = Vec::new();
        DynamicImage::ImageRgb8(raster)
            .write_to(&mut Cursor::new(&mut bytes), format.image_format())
            .map_err(|e| EncodingError::Raster(e.to_string()))?;

        Ok(EncodedImage(format!(
            "data:{};base64,{}",
            format.mime_type(),
            STANDARD.encode(&bytes)
        )))
    }

    /// True iff the image is non-empty and longer than the configured
    /// validity threshold.
    pub fn validate(&self, image: &EncodedImage) -> bool {
        image.passes(self.options.validity_threshold)
    }

    /// Payload, encode and validate in one step. Never fails.
    pub fn generate(&self, record: &TransactionRecord) -> CodeOutcome {
        let identifier = record.identifier.as_str();

        let image = match build_payload(record).and_then(|payload| self.encode(&payload)) {
            Ok(image) => image,
            Err(e) => {
                warn!(identifier, error = %e, "QR code generation failed");
                return CodeOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        if !self.validate(&image) {
            warn!(
                identifier,
                length = image.len(),
                threshold = self.options.validity_threshold,
                "QR image failed validity check"
            );
            return CodeOutcome::Rejected {
                length: image.len(),
            };
        }

        debug!(identifier, length = image.len(), "QR code generated");
        CodeOutcome::Embedded(image)
    }

    /// Draws the module grid onto an RGB canvas.
    fn rasterize(&self, code: &QrCode) -> Result<RgbImage, EncodingError> {
        let (dark, light) = self.colors().map_err(|e| EncodingError::Raster(e.to_string()))?;

        let modules = code.width();
        let colors = code.to_colors();
        let margin = self.options.margin as f64;
        let span = modules as f64 + 2.0 * margin;

        let width = self.options.width as f64;
        let (scale, side) = if width >= span {
            (width / span, width)
        } else {
            (FALLBACK_SCALE, span * FALLBACK_SCALE)
        };
        if side > MAX_RASTER_SIDE as f64 {
            return Err(EncodingError::Raster(format!(
                "{side} px raster exceeds the {MAX_RASTER_SIDE} px limit"
            )));
        }
        let side = side as u32;

        let scaled_margin = margin * scale;
        let inner_end = side as f64 - scaled_margin;

        let mut canvas = RgbImage::from_pixel(side, side, Rgb(light));
        for (x, y, pixel) in canvas.enumerate_pixels_mut() {
            let (px, py) = (x as f64, y as f64);
            if px < scaled_margin || py < scaled_margin || px >= inner_end || py >= inner_end {
                continue;
            }

            let col = ((px - scaled_margin) / scale).floor() as usize;
            let row = ((py - scaled_margin) / scale).floor() as usize;
            if col >= modules || row >= modules {
                continue;
            }

            if colors.get(row * modules + col) == Some(&Color::Dark) {
                *pixel = Rgb(dark);
            }
        }

        Ok(canvas)
    }

    fn colors(&self) -> ReceiptResult<([u8; 3], [u8; 3])> {
        Ok((self.options.dark_rgb()?, self.options.light_rgb()?))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ErrorCorrection, RasterFormat};
    use chrono::{TimeZone, Utc};
    use till_core::{LineItem, PaymentMethod, Settlement};

    fn record(items: usize) -> TransactionRecord {
        TransactionRecord {
            identifier: "TEST-001".to_string(),
            timestamp: Utc.with_ymd_and_hms(2026, 1, 5, 10, 30, 0).unwrap(),
            items: (0..items)
                .map(|i| LineItem {
                    name: format!("Product {i} with a fairly long description"),
                    quantity: 1.0,
                    unit_price_cents: 1000,
                    line_total_cents: 1000,
                })
                .collect(),
            subtotal_cents: 1000 * items as i64,
            tax_cents: 0,
            discount_cents: 0,
            total_cents: 1000 * items as i64,
            settlement: Settlement::Sale {
                amount_tendered_cents: 1000 * items as i64,
                change_cents: 0,
                payment_method: PaymentMethod::Cash,
                customer: None,
            },
        }
    }

    fn decode_png(image: &EncodedImage) -> RgbImage {
        let b64 = image
            .as_str()
            .strip_prefix("data:image/png;base64,")
            .unwrap();
        let bytes = STANDARD.decode(b64).unwrap();
        image::load_from_memory_with_format(&bytes, image::ImageFormat::Png)
            .unwrap()
            .to_rgb8()
    }

    #[test]
    fn test_encode_produces_png_data_uri() {
        let generator = QrGenerator::default();
        let payload = build_payload(&record(2)).unwrap();
        let image = generator.encode(&payload).unwrap();

        assert!(image.as_str().starts_with("data:image/png;base64,"));
        assert!(generator.validate(&image));
    }

    #[test]
    fn test_image_is_exactly_configured_width_when_it_fits() {
        let generator = QrGenerator::default();
        let payload = build_payload(&record(1)).unwrap();
        let raster = decode_png(&generator.encode(&payload).unwrap());

        assert_eq!(raster.width(), 120);
        assert_eq!(raster.height(), 120);
        // Quiet zone corner stays light.
        assert_eq!(raster.get_pixel(0, 0), &Rgb([255, 255, 255]));
    }

    #[test]
    fn test_small_width_falls_back_to_four_px_modules() {
        let generator = QrGenerator::new(QrOptions {
            width: 10,
            ..QrOptions::default()
        });
        let payload = build_payload(&record(1)).unwrap();
        let code =
            QrCode::with_error_correction_level(payload.as_bytes(), qrcode::EcLevel::M).unwrap();
        let raster = decode_png(&generator.encode(&payload).unwrap());

        assert_eq!(raster.width() as usize, (code.width() + 4) * 4);
    }

    #[test]
    fn test_encode_is_deterministic() {
        let generator = QrGenerator::default();
        let payload = build_payload(&record(3)).unwrap();
        assert_eq!(
            generator.encode(&payload).unwrap(),
            generator.encode(&payload).unwrap()
        );
    }

    #[test]
    fn test_oversized_payload_is_data_too_long() {
        let generator = QrGenerator::new(QrOptions {
            error_correction: ErrorCorrection::H,
            ..QrOptions::default()
        });
        let payload = build_payload(&record(80)).unwrap();
        let err = generator.encode(&payload).unwrap_err();
        assert!(matches!(err, EncodingError::DataTooLong { .. }));
    }

    #[test]
    fn test_generate_never_fails_on_oversized_payload() {
        let generator = QrGenerator::new(QrOptions {
            error_correction: ErrorCorrection::H,
            ..QrOptions::default()
        });
        let outcome = generator.generate(&record(80));
        assert!(outcome.image().is_none());
        assert!(outcome.failure_reason().unwrap().contains("does not fit"));
    }

    #[test]
    fn test_generate_rejects_short_image() {
        let generator = QrGenerator::new(QrOptions {
            validity_threshold: usize::MAX,
            ..QrOptions::default()
        });
        let outcome = generator.generate(&record(1));
        assert!(matches!(outcome, CodeOutcome::Rejected { .. }));
        assert!(outcome.failure_reason().is_none());
    }

    #[test]
    fn test_oversized_raster_is_error_not_panic() {
        let payload = build_payload(&record(1)).unwrap();

        let huge_margin = QrGenerator::new(QrOptions {
            margin: u32::MAX / 2,
            ..QrOptions::default()
        });
        assert!(matches!(
            huge_margin.encode(&payload),
            Err(EncodingError::Raster(_))
        ));

        let huge_width = QrGenerator::new(QrOptions {
            width: 100_000,
            ..QrOptions::default()
        });
        assert!(matches!(
            huge_width.encode(&payload),
            Err(EncodingError::Raster(_))
        ));
        assert!(huge_width.generate(&record(1)).failure_reason().is_some());
    }

    #[test]
    fn test_widest_accepted_options_still_encode() {
        let generator = QrGenerator::new(QrOptions {
            width: crate::config::MAX_QR_WIDTH,
            margin: crate::config::MAX_QR_MARGIN,
            ..QrOptions::default()
        });
        let payload = build_payload(&record(1)).unwrap();
        let raster = decode_png(&generator.encode(&payload).unwrap());
        assert_eq!(raster.width(), crate::config::MAX_QR_WIDTH);
    }

    #[test]
    fn test_invalid_color_is_raster_error() {
        let generator = QrGenerator::new(QrOptions {
            dark_color: "black".to_string(),
            ..QrOptions::default()
        });
        let payload = build_payload(&record(1)).unwrap();
        assert!(matches!(
            generator.encode(&payload),
            Err(EncodingError::Raster(_))
        ));
    }

    #[test]
    fn test_jpeg_format_mime() {
        let generator = QrGenerator::new(QrOptions {
            format: RasterFormat::Jpeg,
            ..QrOptions::default()
        });
        let payload = build_payload(&record(1)).unwrap();
        let image = generator.encode(&payload).unwrap();
        assert!(image.as_str().starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_validate_boundaries() {
        let generator = QrGenerator::default();
        assert!(!generator.validate(&EncodedImage::new("")));
        assert!(!generator.validate(&EncodedImage::new("a".repeat(100))));
        assert!(generator.validate(&EncodedImage::new("a".repeat(101))));
    }
}
