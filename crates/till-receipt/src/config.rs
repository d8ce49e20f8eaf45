//! # Receipt Configuration
//!
//! Every knob of the receipt printer lives in one [`ReceiptConfig`], passed
//! explicitly into the generator and the document builder.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TILL_BUSINESS_NAME="Corner Shop"                                   │
//! │     TILL_QR_ERROR_CORRECTION=Q                                         │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/till/receipt.toml (Linux)                                │
//! │     ~/Library/Application Support/com.till.pos/receipt.toml (macOS)    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     120px QR, margin 2, level M, PNG, threshold 100                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # receipt.toml
//! [business]
//! name = "POS BUSINESS"
//! address_lines = ["123 Business St, City, Country"]
//! phone = "(123) 456-7890"
//!
//! [layout]
//! show_payment_info = true
//! footer_lines = ["Thank You!"]
//! utc_offset_minutes = 180
//!
//! [qr]
//! width = 120
//! margin = 2
//! error_correction = "M"
//! format = "png"
//! validity_threshold = 100
//! ```

use chrono::format::{Item, StrftimeItems};
use chrono::{FixedOffset, Offset, Utc};
use image::ImageFormat;
use qrcode::EcLevel;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{ReceiptError, ReceiptResult};

/// Largest accepted `qr.width`, in pixels.
pub const MAX_QR_WIDTH: u32 = 2048;

/// Largest accepted `qr.margin`, in modules.
pub const MAX_QR_MARGIN: u32 = 16;

/// Largest accepted |`layout.utc_offset_minutes`|.
const MAX_UTC_OFFSET_MINUTES: u32 = 24 * 60 - 1;

// =============================================================================
// Error Correction Level
// =============================================================================

/// QR error-correction tier.
///
/// ## Capacity vs. Damage Tolerance
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Level   Recoverable damage   Use                                       │
/// │  ─────   ──────────────────   ───────────────────────────────────────   │
/// │  L       ~7%                  Screens only                              │
/// │  M       ~15%                 Thermal paper (default)                   │
/// │  Q       ~25%                 Receipts that get folded / handled        │
/// │  H       ~30%                 Logos over the code                       │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ErrorCorrection {
    L,
    #[default]
    M,
    Q,
    H,
}

impl ErrorCorrection {
    /// Returns the encoder's level for this tier.
    pub fn ec_level(&self) -> EcLevel {
        match self {
            ErrorCorrection::L => EcLevel::L,
            ErrorCorrection::M => EcLevel::M,
            ErrorCorrection::Q => EcLevel::Q,
            ErrorCorrection::H => EcLevel::H,
        }
    }
}

impl std::str::FromStr for ErrorCorrection {
    type Err = ReceiptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "L" | "LOW" => Ok(ErrorCorrection::L),
            "M" | "MEDIUM" => Ok(ErrorCorrection::M),
            "Q" | "QUARTILE" => Ok(ErrorCorrection::Q),
            "H" | "HIGH" => Ok(ErrorCorrection::H),
            other => Err(ReceiptError::InvalidConfig(format!(
                "Unknown error correction level: '{}'. Valid options: L, M, Q, H",
                other
            ))),
        }
    }
}

// =============================================================================
// Raster Format
// =============================================================================

/// Output raster format of the embedded code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RasterFormat {
    #[default]
    Png,
    Jpeg,
}

impl RasterFormat {
    /// MIME type used in the data URI.
    pub const fn mime_type(&self) -> &'static str {
        match self {
            RasterFormat::Png => "image/png",
            RasterFormat::Jpeg => "image/jpeg",
        }
    }

    pub(crate) fn image_format(&self) -> ImageFormat {
        match self {
            RasterFormat::Png => ImageFormat::Png,
            RasterFormat::Jpeg => ImageFormat::Jpeg,
        }
    }
}

// =============================================================================
// QR Options
// =============================================================================

/// Encoder and validity settings for the embedded code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrOptions {
    /// Target raster width in pixels. Matches the receipt's code column.
    #[serde(default = "default_qr_width")]
    pub width: u32,

    /// Quiet-zone margin, in modules.
    #[serde(default = "default_qr_margin")]
    pub margin: u32,

    #[serde(default)]
    pub error_correction: ErrorCorrection,

    #[serde(default)]
    pub format: RasterFormat,

    /// Foreground color as `#rrggbb` or `#rgb`.
    #[serde(default = "default_dark_color")]
    pub dark_color: String,

    /// Background color as `#rrggbb` or `#rgb`.
    #[serde(default = "default_light_color")]
    pub light_color: String,

    /// Minimum data URI length (exclusive) for an image to be embedded.
    #[serde(default = "default_validity_threshold")]
    pub validity_threshold: usize,

    /// Width and height of the `<img>` box in CSS pixels.
    #[serde(default = "default_display_size")]
    pub display_size: u32,
}

fn default_qr_width() -> u32 {
    120
}

fn default_qr_margin() -> u32 {
    2
}

fn default_dark_color() -> String {
    "#000000".to_string()
}

fn default_light_color() -> String {
    "#ffffff".to_string()
}

fn default_validity_threshold() -> usize {
    100
}

fn default_display_size() -> u32 {
    120
}

impl Default for QrOptions {
    fn default() -> Self {
        QrOptions {
            width: default_qr_width(),
            margin: default_qr_margin(),
            error_correction: ErrorCorrection::default(),
            format: RasterFormat::default(),
            dark_color: default_dark_color(),
            light_color: default_light_color(),
            validity_threshold: default_validity_threshold(),
            display_size: default_display_size(),
        }
    }
}

impl QrOptions {
    /// Foreground color as RGB.
    pub fn dark_rgb(&self) -> ReceiptResult<[u8; 3]> {
        parse_hex_color(&self.dark_color)
    }

    /// Background color as RGB.
    pub fn light_rgb(&self) -> ReceiptResult<[u8; 3]> {
        parse_hex_color(&self.light_color)
    }
}

/// Parses `#rrggbb` or `#rgb`.
///
/// ## Example
/// ```rust
/// use till_receipt::config::parse_hex_color;
///
/// assert_eq!(parse_hex_color("#000000").unwrap(), [0, 0, 0]);
/// assert_eq!(parse_hex_color("#fff").unwrap(), [255, 255, 255]);
/// assert!(parse_hex_color("black").is_err());
/// ```
pub fn parse_hex_color(value: &str) -> ReceiptResult<[u8; 3]> {
    let invalid = || ReceiptError::InvalidConfig(format!("Invalid color '{}'", value));

    let hex = value.trim().strip_prefix('#').ok_or_else(invalid)?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
    match hex.len() {
        6 => Ok([
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        ]),
        3 => {
            let mut rgb = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let nibble = channel(&c.to_string())?;
                rgb[i] = nibble * 17;
            }
            Ok(rgb)
        }
        _ => Err(invalid()),
    }
}

// =============================================================================
// Business Identity
// =============================================================================

/// Identity block printed at the top of every receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessInfo {
    #[serde(default = "default_business_name")]
    pub name: String,

    #[serde(default = "default_address_lines")]
    pub address_lines: Vec<String>,

    #[serde(default = "default_phone")]
    pub phone: Option<String>,

    /// Printed under the footer lines.
    #[serde(default = "default_tagline")]
    pub tagline: Option<String>,
}

fn default_business_name() -> String {
    "POS BUSINESS".to_string()
}

fn default_address_lines() -> Vec<String> {
    vec!["123 Business St, City, Country".to_string()]
}

fn default_phone() -> Option<String> {
    Some("(123) 456-7890".to_string())
}

fn default_tagline() -> Option<String> {
    Some("For more info, visit us at www.posbusiness.com".to_string())
}

impl Default for BusinessInfo {
    fn default() -> Self {
        BusinessInfo {
            name: default_business_name(),
            address_lines: default_address_lines(),
            phone: default_phone(),
            tagline: default_tagline(),
        }
    }
}

// =============================================================================
// Layout Settings
// =============================================================================

/// Which sections to print and how.
///
/// The code section, closing identification line and footer are always
/// printed; only the upper sections can be switched off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSettings {
    /// Replaces the business identity block when non-empty.
    #[serde(default)]
    pub header_lines: Vec<String>,

    #[serde(default = "default_footer_lines")]
    pub footer_lines: Vec<String>,

    #[serde(default = "default_true")]
    pub show_business_info: bool,

    #[serde(default = "default_true")]
    pub show_transaction_details: bool,

    #[serde(default = "default_true")]
    pub show_item_details: bool,

    #[serde(default = "default_true")]
    pub show_totals: bool,

    #[serde(default = "default_true")]
    pub show_payment_info: bool,

    /// Omit tax and discount rows when they are zero.
    #[serde(default)]
    pub hide_zero_adjustments: bool,

    #[serde(default = "default_font_size")]
    pub font_size: String,

    #[serde(default = "default_paper_width")]
    pub paper_width: String,

    /// strftime pattern for the date cell.
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// strftime pattern for the time cell.
    #[serde(default = "default_time_format")]
    pub time_format: String,

    /// Offset applied to the UTC timestamp before printing.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

fn default_true() -> bool {
    true
}

fn default_footer_lines() -> Vec<String> {
    vec!["Thank You!".to_string()]
}

fn default_font_size() -> String {
    "12px".to_string()
}

fn default_paper_width() -> String {
    "320px".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_time_format() -> String {
    "%H:%M:%S".to_string()
}

impl Default for LayoutSettings {
    fn default() -> Self {
        LayoutSettings {
            header_lines: Vec::new(),
            footer_lines: default_footer_lines(),
            show_business_info: true,
            show_transaction_details: true,
            show_item_details: true,
            show_totals: true,
            show_payment_info: true,
            hide_zero_adjustments: false,
            font_size: default_font_size(),
            paper_width: default_paper_width(),
            date_format: default_date_format(),
            time_format: default_time_format(),
            utc_offset_minutes: 0,
        }
    }
}

impl LayoutSettings {
    /// Offset used to print the local date and time.
    ///
    /// Falls back to UTC for out-of-range values; `validate()` rejects those
    /// up front.
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| Utc.fix())
    }
}

// =============================================================================
// Main Receipt Configuration
// =============================================================================

/// Complete receipt configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceiptConfig {
    #[serde(default)]
    pub business: BusinessInfo,

    #[serde(default)]
    pub layout: LayoutSettings,

    #[serde(default)]
    pub qr: QrOptions,
}

impl ReceiptConfig {
    /// Creates a config with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (receipt.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ReceiptResult<Self> {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    /// [`load`](Self::load) with an explicit variable lookup instead of the
    /// process environment.
    pub fn load_with<F>(config_path: Option<PathBuf>, lookup: F) -> ReceiptResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading receipt config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(lookup);
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load receipt config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ReceiptResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ReceiptError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Receipt config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ReceiptResult<()> {
        if self.qr.width == 0 || self.qr.width > MAX_QR_WIDTH {
            return Err(ReceiptError::InvalidConfig(format!(
                "qr.width must be between 1 and {}, got {}",
                MAX_QR_WIDTH, self.qr.width
            )));
        }

        if self.qr.margin > MAX_QR_MARGIN {
            return Err(ReceiptError::InvalidConfig(format!(
                "qr.margin must be at most {}, got {}",
                MAX_QR_MARGIN, self.qr.margin
            )));
        }

        if self.qr.display_size == 0 {
            return Err(ReceiptError::InvalidConfig(
                "qr.display_size must be greater than 0".into(),
            ));
        }

        self.qr.dark_rgb()?;
        self.qr.light_rgb()?;

        if self.layout.utc_offset_minutes.unsigned_abs() > MAX_UTC_OFFSET_MINUTES {
            return Err(ReceiptError::InvalidConfig(format!(
                "layout.utc_offset_minutes must be within ±{}, got {}",
                MAX_UTC_OFFSET_MINUTES, self.layout.utc_offset_minutes
            )));
        }

        for (field, pattern) in [
            ("layout.date_format", &self.layout.date_format),
            ("layout.time_format", &self.layout.time_format),
        ] {
            if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
                return Err(ReceiptError::InvalidConfig(format!(
                    "{} is not a valid strftime pattern: '{}'",
                    field, pattern
                )));
            }
        }

        Ok(())
    }

    /// Applies `TILL_*` overrides read through `lookup`.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup("TILL_BUSINESS_NAME") {
            debug!(name = %name, "Overriding business name from environment");
            self.business.name = name;
        }

        if let Some(width) = lookup("TILL_QR_WIDTH") {
            match width.parse::<u32>() {
                Ok(w) => self.qr.width = w,
                Err(_) => warn!(width = %width, "Ignoring non-numeric TILL_QR_WIDTH"),
            }
        }

        if let Some(level) = lookup("TILL_QR_ERROR_CORRECTION") {
            match level.parse() {
                Ok(parsed) => {
                    debug!(level = %level, "Overriding error correction from environment");
                    self.qr.error_correction = parsed;
                }
                Err(e) => warn!("{}", e),
            }
        }

        if let Some(threshold) = lookup("TILL_QR_THRESHOLD") {
            match threshold.parse::<usize>() {
                Ok(t) => self.qr.validity_threshold = t,
                Err(_) => warn!(threshold = %threshold, "Ignoring non-numeric TILL_QR_THRESHOLD"),
            }
        }

        if let Some(offset) = lookup("TILL_UTC_OFFSET_MINUTES") {
            match offset.parse::<i32>() {
                Ok(o) => self.layout.utc_offset_minutes = o,
                Err(_) => warn!(offset = %offset, "Ignoring non-numeric TILL_UTC_OFFSET_MINUTES"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "till", "pos")
            .map(|dirs| dirs.config_dir().join("receipt.toml"))
    }
}
