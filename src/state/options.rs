//! QR appearance options
//!
//! This struct stores every customization the user can make in the panel.
//! It is serialized to JSON as part of each history entry, so a past code
//! can be restored with exactly the look it was generated with.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::color::{contrast_ratio, ColorPreset, ContrastLevel, Rgb};
use crate::error::{AppError, AppResult};
use crate::qr::export;

pub const MIN_SIZE: u32 = 100;
pub const MAX_SIZE: u32 = 400;
pub const MAX_MARGIN: u32 = 10;
pub const MIN_LOGO_SIZE: u8 = 10;
pub const MAX_LOGO_SIZE: u8 = 30;
/// Largest logo file accepted from disk
pub const MAX_LOGO_BYTES: usize = 2 * 1024 * 1024;

/// QR error-correction tier, ordered by redundancy
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EcLevel {
    L,
    M,
    Q,
    H,
}

impl EcLevel {
    pub const ALL: [EcLevel; 4] = [EcLevel::L, EcLevel::M, EcLevel::Q, EcLevel::H];

    pub fn to_qrcode(self) -> qrcode::EcLevel {
        match self {
            EcLevel::L => qrcode::EcLevel::L,
            EcLevel::M => qrcode::EcLevel::M,
            EcLevel::Q => qrcode::EcLevel::Q,
            EcLevel::H => qrcode::EcLevel::H,
        }
    }
}

impl fmt::Display for EcLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EcLevel::L => "Low (7%, densest)",
            EcLevel::M => "Medium (15%, recommended)",
            EcLevel::Q => "High (25%)",
            EcLevel::H => "Very high (30%, most robust)",
        })
    }
}

/// A logo to stamp in the middle of the code
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Logo {
    pub file_name: String,
    /// Original file bytes as a data URL
    pub data_url: String,
}

impl Logo {
    /// Validate raw file bytes and wrap them as a logo.
    /// Rejects oversized files and anything `image` cannot decode.
    pub fn from_bytes(file_name: impl Into<String>, bytes: &[u8]) -> AppResult<Self> {
        if bytes.len() > MAX_LOGO_BYTES {
            return Err(AppError::Logo(format!(
                "file is {} KiB, the limit is {} KiB",
                bytes.len() / 1024,
                MAX_LOGO_BYTES / 1024
            )));
        }

        let format = image::guess_format(bytes)
            .map_err(|_| AppError::Logo("unrecognized image format".to_string()))?;
        image::load_from_memory_with_format(bytes, format)
            .map_err(|e| AppError::Logo(format!("could not decode image: {}", e)))?;

        let mime = format.to_mime_type();
        Ok(Self {
            file_name: file_name.into(),
            data_url: export::to_data_url(mime, bytes),
        })
    }

    pub fn decode(&self) -> AppResult<image::DynamicImage> {
        let (_, bytes) = export::decode_data_url(&self.data_url)?;
        Ok(image::load_from_memory(&bytes)?)
    }
}

/// Identifies a single option for per-field reset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionField {
    Size,
    Margin,
    FgColor,
    BgColor,
    ErrorCorrection,
    Logo,
    LogoSize,
}

/// All generation options
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QrOptions {
    /// Output width and height in pixels (100 to 400)
    pub size: u32,
    /// Module color as hex
    pub fg_color: String,
    /// Background color as hex
    pub bg_color: String,
    pub error_correction: EcLevel,
    /// Quiet zone in modules (0 to 10)
    pub margin: u32,
    #[serde(default)]
    pub logo: Option<Logo>,
    /// Logo box side as a percentage of the QR width (10 to 30)
    #[serde(default = "default_logo_size")]
    pub logo_size: u8,
}

fn default_logo_size() -> u8 {
    20
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            size: 250,
            fg_color: "#000000".to_string(),
            bg_color: "#FFFFFF".to_string(),
            error_correction: EcLevel::M,
            margin: 4,
            logo: None,
            logo_size: default_logo_size(),
        }
    }
}

impl QrOptions {
    pub fn set_size(&mut self, size: u32) {
        self.size = size.clamp(MIN_SIZE, MAX_SIZE);
    }

    pub fn set_margin(&mut self, margin: u32) {
        self.margin = margin.min(MAX_MARGIN);
    }

    pub fn set_logo_size(&mut self, percent: u8) {
        self.logo_size = percent.clamp(MIN_LOGO_SIZE, MAX_LOGO_SIZE);
    }

    pub fn apply_preset(&mut self, preset: &ColorPreset) {
        self.fg_color = preset.fg.to_hex();
        self.bg_color = preset.bg.to_hex();
    }

    /// True when the current colors match `preset`, ignoring hex case
    pub fn matches_preset(&self, preset: &ColorPreset) -> bool {
        self.fg_color.eq_ignore_ascii_case(&preset.fg.to_hex())
            && self.bg_color.eq_ignore_ascii_case(&preset.bg.to_hex())
    }

    /// Restore one field to its default
    pub fn reset(&mut self, field: OptionField) {
        let defaults = Self::default();
        match field {
            OptionField::Size => self.size = defaults.size,
            OptionField::Margin => self.margin = defaults.margin,
            OptionField::FgColor => self.fg_color = defaults.fg_color,
            OptionField::BgColor => self.bg_color = defaults.bg_color,
            OptionField::ErrorCorrection => self.error_correction = defaults.error_correction,
            OptionField::Logo => self.logo = defaults.logo,
            OptionField::LogoSize => self.logo_size = defaults.logo_size,
        }
    }

    pub fn reset_all(&mut self) {
        *self = Self::default();
    }

    /// True if `field` currently differs from its default
    pub fn is_modified(&self, field: OptionField) -> bool {
        let mut reset = self.clone();
        reset.reset(field);
        reset != *self
    }

    /// Options as they are actually encoded: a logo hides modules in the
    /// center, so its presence forces the highest error correction.
    pub fn effective(&self) -> Self {
        let mut effective = self.clone();
        if effective.logo.is_some() {
            effective.error_correction = EcLevel::H;
        }
        effective
    }

    pub fn fg(&self) -> AppResult<Rgb> {
        Rgb::from_hex(&self.fg_color)
    }

    pub fn bg(&self) -> AppResult<Rgb> {
        Rgb::from_hex(&self.bg_color)
    }

    /// Contrast ratio and grade, or `None` while a color is invalid
    pub fn contrast(&self) -> Option<(f32, ContrastLevel)> {
        let ratio = contrast_ratio(self.fg().ok()?, self.bg().ok()?);
        Some((ratio, ContrastLevel::classify(ratio)))
    }
}
