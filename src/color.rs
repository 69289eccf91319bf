//! Color utilities for QR styling
//!
//! This module handles:
//! - Parsing hex colors (`#RRGGBB` / `#RGB`)
//! - Relative luminance with ITU-R BT.709 weights
//! - WCAG-style contrast ratio between foreground and background
//! - Picking a readable label color for a swatch

use cgmath::{InnerSpace, Vector3};
use std::fmt;

use crate::error::{AppError, AppResult};

/// ITU-R BT.709 luma coefficients applied to linear RGB
const BT709: [f32; 3] = [0.2126, 0.7152, 0.0722];

/// Contrast at or above this is comfortably scannable
pub const GOOD_CONTRAST: f32 = 4.5;
/// Contrast at or above this usually scans, below it often fails
pub const WARNING_CONTRAST: f32 = 3.0;

/// An 8-bit sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
    pub const WHITE: Rgb = Rgb { r: 255, g: 255, b: 255 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` or `#RGB` (the leading `#` is optional)
    pub fn from_hex(input: &str) -> AppResult<Self> {
        let hex = input.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let invalid = || AppError::Color(input.to_string());

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        match hex.len() {
            6 => {
                let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
                Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
            }
            3 => {
                // #abc expands to #aabbcc
                let channel = |i: usize| {
                    u8::from_str_radix(&hex[i..i + 1], 16)
                        .map(|v| v * 17)
                        .map_err(|_| invalid())
                };
                Ok(Self::new(channel(0)?, channel(1)?, channel(2)?))
            }
            _ => Err(invalid()),
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Pixel for the `image` crate
    pub fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, 255])
    }

    /// Color for iced widgets
    pub fn to_iced(self) -> iced::Color {
        iced::Color::from_rgb8(self.r, self.g, self.b)
    }

    /// Linearized channels (inverse sRGB transfer function)
    fn linear(self) -> Vector3<f32> {
        let to_linear = |c: u8| {
            let c = c as f32 / 255.0;
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        };
        Vector3::new(to_linear(self.r), to_linear(self.g), to_linear(self.b))
    }

    /// Relative luminance in [0, 1]
    pub fn relative_luminance(self) -> f32 {
        self.linear().dot(Vector3::from(BT709))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// WCAG contrast ratio, always in [1, 21] and symmetric in its arguments
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f32 {
    let la = a.relative_luminance();
    let lb = b.relative_luminance();
    let (hi, lo) = if la >= lb { (la, lb) } else { (lb, la) };
    (hi + 0.05) / (lo + 0.05)
}

/// Advisory scannability grade for a fg/bg pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ContrastLevel {
    Poor,
    Warning,
    Good,
}

impl ContrastLevel {
    pub fn classify(ratio: f32) -> Self {
        if ratio >= GOOD_CONTRAST {
            ContrastLevel::Good
        } else if ratio >= WARNING_CONTRAST {
            ContrastLevel::Warning
        } else {
            ContrastLevel::Poor
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ContrastLevel::Good => "Good contrast",
            ContrastLevel::Warning => "Low contrast, test before printing",
            ContrastLevel::Poor => "Poor contrast, may not scan",
        }
    }
}

/// Black or white, whichever reads better on `background`.
/// Uses BT.601 perceived brightness, which is what swatch labels need.
pub fn contrast_text_color(background: Rgb) -> Rgb {
    let brightness =
        (0.299 * background.r as f32 + 0.587 * background.g as f32 + 0.114 * background.b as f32)
            / 255.0;
    if brightness > 0.5 {
        Rgb::BLACK
    } else {
        Rgb::WHITE
    }
}

/// A named fg/bg pair offered as a one-click preset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPreset {
    pub name: &'static str,
    pub fg: Rgb,
    pub bg: Rgb,
}

pub const PRESETS: [ColorPreset; 6] = [
    ColorPreset { name: "Classic", fg: Rgb::BLACK, bg: Rgb::WHITE },
    ColorPreset { name: "Inverted", fg: Rgb::WHITE, bg: Rgb::BLACK },
    ColorPreset { name: "Blue", fg: Rgb::new(0x25, 0x63, 0xEB), bg: Rgb::WHITE },
    ColorPreset { name: "Red", fg: Rgb::new(0xDC, 0x26, 0x26), bg: Rgb::WHITE },
    ColorPreset { name: "Green", fg: Rgb::new(0x16, 0xA3, 0x4A), bg: Rgb::WHITE },
    ColorPreset { name: "Purple", fg: Rgb::new(0x7C, 0x3A, 0xED), bg: Rgb::WHITE },
];
