//! Shared data structures for the application state
//!
//! These structs represent the data model that flows between
//! the generator, the history store and the UI layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::options::QrOptions;
use crate::error::AppResult;
use crate::qr::export;

/// What a QR code encodes
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Link,
    Review,
    Wifi,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContentKind::Link => "Link",
            ContentKind::Review => "Google Review",
            ContentKind::Wifi => "WiFi",
        })
    }
}

/// A generated QR code. Never mutated; regeneration replaces it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QrResult {
    /// Exact text that was encoded
    pub content: String,
    pub kind: ContentKind,
    /// Display name (hostname, business name, or "WiFi: <ssid>")
    pub name: String,
    /// Rendered raster as a PNG data URL
    pub image: String,
    /// Options used for this render, after logo forcing
    pub options: QrOptions,
    pub created_at: DateTime<Utc>,
}

impl QrResult {
    /// Decoded PNG bytes of the rendered image
    pub fn png_bytes(&self) -> AppResult<Vec<u8>> {
        let (_, bytes) = export::decode_data_url(&self.image)?;
        Ok(bytes)
    }
}

/// A result kept in history
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// Unique id (epoch milliseconds at insertion, bumped on collision)
    pub id: i64,
    #[serde(flatten)]
    pub result: QrResult,
}
