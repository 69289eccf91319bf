//! Error types shared across the application
//!
//! `AppError` covers everything that can go wrong after input validation.
//! Form validation has its own `FieldError` in the payload module so it
//! never reaches the encoder.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// The payload could not be encoded as a QR symbol (usually too long)
    #[error("failed to encode QR code: {0}")]
    Encode(#[from] qrcode::types::QrError),

    #[error("image processing failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("invalid color '{0}'")]
    Color(String),

    #[error("local storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("malformed data URL: {0}")]
    DataUrl(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The logo file was too large or could not be decoded
    #[error("logo rejected: {0}")]
    Logo(String),

    #[error("configuration error: {0}")]
    Config(String),

    /// A background task panicked or was cancelled
    #[error("background task failed: {0}")]
    Task(String),
}

pub type AppResult<T> = Result<T, AppError>;
