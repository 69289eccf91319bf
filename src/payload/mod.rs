/// Payload construction for each content type
///
/// Every builder validates raw form input and produces a `Payload`:
/// the exact text to encode, its kind, and a default display name.
/// - link.rs: arbitrary URLs (https:// added when missing)
/// - review.rs: Google Review deep links from a Place ID
/// - wifi.rs: WIFI: credential strings with escaping
pub mod link;
pub mod review;
pub mod wifi;

use thiserror::Error;

use crate::state::data::ContentKind;

pub use link::build_link;
pub use review::build_review;
pub use wifi::{Security, WifiCredentials};

/// Inline validation failure for a single form field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("This field is required")]
    Required,

    #[error("Please enter a valid URL")]
    InvalidUrl,

    #[error("Invalid Place ID, check the format")]
    InvalidPlaceId,

    #[error("Must be at least {min} characters")]
    TooShort { min: usize },

    #[error("Must be at most {max} characters")]
    TooLong { max: usize },
}

/// Validated text ready for encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub content: String,
    pub kind: ContentKind,
    pub name: String,
}
