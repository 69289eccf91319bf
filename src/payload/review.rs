//! Google Review payloads
//!
//! A Place ID is turned into the "write a review" deep link for that business.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{FieldError, Payload};
use crate::state::data::ContentKind;

const REVIEW_BASE_URL: &str = "https://search.google.com/local/writereview?placeid=";

/// Name used in history when no business name is given
pub const DEFAULT_REVIEW_NAME: &str = "Google Review";

// Place IDs are long runs of letters, digits, underscores and hyphens
static PLACE_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{20,}$").expect("valid regex"));

pub fn is_valid_place_id(place_id: &str) -> bool {
    PLACE_ID.is_match(place_id)
}

pub fn review_url(place_id: &str) -> String {
    format!("{}{}", REVIEW_BASE_URL, place_id)
}

/// Validate the Place ID and build the review link payload.
/// `business_name` only labels the history entry; it is not encoded.
pub fn build_review(place_id: &str, business_name: &str) -> Result<Payload, FieldError> {
    let place_id = place_id.trim();
    if place_id.is_empty() {
        return Err(FieldError::Required);
    }
    if !is_valid_place_id(place_id) {
        return Err(FieldError::InvalidPlaceId);
    }

    let name = match business_name.trim() {
        "" => DEFAULT_REVIEW_NAME.to_string(),
        name => name.to_string(),
    };

    Ok(Payload {
        content: review_url(place_id),
        kind: ContentKind::Review,
        name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SYDNEY: &str = "ChIJN1t_tDeuEmsRUsoyG83frY4";

    #[test]
    fn test_place_id_format() {
        assert!(is_valid_place_id(SYDNEY));
        assert!(is_valid_place_id("abcdefghij-_klmnopqr"));
        // 19 characters is one short
        assert!(!is_valid_place_id("abcdefghijklmnopqrs"));
        assert!(!is_valid_place_id("ChIJN1t tDeuEmsRUsoyG83frY4"));
        assert!(!is_valid_place_id("ChIJN1t_tDeuEmsRUsoyG83frY4!"));
    }

    #[test]
    fn test_review_payload() {
        let payload = build_review(&format!("  {}  ", SYDNEY), "  Harbour Cafe ").unwrap();
        assert_eq!(
            payload.content,
            "https://search.google.com/local/writereview?placeid=ChIJN1t_tDeuEmsRUsoyG83frY4"
        );
        assert_eq!(payload.name, "Harbour Cafe");
        assert_eq!(payload.kind, ContentKind::Review);
    }

    #[test]
    fn test_default_name() {
        let payload = build_review(SYDNEY, "   ").unwrap();
        assert_eq!(payload.name, DEFAULT_REVIEW_NAME);
    }

    #[test]
    fn test_invalid_place_id() {
        assert_eq!(build_review("", "x"), Err(FieldError::Required));
        assert_eq!(build_review("short", "x"), Err(FieldError::InvalidPlaceId));
    }
}
