//! Link payloads
//!
//! Users may type `example.com` or a full `https://...` URL. Missing schemes
//! get `https://`, then the result must look like an absolute http(s) URL
//! with a host.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{FieldError, Payload};
use crate::state::data::ContentKind;

static SCHEME: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^https?://").expect("valid regex"));

// scheme, optional userinfo, host (bracketed IPv6 or a run of host chars),
// optional port, optional path/query/fragment without whitespace
static ABSOLUTE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^https?://(?:[^\s/?#@]+@)?(?P<host>\[[0-9a-f:.]+\]|[^\s/?#:@\[\]\\<>^|%]+)(?::\d{1,5})?(?:[/?#]\S*)?$",
    )
    .expect("valid regex")
});

/// Trim and add `https://` when the input has no http(s) scheme.
/// Empty input stays empty.
pub fn format_url(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if SCHEME.is_match(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

/// Host part of an absolute http(s) URL, lowercased.
/// Returns `None` when the URL is not acceptable.
pub fn hostname(url: &str) -> Option<String> {
    let captures = ABSOLUTE_URL.captures(url)?;
    let host = captures.name("host")?.as_str();

    if host.starts_with('.') || host.ends_with('.') || host.contains("..") {
        return None;
    }
    Some(host.to_lowercase())
}

/// True if the input (with or without scheme) is a usable URL
pub fn is_valid_url(input: &str) -> bool {
    let formatted = format_url(input);
    !formatted.is_empty() && hostname(&formatted).is_some()
}

/// Validate link input and build its payload.
/// The default display name is the hostname.
pub fn build_link(input: &str) -> Result<Payload, FieldError> {
    let content = format_url(input);
    if content.is_empty() {
        return Err(FieldError::Required);
    }

    let name = hostname(&content).ok_or(FieldError::InvalidUrl)?;

    Ok(Payload {
        content,
        kind: ContentKind::Link,
        name,
    })
}
