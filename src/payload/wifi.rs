//! WiFi credential payloads
//!
//! Phones join a network when they scan the textual convention
//! `WIFI:T:<auth>;S:<ssid>;P:<password>;H:<hidden>;;`.
//! Backslash, semicolon, comma and colon in the password are escaped
//! with a backslash. The SSID is written as typed.

use std::fmt;

use super::{FieldError, Payload};
use crate::state::data::ContentKind;

pub const MAX_SSID_LEN: usize = 32;
pub const MIN_PASSWORD_LEN: usize = 8;

const PREFIX: &str = "WIFI:";
const ESCAPED: [char; 4] = ['\\', ';', ',', ':'];

/// Network authentication type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Security {
    #[default]
    Wpa,
    Wep,
    NoPass,
}

impl Security {
    pub const ALL: [Security; 3] = [Security::Wpa, Security::Wep, Security::NoPass];

    /// Value of the `T:` field
    pub fn code(self) -> &'static str {
        match self {
            Security::Wpa => "WPA",
            Security::Wep => "WEP",
            Security::NoPass => "nopass",
        }
    }

    fn from_code(code: &str) -> Self {
        match code.to_ascii_uppercase().as_str() {
            "WPA" | "WPA2" | "WPA3" | "SAE" => Security::Wpa,
            "WEP" => Security::Wep,
            _ => Security::NoPass,
        }
    }

    pub fn needs_password(self) -> bool {
        self != Security::NoPass
    }
}

impl fmt::Display for Security {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Security::Wpa => "WPA/WPA2/WPA3",
            Security::Wep => "WEP",
            Security::NoPass => "Open (no password)",
        })
    }
}

/// Backslash-escape `\ ; , :`
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 4);
    for c in value.chars() {
        if ESCAPED.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Inverse of `escape`: a backslash makes the next character literal
pub fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            // a trailing lone backslash is kept as-is
            out.push(chars.next().unwrap_or('\\'));
        } else {
            out.push(c);
        }
    }
    out
}

/// Per-field validation result for the WiFi form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WifiErrors {
    pub ssid: Option<FieldError>,
    pub password: Option<FieldError>,
}

impl WifiErrors {
    pub fn is_empty(&self) -> bool {
        self.ssid.is_none() && self.password.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WifiCredentials {
    pub ssid: String,
    pub password: String,
    pub security: Security,
    pub hidden: bool,
}

impl WifiCredentials {
    pub fn new(ssid: impl Into<String>, password: impl Into<String>, security: Security, hidden: bool) -> Self {
        Self {
            ssid: ssid.into(),
            password: password.into(),
            security,
            hidden,
        }
    }

    /// Check every field, collecting all errors at once
    pub fn validate(&self) -> WifiErrors {
        let mut errors = WifiErrors::default();

        if self.ssid.trim().is_empty() {
            errors.ssid = Some(FieldError::Required);
        } else if self.ssid.chars().count() > MAX_SSID_LEN {
            errors.ssid = Some(FieldError::TooLong { max: MAX_SSID_LEN });
        }

        if self.security.needs_password() {
            if self.password.trim().is_empty() {
                errors.password = Some(FieldError::Required);
            } else if self.password.chars().count() < MIN_PASSWORD_LEN {
                errors.password = Some(FieldError::TooShort { min: MIN_PASSWORD_LEN });
            }
        }

        errors
    }

    /// Encode as a `WIFI:` string. Open networks carry no `P:` field.
    pub fn to_payload(&self) -> String {
        let mut out = format!("{}T:{};S:{};", PREFIX, self.security.code(), self.ssid);
        if self.security.needs_password() {
            out.push_str(&format!("P:{};", escape(&self.password)));
        }
        out.push_str(&format!("H:{};", self.hidden));
        out.push(';');
        out
    }

    /// Parse a string produced by `to_payload` back into credentials.
    /// Returns `None` if it does not start with `WIFI:T:<auth>;S:`.
    ///
    /// The SSID is raw, so fields are located by position rather than by
    /// splitting on `;`: `H:` is the last field and `P:` the last one before
    /// it. An escaped password never contains `;P:` since its colons are escaped.
    pub fn parse(payload: &str) -> Option<Self> {
        let body = payload.strip_prefix(PREFIX)?.strip_prefix("T:")?;
        let (code, rest) = body.split_once(";S:")?;
        let security = Security::from_code(code);

        let (rest, hidden) = match rest.rsplit_once(";H:") {
            Some((rest, value)) => (rest, value.trim_end_matches(';').eq_ignore_ascii_case("true")),
            None => (rest.trim_end_matches(';'), false),
        };

        let (ssid, password) = match rest.rsplit_once(";P:") {
            Some((ssid, password)) if security.needs_password() => (ssid, unescape(password)),
            _ => (rest, String::new()),
        };

        Some(WifiCredentials {
            ssid: ssid.to_string(),
            password,
            security,
            hidden,
        })
    }

    /// Validate and build the payload; the display name is `WiFi: <ssid>`
    pub fn build(&self) -> Result<Payload, WifiErrors> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Payload {
            content: self.to_payload(),
            kind: ContentKind::Wifi,
            name: format!("WiFi: {}", self.ssid),
        })
    }
}
