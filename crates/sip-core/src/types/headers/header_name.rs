use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};

/// SIP header names with typed support
///
/// Header names are case-insensitive in SIP. Known names keep their
/// canonical capitalization and accept their compact form; anything else
/// is carried verbatim in `Other`.
///
/// # Examples
///
/// ```rust
/// use sigmedia_sip_core::types::headers::HeaderName;
/// use std::str::FromStr;
///
/// assert_eq!(HeaderName::from_str("m").unwrap(), HeaderName::Contact);
/// assert_eq!(HeaderName::Contact.as_str(), "Contact");
///
/// let custom = HeaderName::from_str("X-Custom-Header").unwrap();
/// assert_eq!(custom, HeaderName::Other("X-Custom-Header".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeaderName {
    /// Contact: Where subsequent requests should be sent
    Contact,
    /// Any header without a typed model
    Other(String),
}

impl HeaderName {
    /// Canonical header name
    pub fn as_str(&self) -> &str {
        match self {
            HeaderName::Contact => "Contact",
            HeaderName::Other(s) => s,
        }
    }

    /// Compact form, if the header has one
    pub fn compact(&self) -> Option<&'static str> {
        match self {
            HeaderName::Contact => Some("m"),
            HeaderName::Other(_) => None,
        }
    }
}

impl fmt::Display for HeaderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HeaderName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::ParseError("Empty header name is not allowed".to_string()));
        }

        match s.to_ascii_lowercase().as_str() {
            "contact" | "m" => Ok(HeaderName::Contact),
            _ => Ok(HeaderName::Other(s.to_string())),
        }
    }
}
