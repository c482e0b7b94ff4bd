//! # Header Parameters
//!
//! Generic `;name[=value]` parameters as they appear after an entry of a
//! list-valued header (RFC 3261 §25.1 `generic-param`):
//!
//! ```text
//! generic-param = token [ EQUAL gen-value ]
//! gen-value     = token / host / quoted-string
//! ```
//!
//! Parameters are kept exactly as declared: order is preserved and repeated
//! names are not merged, so a header re-renders the way it arrived.
//!
//! ```rust
//! use sigmedia_sip_core::types::param::{ContactParam, GenericValue};
//!
//! let q = ContactParam::new("q", Some("0.5"));
//! assert_eq!(q.to_string(), "q=0.5");
//!
//! let desc = ContactParam::new("description", Some("front desk"));
//! assert!(matches!(desc.value(), Some(GenericValue::Quoted(_))));
//! assert_eq!(desc.to_string(), "description=\"front desk\"");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::parser::quoted::quote;
use crate::parser::token::is_token_char;

/// The value half of a generic parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GenericValue {
    /// A token or host value, rendered as-is
    Token(String),
    /// A quoted-string value, stored unescaped
    Quoted(String),
}

/// Characters allowed in an unquoted gen-value (token plus host punctuation)
pub(crate) fn is_gen_value_char(c: u8) -> bool {
    is_token_char(c) || matches!(c, b':' | b'[' | b']')
}

impl GenericValue {
    /// The value text without quoting
    pub fn as_str(&self) -> &str {
        match self {
            GenericValue::Token(s) | GenericValue::Quoted(s) => s,
        }
    }

    pub fn is_quoted(&self) -> bool {
        matches!(self, GenericValue::Quoted(_))
    }
}

impl fmt::Display for GenericValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenericValue::Token(s) => f.write_str(s),
            GenericValue::Quoted(s) => f.write_str(&quote(s)),
        }
    }
}

impl From<&str> for GenericValue {
    fn from(s: &str) -> Self {
        if !s.is_empty() && s.bytes().all(is_gen_value_char) {
            GenericValue::Token(s.to_string())
        } else {
            GenericValue::Quoted(s.to_string())
        }
    }
}

impl From<String> for GenericValue {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

/// One `;name[=value]` parameter of a header entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContactParam {
    name: String,
    value: Option<GenericValue>,
}

impl ContactParam {
    /// Build a parameter; the value is quoted when it is not a valid token
    pub fn new(name: impl Into<String>, value: Option<impl Into<GenericValue>>) -> Self {
        ContactParam {
            name: name.into(),
            value: value.map(Into::into),
        }
    }

    /// A valueless flag parameter such as `;audio`
    pub fn flag(name: impl Into<String>) -> Self {
        ContactParam {
            name: name.into(),
            value: None,
        }
    }

    pub(crate) fn from_parts(name: String, value: Option<GenericValue>) -> Self {
        ContactParam { name, value }
    }

    /// Parameter name as written
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Option<&GenericValue> {
        self.value.as_ref()
    }

    /// Unquoted value text, if any
    pub fn value_str(&self) -> Option<&str> {
        self.value.as_ref().map(GenericValue::as_str)
    }

    /// Case-insensitive name comparison
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

impl fmt::Display for ContactParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(v) => write!(f, "{}={}", self.name, v),
            None => f.write_str(&self.name),
        }
    }
}
