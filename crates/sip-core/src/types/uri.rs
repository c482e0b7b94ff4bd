//! # Address-spec URIs
//!
//! Contact entries carry their address as an opaque [`Uri`]. Full URI
//! grammar (user info, URI parameters, escaped headers) belongs to a
//! dedicated URI parser; this crate only needs to know the scheme, the
//! host for SIP URIs, and the exact text so it can render it back.
//!
//! Parsing goes through the [`AddressSpecParser`] trait so callers can plug
//! in a stricter URI implementation. [`DefaultAddressSpecParser`] performs
//! the structural checks that the Contact grammar itself depends on.
//!
//! ```rust
//! use sigmedia_sip_core::types::uri::{Scheme, Uri};
//! use std::str::FromStr;
//!
//! let uri = Uri::from_str("sip:alice@example.com:5060;transport=tcp").unwrap();
//! assert_eq!(uri.scheme(), &Scheme::Sip);
//! assert_eq!(uri.host(), Some("example.com"));
//! assert_eq!(uri.to_string(), "sip:alice@example.com:5060;transport=tcp");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::parser::token::is_token;

/// URI scheme
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scheme {
    /// SIP URI (non-secure)
    Sip,
    /// SIPS URI (secure SIP)
    Sips,
    /// TEL URI (telephone number)
    Tel,
    /// HTTP URI
    Http,
    /// HTTPS URI
    Https,
    /// Custom scheme (any other scheme)
    Custom(String),
}

impl Scheme {
    pub fn as_str(&self) -> &str {
        match self {
            Scheme::Sip => "sip",
            Scheme::Sips => "sips",
            Scheme::Tel => "tel",
            Scheme::Http => "http",
            Scheme::Https => "https",
            Scheme::Custom(s) => s,
        }
    }

    /// Whether the scheme requires a host part
    pub fn is_sip(&self) -> bool {
        matches!(self, Scheme::Sip | Scheme::Sips)
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() || !is_token(s) || !s.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return Err(Error::InvalidAddress(format!("invalid scheme '{}'", s)));
        }
        Ok(match s.to_ascii_lowercase().as_str() {
            "sip" => Scheme::Sip,
            "sips" => Scheme::Sips,
            "tel" => Scheme::Tel,
            "http" => Scheme::Http,
            "https" => Scheme::Https,
            _ => Scheme::Custom(s.to_string()),
        })
    }
}

/// An addr-spec URI, kept verbatim
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Uri {
    scheme: Scheme,
    text: String,
}

impl Uri {
    /// Build a URI from already-validated parts.
    ///
    /// `text` is the full addr-spec including the scheme prefix.
    pub fn from_parts(scheme: Scheme, text: impl Into<String>) -> Self {
        Uri {
            scheme,
            text: text.into(),
        }
    }

    pub fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    /// The full URI text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Everything after `scheme:`
    pub fn rest(&self) -> &str {
        self.text.split_once(':').map(|(_, rest)| rest).unwrap_or("")
    }

    /// Host part of a `sip`/`sips` URI
    pub fn host(&self) -> Option<&str> {
        if !self.scheme.is_sip() {
            return None;
        }
        sip_host(self.rest())
    }

    /// Whether the text needs `<...>` to be embedded in a header value
    pub fn needs_brackets(&self) -> bool {
        self.text.contains(&[',', ';', '?'][..])
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for Uri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        DefaultAddressSpecParser.parse_addr_spec(s)
    }
}

/// Host of a SIP URI body (`user@host:port;params?headers`)
fn sip_host(rest: &str) -> Option<&str> {
    let end = rest.find(&[';', '?'][..]).unwrap_or(rest.len());
    let hostport = &rest[..end];
    let hostport = hostport.rsplit_once('@').map(|(_, h)| h).unwrap_or(hostport);

    let host = if let Some(v6) = hostport.strip_prefix('[') {
        let close = v6.find(']')?;
        &hostport[..close + 2]
    } else {
        hostport.split(':').next().unwrap_or("")
    };

    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

/// Turns addr-spec text into a [`Uri`]
pub trait AddressSpecParser: Send + Sync {
    fn parse_addr_spec(&self, text: &str) -> Result<Uri>;
}

/// Structural addr-spec validation.
///
/// Accepts `scheme ":" rest` where the scheme is a token starting with a
/// letter, the rest is non-empty and has no whitespace, `<`, `>` or `"`,
/// and SIP/SIPS URIs have a host.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAddressSpecParser;

impl AddressSpecParser for DefaultAddressSpecParser {
    fn parse_addr_spec(&self, text: &str) -> Result<Uri> {
        let (scheme, rest) = text
            .split_once(':')
            .ok_or_else(|| Error::InvalidAddress(format!("missing scheme in '{}'", text)))?;
        let scheme = Scheme::from_str(scheme)?;

        if rest.is_empty() {
            return Err(Error::InvalidAddress(format!("empty address in '{}'", text)));
        }
        if rest
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '<' | '>' | '"'))
        {
            return Err(Error::InvalidAddress(format!("illegal character in '{}'", text)));
        }
        if scheme.is_sip() && sip_host(rest).is_none() {
            return Err(Error::InvalidAddress(format!("missing host in '{}'", text)));
        }

        Ok(Uri::from_parts(scheme, text))
    }
}

impl<F> AddressSpecParser for F
where
    F: Fn(&str) -> Result<Uri> + Send + Sync,
{
    fn parse_addr_spec(&self, text: &str) -> Result<Uri> {
        self(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_parsing() {
        assert_eq!(Scheme::from_str("sip").unwrap(), Scheme::Sip);
        assert_eq!(Scheme::from_str("SIPS").unwrap(), Scheme::Sips);
        assert_eq!(Scheme::from_str("tel").unwrap(), Scheme::Tel);
        assert_eq!(Scheme::from_str("urn").unwrap(), Scheme::Custom("urn".into()));
        assert!(Scheme::from_str("").is_err());
        assert!(Scheme::from_str("1sip").is_err());
    }

    #[test]
    fn test_host_extraction() {
        let uri = Uri::from_str("sip:bob@biloxi.example.com;transport=tcp").unwrap();
        assert_eq!(uri.host(), Some("biloxi.example.com"));

        let uri = Uri::from_str("sips:[2001:db8::1]:5061").unwrap();
        assert_eq!(uri.host(), Some("[2001:db8::1]"));

        let uri = Uri::from_str("tel:+1-201-555-0123").unwrap();
        assert_eq!(uri.host(), None);
        assert_eq!(uri.rest(), "+1-201-555-0123");
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(matches!(Uri::from_str("alice"), Err(Error::InvalidAddress(_))));
        assert!(matches!(Uri::from_str("sip:"), Err(Error::InvalidAddress(_))));
        assert!(matches!(Uri::from_str("sip:alice@"), Err(Error::InvalidAddress(_))));
        assert!(matches!(Uri::from_str("sip:a b@c"), Err(Error::InvalidAddress(_))));
        assert!(matches!(Uri::from_str("sip:<a@b>"), Err(Error::InvalidAddress(_))));
    }

    #[test]
    fn test_needs_brackets() {
        assert!(!Uri::from_str("sip:a@b").unwrap().needs_brackets());
        assert!(Uri::from_str("sip:a@b;lr").unwrap().needs_brackets());
        assert!(Uri::from_str("sip:a@b?subject=x").unwrap().needs_brackets());
    }

    #[test]
    fn test_closure_parser() {
        let strict = |text: &str| -> Result<Uri> {
            if text.starts_with("sips:") {
                Uri::from_str(text)
            } else {
                Err(Error::InvalidAddress("sips required".into()))
            }
        };
        assert!(strict.parse_addr_spec("sips:a@b").is_ok());
        assert!(strict.parse_addr_spec("sip:a@b").is_err());
    }
}
