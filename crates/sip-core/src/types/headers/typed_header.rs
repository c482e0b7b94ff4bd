use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::contact::ContactHeader;
use super::{Header, HeaderName};

/// Common interface of typed header models
///
/// A typed header knows its name and how to move between its model and
/// the raw value text. Conversions from an untyped [`Header`] check the
/// name first.
pub trait TypedHeaderTrait: Sized {
    /// Header name
    fn header_name() -> HeaderName;

    /// Parse the value part of the header
    fn parse_value(value: &str) -> Result<Self>;

    /// Serialize back to value text
    fn render_value(&self) -> String;

    /// Convert to an untyped Header
    fn to_header(&self) -> Header {
        Header::new(Self::header_name(), self.render_value())
    }

    /// Try to convert from an untyped Header
    fn from_header(header: &Header) -> Result<Self> {
        let expected = Self::header_name();
        if header.name != expected {
            return Err(Error::HeaderMismatch {
                expected: expected.to_string(),
                actual: header.name.to_string(),
            });
        }
        Self::parse_value(&header.value)
    }
}

impl TypedHeaderTrait for ContactHeader {
    fn header_name() -> HeaderName {
        HeaderName::Contact
    }

    fn parse_value(value: &str) -> Result<Self> {
        ContactHeader::parse(value)
    }

    fn render_value(&self) -> String {
        self.render()
    }
}

/// A header in typed form when a model exists, raw otherwise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypedHeader {
    Contact(ContactHeader),
    /// Header without a typed model, kept verbatim
    Other(Header),
}

impl TypedHeader {
    /// Parse a header value under the given name
    pub fn parse(name: &str, value: &str) -> Result<Self> {
        Self::from_header(&Header::new(HeaderName::from_str(name)?, value))
    }

    /// Type an untyped header
    pub fn from_header(header: &Header) -> Result<Self> {
        match header.name {
            HeaderName::Contact => ContactHeader::from_header(header).map(TypedHeader::Contact),
            HeaderName::Other(_) => Ok(TypedHeader::Other(header.clone())),
        }
    }

    pub fn name(&self) -> HeaderName {
        match self {
            TypedHeader::Contact(_) => HeaderName::Contact,
            TypedHeader::Other(h) => h.name.clone(),
        }
    }

    pub fn to_header(&self) -> Header {
        match self {
            TypedHeader::Contact(c) => c.to_header(),
            TypedHeader::Other(h) => h.clone(),
        }
    }

    pub fn as_contact(&self) -> Option<&ContactHeader> {
        match self {
            TypedHeader::Contact(c) => Some(c),
            TypedHeader::Other(_) => None,
        }
    }
}

impl FromStr for TypedHeader {
    type Err = Error;

    /// Parse a full `Name: value` line
    fn from_str(line: &str) -> Result<Self> {
        Self::from_header(&Header::parse_line(line)?)
    }
}

impl fmt::Display for TypedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedHeader::Contact(c) => write!(f, "{}: {}", HeaderName::Contact, c),
            TypedHeader::Other(h) => write!(f, "{}", h),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_contact_by_compact_name() {
        let h = TypedHeader::parse("m", "<sip:a@b>;expires=60").unwrap();
        assert_eq!(h.name(), HeaderName::Contact);
        assert_eq!(h.as_contact().unwrap().first().unwrap().expires(), Some(60));
        assert_eq!(h.to_string(), "Contact: <sip:a@b>;expires=60");
    }

    #[test]
    fn test_other_header_is_kept_raw() {
        let h: TypedHeader = "X-Foo: bar;baz".parse().unwrap();
        assert!(h.as_contact().is_none());
        assert_eq!(h.to_header().value, "bar;baz");
        assert_eq!(h.to_string(), "X-Foo: bar;baz");
    }

    #[test]
    fn test_from_header_name_mismatch() {
        let raw = Header::new(HeaderName::Other("Route".into()), "<sip:p@x;lr>");
        let err = ContactHeader::from_header(&raw).unwrap_err();
        assert_eq!(
            err,
            Error::HeaderMismatch {
                expected: "Contact".into(),
                actual: "Route".into()
            }
        );
    }

    #[test]
    fn test_malformed_contact_fails_whole_header() {
        let err = TypedHeader::parse("Contact", "<sip:a@b>, \"broken").unwrap_err();
        assert_eq!(err, Error::UnterminatedQuote { position: 11 });
    }

    #[test]
    fn test_to_header_roundtrip() {
        let contact = ContactHeader::parse("Bob <sip:bob@biloxi.com>").unwrap();
        let header = contact.to_header();
        assert_eq!(header.name, HeaderName::Contact);
        assert_eq!(ContactHeader::from_header(&header).unwrap(), contact);
    }
}
