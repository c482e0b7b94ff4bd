//! # SIP Contact Header
//!
//! The Contact header (RFC 3261 §20.10) lists the addresses at which a user
//! agent can be reached. A header holds one or more entries, or the single
//! wildcard `*` used to remove all registrations:
//!
//! ```text
//! Contact        = ("Contact" / "m" ) HCOLON
//!                  ( STAR / (contact-param *(COMMA contact-param)))
//! contact-param  = (name-addr / addr-spec) *(SEMI contact-params)
//! name-addr      = [ display-name ] LAQUOT addr-spec RAQUOT
//! contact-params = c-p-q / c-p-expires / contact-extension
//! ```
//!
//! Every parameter is kept in declaration order, duplicates included. Only
//! `expires` gets semantic validation: it must be an integer in
//! `0..=2^31-1`. An absent expiry is `None`, which is not the same as `0`.
//!
//! ## Examples
//!
//! ```rust
//! use sigmedia_sip_core::types::contact::{ContactEntry, ContactHeader};
//! use std::str::FromStr;
//!
//! let header = ContactHeader::from_str(
//!     "Alice <sip:alice@x.com>;expires=3600, <sip:bob@y.com>",
//! ).unwrap();
//! assert_eq!(header.len(), 2);
//!
//! let alice = header.entry_at(0).unwrap().address().unwrap();
//! assert_eq!(alice.display_name(), Some("Alice"));
//! assert_eq!(alice.expires(), Some(3600));
//!
//! assert_eq!(
//!     header.to_string(),
//!     "Alice <sip:alice@x.com>;expires=3600, sip:bob@y.com"
//! );
//!
//! let star = ContactHeader::from_str("*").unwrap();
//! assert!(star.is_wildcard());
//! ```

use std::fmt;
use std::str::FromStr;

use ordered_float::NotNan;
use serde::{Deserialize, Serialize};
use sigmedia_infra_common::Shared;

use crate::error::{Error, Result};
use crate::parser::headers::contact::{parse_contact, parse_contact_with, validate_expires};
use crate::parser::quoted::quote;
use crate::parser::token::is_token;
use crate::types::param::{ContactParam, GenericValue};
use crate::types::uri::{AddressSpecParser, Uri};

/// One reachable address with its metadata
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContactAddress {
    display_name: Option<String>,
    uri: Uri,
    expires: Option<u32>,
    params: Vec<ContactParam>,
}

impl ContactAddress {
    pub fn new(uri: Uri) -> Self {
        ContactAddress {
            display_name: None,
            uri,
            expires: None,
            params: Vec::new(),
        }
    }

    pub(crate) fn from_parts(
        display_name: Option<String>,
        uri: Uri,
        expires: Option<u32>,
        params: Vec<ContactParam>,
    ) -> Self {
        ContactAddress {
            display_name,
            uri,
            expires,
            params,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Append a parameter.
    ///
    /// An `expires` parameter is validated and, if it is the first one,
    /// becomes the entry's expiry.
    pub fn with_param(mut self, param: ContactParam) -> Result<Self> {
        if param.is_named("expires") {
            let secs = validate_expires(param.value())?;
            self.expires.get_or_insert(secs);
        }
        self.params.push(param);
        Ok(self)
    }

    /// Set the expiry, rewriting the first `expires` parameter or appending one
    pub fn with_expires(mut self, secs: u32) -> Result<Self> {
        let value = GenericValue::Token(secs.to_string());
        validate_expires(Some(&value))?;

        match self.params.iter_mut().find(|p| p.is_named("expires")) {
            Some(p) => *p = ContactParam::from_parts(p.name().to_string(), Some(value)),
            None => self.params.push(ContactParam::from_parts("expires".to_string(), Some(value))),
        }
        self.expires = Some(secs);
        Ok(self)
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Expiry in seconds; `None` when no `expires` parameter was given
    pub fn expires(&self) -> Option<u32> {
        self.expires
    }

    /// All parameters in declaration order
    pub fn params(&self) -> &[ContactParam] {
        &self.params
    }

    /// First parameter with the given name (case-insensitive)
    pub fn param(&self, name: &str) -> Option<&ContactParam> {
        self.params.iter().find(|p| p.is_named(name))
    }

    /// Every parameter with the given name, in order
    pub fn params_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ContactParam> + 'a {
        self.params.iter().filter(move |p| p.is_named(name))
    }

    /// The first `q` value, if it is a number in `0.0..=1.0`
    pub fn q(&self) -> Option<NotNan<f32>> {
        let raw = self.param("q")?.value_str()?;
        let q = raw.parse::<f32>().ok()?;
        if !(0.0..=1.0).contains(&q) {
            return None;
        }
        NotNan::new(q).ok()
    }

    /// The `+sip.instance` feature tag (RFC 5626)
    pub fn instance(&self) -> Option<&str> {
        self.param("+sip.instance")?.value_str()
    }

    fn needs_brackets(&self) -> bool {
        self.display_name.is_some() || !self.params.is_empty() || self.uri.needs_brackets()
    }
}

/// Whether a display name can be written without quotes
fn is_plain_display_name(name: &str) -> bool {
    !name.is_empty() && name.split(' ').all(is_token)
}

impl fmt::Display for ContactAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.display_name {
            if is_plain_display_name(name) {
                write!(f, "{} ", name)?;
            } else {
                write!(f, "{} ", quote(name))?;
            }
        }
        if self.needs_brackets() {
            write!(f, "<{}>", self.uri)?;
        } else {
            write!(f, "{}", self.uri)?;
        }
        for param in &self.params {
            write!(f, ";{}", param)?;
        }
        Ok(())
    }
}

/// A single element of a Contact header
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactEntry {
    /// `*`, all bindings
    Wildcard,
    Address(ContactAddress),
}

impl ContactEntry {
    pub fn is_wildcard(&self) -> bool {
        matches!(self, ContactEntry::Wildcard)
    }

    pub fn address(&self) -> Option<&ContactAddress> {
        match self {
            ContactEntry::Address(addr) => Some(addr),
            ContactEntry::Wildcard => None,
        }
    }

    pub fn display_name(&self) -> Option<&str> {
        self.address().and_then(ContactAddress::display_name)
    }

    pub fn uri(&self) -> Option<&Uri> {
        self.address().map(ContactAddress::uri)
    }

    pub fn expires(&self) -> Option<u32> {
        self.address().and_then(ContactAddress::expires)
    }

    pub fn params(&self) -> &[ContactParam] {
        self.address().map(ContactAddress::params).unwrap_or(&[])
    }
}

impl From<ContactAddress> for ContactEntry {
    fn from(addr: ContactAddress) -> Self {
        ContactEntry::Address(addr)
    }
}

impl fmt::Display for ContactEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContactEntry::Wildcard => f.write_str("*"),
            ContactEntry::Address(addr) => addr.fmt(f),
        }
    }
}

/// The typed value of a Contact header.
///
/// Never empty, and a wildcard entry is always the only entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContactHeader {
    entries: Vec<ContactEntry>,
}

impl ContactHeader {
    /// Build a header from entries, enforcing the list invariants
    pub fn new(entries: Vec<ContactEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(Error::EmptyHeader);
        }
        if entries.len() > 1 && entries.iter().any(ContactEntry::is_wildcard) {
            return Err(Error::InvalidWildcard);
        }
        Ok(ContactHeader { entries })
    }

    pub fn wildcard() -> Self {
        ContactHeader {
            entries: vec![ContactEntry::Wildcard],
        }
    }

    pub fn single(addr: ContactAddress) -> Self {
        ContactHeader {
            entries: vec![ContactEntry::Address(addr)],
        }
    }

    /// Parse a header value with the default URI parser
    pub fn parse(text: &str) -> Result<Self> {
        parse_contact(text)
    }

    /// Parse a header value, delegating addr-specs to `uri_parser`
    pub fn parse_with(text: &str, uri_parser: &dyn AddressSpecParser) -> Result<Self> {
        parse_contact_with(text, uri_parser)
    }

    /// Parse several Contact header lines of one message into one list
    pub fn parse_lines<'a, I>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut merged: Option<ContactHeader> = None;
        for line in lines {
            let header = parse_contact(line)?;
            merged = Some(match merged {
                Some(acc) => acc.merge(header)?,
                None => header,
            });
        }
        merged.ok_or(Error::EmptyHeader)
    }

    /// Parse and wrap in a shared handle
    pub fn parse_shared(text: &str) -> Result<Shared<ContactHeader>> {
        parse_contact(text).map(Shared::new)
    }

    /// Append the entries of `other`, keeping order
    pub fn merge(mut self, other: ContactHeader) -> Result<Self> {
        if self.is_wildcard() || other.is_wildcard() {
            return Err(Error::InvalidWildcard);
        }
        self.entries.extend(other.entries);
        Ok(self)
    }

    pub fn entries(&self) -> &[ContactEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false` for a constructed header
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self.entries.as_slice(), [ContactEntry::Wildcard])
    }

    pub fn entry_at(&self, index: usize) -> Result<&ContactEntry> {
        self.entries.get(index).ok_or(Error::NotFound {
            index,
            len: self.entries.len(),
        })
    }

    /// The first entry, the contact of a single-valued header
    pub fn first(&self) -> Option<&ContactEntry> {
        self.entries.first()
    }

    /// Address entries, skipping the wildcard
    pub fn addresses(&self) -> impl Iterator<Item = &ContactAddress> {
        self.entries.iter().filter_map(ContactEntry::address)
    }

    /// Hand each entry out as its own shared handle
    pub fn into_shared_entries(self) -> Vec<Shared<ContactEntry>> {
        self.entries.into_iter().map(Shared::new).collect()
    }

    /// Serialized header value
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ContactHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            entry.fmt(f)?;
        }
        Ok(())
    }
}

impl FromStr for ContactHeader {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_contact(s)
    }
}
