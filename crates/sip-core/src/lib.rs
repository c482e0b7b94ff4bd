//! SIP header grammar and typed header models for the sigmedia stack
//!
//! This crate turns raw SIP header text into typed values and back. The
//! [`parser`] module holds the RFC 3261 grammar building blocks and the
//! list/parameter tokenizer shared by comma-separated headers; [`types`]
//! holds the models, with the Contact header as the fully typed member of
//! the [`TypedHeader`](types::TypedHeader) family.
//!
//! ```rust
//! use sigmedia_sip_core::prelude::*;
//!
//! let header: TypedHeader = "m: \"Alice\" <sip:alice@atlanta.com>;expires=3600".parse().unwrap();
//! let contact = header.as_contact().unwrap();
//! assert_eq!(contact.first().unwrap().expires(), Some(3600));
//! assert_eq!(header.to_string(), "Contact: Alice <sip:alice@atlanta.com>;expires=3600");
//! ```

pub mod error;
pub mod parser;
pub mod types;

pub use error::{Error, Result};

/// Re-export of common types for easier use
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::parser::{parse_contact, parse_contact_with, tokenize, ValueSegment};
    pub use crate::types::{
        AddressSpecParser, ContactAddress, ContactEntry, ContactHeader, ContactParam,
        DefaultAddressSpecParser, GenericValue, Header, HeaderName, Scheme, TypedHeader,
        TypedHeaderTrait, Uri,
    };
}
