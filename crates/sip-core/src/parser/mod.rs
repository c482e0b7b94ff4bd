//! Grammar building blocks for SIP header values
//!
//! The lower modules are small `nom` parsers over bytes following the
//! RFC 3261 §25.1 basic rules. [`tokenizer`] splits list-valued header
//! values into entries and parameter segments, and [`headers`] turns those
//! segments into typed header models.

pub mod headers;
pub mod quoted;
pub mod separators;
pub mod token;
pub mod tokenizer;
pub mod utils;
pub mod whitespace;

/// Parser result over raw header bytes
pub type ParseResult<'a, O> = nom::IResult<&'a [u8], O>;

pub use headers::contact::{parse_contact, parse_contact_with};
pub use tokenizer::{tokenize, tokenize_with, ValueGrammar, ValueSegment};
