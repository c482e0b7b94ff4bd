//! Error types for SIP header parsing

use thiserror::Error;

/// Result alias for sip-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while tokenizing, parsing or converting SIP headers.
///
/// Every variant is local to one parse call: the caller discards the
/// malformed header and decides what that means for the enclosing message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A `"` was opened and never closed
    #[error("unterminated quoted string starting at byte {position}")]
    UnterminatedQuote { position: usize },

    /// A `<` was opened and never closed
    #[error("unterminated angle bracket starting at byte {position}")]
    UnterminatedAngleBracket { position: usize },

    /// The address part was missing, malformed, or refused by the URI parser
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The `expires` parameter is not an integer in 0..=2^31-1
    #[error("invalid expires value: {0}")]
    InvalidExpires(String),

    /// The header value contained no entries
    #[error("empty header value")]
    EmptyHeader,

    /// `*` combined with other entries or parameters
    #[error("wildcard contact must be the only entry and carry no parameters")]
    InvalidWildcard,

    /// A `;key[=value]` segment that does not follow generic-param syntax
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// An unquoted display name containing non-token characters
    #[error("invalid display name: {0}")]
    InvalidDisplayName(String),

    /// Index lookup past the end of the entry list
    #[error("no entry at index {index} (header has {len})")]
    NotFound { index: usize, len: usize },

    /// Typed conversion attempted from a header with another name
    #[error("expected {expected} header, got {actual}")]
    HeaderMismatch { expected: String, actual: String },

    /// Any other grammar violation
    #[error("parse error: {0}")]
    ParseError(String),
}

impl Error {
    /// Whether the error comes from the grammar itself rather than a lookup or conversion
    pub fn is_grammar_error(&self) -> bool {
        !matches!(self, Error::NotFound { .. } | Error::HeaderMismatch { .. })
    }
}
