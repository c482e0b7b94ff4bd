use thiserror::Error;

/// Result alias for infra-common operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the shared infrastructure
#[derive(Error, Debug)]
pub enum Error {
    /// A handle was used after it was released
    #[error("handle used after release")]
    Released,

    /// Invalid or unreadable configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O failure while loading configuration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Free-form error with attached context
    #[error("{0}")]
    Custom(String),
}
