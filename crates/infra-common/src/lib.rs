//! Shared infrastructure for the sigmedia crates.
//!
//! - [`lifecycle`]: atomically reference-counted handles for parsed and
//!   negotiated objects that are shared across concurrent callers
//! - [`errors`]: infrastructure error type and context helpers
//! - [`logging`]: `tracing` subscriber setup
//! - [`config`]: TOML configuration loading

pub mod config;
pub mod errors;
pub mod lifecycle;
pub mod logging;

pub use errors::{Error, Result};
pub use lifecycle::{ReleaseOutcome, Shared};
