//! Bookkeeping for many concurrent media sessions

pub mod registry;

pub use registry::SessionRegistry;
