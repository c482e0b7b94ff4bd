//! Header names, untyped headers and the typed header family

mod header;
mod header_name;
mod typed_header;

pub use header::Header;
pub use header_name::HeaderName;
pub use typed_header::{TypedHeader, TypedHeaderTrait};
