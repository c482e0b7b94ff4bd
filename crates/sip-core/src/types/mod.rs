//! Typed header models

pub mod contact;
pub mod headers;
pub mod param;
pub mod uri;

pub use contact::{ContactAddress, ContactEntry, ContactHeader};
pub use headers::{Header, HeaderName, TypedHeader, TypedHeaderTrait};
pub use param::{ContactParam, GenericValue};
pub use uri::{AddressSpecParser, DefaultAddressSpecParser, Scheme, Uri};
