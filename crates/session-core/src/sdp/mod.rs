//! Session description pieces consumed by the negotiation engine
//!
//! SDP text parsing happens elsewhere; this module works on the already
//! parsed `m=message` section: its address, port, `setup` role,
//! `accept-types` and passthrough attributes.

pub mod descriptor;
pub mod setup;

pub use descriptor::{intersect_accept_types, MediaDescriptor};
pub use setup::{negotiate_role, resolve_role, RoleResolution, SetupRole, RESOLUTION_TABLE};
