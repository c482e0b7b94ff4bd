//! MSRP media session negotiation and connection setup
//!
//! A [`MediaSession`] walks one offer/answer round at a time:
//!
//! ```text
//! Idle -> Offered -> Answered -> Negotiated -> Connected
//!                        \            \
//!                         `-> Failed   `-> Failed
//! ```
//!
//! [`sdp`] resolves the RFC 4145 `setup` roles and intersects
//! `accept-types`; [`transport`] opens the resulting TCP connection
//! (dialing when `active`, listening when `passive`) and hands payloads to
//! a pluggable [`ChunkTransport`]. [`SessionRegistry`] keeps many sessions
//! apart when they are driven concurrently.
//!
//! ```rust
//! use sigmedia_session_core::prelude::*;
//!
//! let mut session = MediaSession::new();
//! session
//!     .set_local(MediaDescriptor::new("127.0.0.1", 2855, SetupRole::Actpass).with_accept_type("text/plain"))
//!     .unwrap();
//! session
//!     .set_remote(MediaDescriptor::new("192.0.2.7", 2855, SetupRole::Active).with_accept_type("*"))
//!     .unwrap();
//! assert_eq!(session.resolve().unwrap(), SetupRole::Passive);
//! assert_eq!(session.negotiated().unwrap().accept_types, vec!["text/plain".to_string()]);
//! ```

pub mod config;
pub mod coordinator;
pub mod errors;
pub mod sdp;
pub mod session;
pub mod transport;

pub use config::TransportConfig;
pub use coordinator::SessionRegistry;
pub use errors::{MediaSessionError, Result};
pub use sdp::{MediaDescriptor, RoleResolution, SetupRole};
pub use session::{FailureReason, InterruptHandle, MediaSession, SessionId, SessionState};
pub use transport::{ChunkTransport, ConnectionEvent, ConnectionManager, MsrpConnection, RawChunkTransport};

/// Re-export of common types for easier use
pub mod prelude {
    pub use crate::config::TransportConfig;
    pub use crate::coordinator::{registry::SessionHandle, SessionRegistry};
    pub use crate::errors::{MediaSessionError, Result};
    pub use crate::sdp::{intersect_accept_types, negotiate_role, resolve_role, MediaDescriptor, RoleResolution, SetupRole};
    pub use crate::session::{FailureReason, InterruptHandle, MediaSession, SessionId, SessionState};
    pub use crate::transport::{ChunkTransport, ConnectionEvent, ConnectionManager, MsrpConnection, RawChunkTransport};
}
