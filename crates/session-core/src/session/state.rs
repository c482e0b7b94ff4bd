//! Session identifiers and negotiation states

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier of a media session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a negotiation round ended in `Failed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureReason {
    /// Both sides asked for the same direction
    RoleConflict,
    /// `actpass` met `actpass`
    Indeterminate,
    NoCommonTypes,
    /// Outbound connect budget exhausted
    ConnectError,
    /// Nobody connected to the listener in time
    AcceptTimeout,
    /// Socket setup failed outright
    Io,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureReason::RoleConflict => "role conflict",
            FailureReason::Indeterminate => "indeterminate role",
            FailureReason::NoCommonTypes => "no common types",
            FailureReason::ConnectError => "connect error",
            FailureReason::AcceptTimeout => "accept timeout",
            FailureReason::Io => "i/o error",
        };
        f.write_str(s)
    }
}

/// Negotiation and connection state of a media session
///
/// ```text
/// Idle -> Offered -> Answered -> Negotiated -> Connected
///                         \            \
///                          `-> Failed   `-> Failed
/// ```
///
/// A `holdconn` resolution stays in `Negotiated` without a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    Idle,
    /// Local descriptor set
    Offered,
    /// Remote descriptor set
    Answered,
    /// Role and negotiated descriptor resolved
    Negotiated,
    /// A live connection is installed
    Connected,
    Failed(FailureReason),
}

impl SessionState {
    pub fn is_failed(&self) -> bool {
        matches!(self, SessionState::Failed(_))
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => f.write_str("idle"),
            SessionState::Offered => f.write_str("offered"),
            SessionState::Answered => f.write_str("answered"),
            SessionState::Negotiated => f.write_str("negotiated"),
            SessionState::Connected => f.write_str("connected"),
            SessionState::Failed(reason) => write!(f, "failed ({})", reason),
        }
    }
}
