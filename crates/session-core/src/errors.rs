//! Error types for media session negotiation and transport

use std::time::Duration;

use thiserror::Error;

use crate::sdp::{RoleResolution, SetupRole};
use crate::session::{SessionId, SessionState};

/// Result type for session-core operations
pub type Result<T> = std::result::Result<T, MediaSessionError>;

/// Errors raised while negotiating or connecting a media session
#[derive(Error, Debug)]
pub enum MediaSessionError {
    // Negotiation sequencing
    #[error("local descriptor already set for this negotiation round")]
    AlreadyOffered,

    #[error("no local descriptor has been set")]
    NoLocalOffer,

    #[error("no remote descriptor has been set")]
    NoRemoteAnswer,

    #[error("setup role conflict: local {local}, remote {remote} ({outcome:?})")]
    RoleConflict {
        local: SetupRole,
        remote: SetupRole,
        outcome: RoleResolution,
    },

    #[error("no accept-types in common")]
    NoCommonTypes,

    #[error("invalid setup role: {0}")]
    InvalidRole(String),

    #[error("{operation} not allowed in state {state}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },

    // Transport
    #[error("connect failed after {attempts} attempt(s): {reason}")]
    ConnectError { attempts: u32, reason: String },

    #[error("no inbound connection within {0:?}")]
    AcceptTimeout(Duration),

    #[error("session is not connected")]
    NotConnected,

    #[error("session already has a live connection")]
    AlreadyConnected,

    #[error("setup role is holdconn, no connection may be opened")]
    HoldConnection,

    #[error("connection attempt cancelled")]
    Cancelled,

    #[error("session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("lifecycle error: {0}")]
    Lifecycle(#[from] sigmedia_infra_common::Error),
}

impl MediaSessionError {
    /// Whether the error ends the current negotiation round
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            MediaSessionError::RoleConflict { .. }
                | MediaSessionError::NoCommonTypes
                | MediaSessionError::ConnectError { .. }
                | MediaSessionError::AcceptTimeout(_)
        )
    }

    /// Whether the error is a caller sequencing mistake
    pub fn is_misuse(&self) -> bool {
        matches!(
            self,
            MediaSessionError::AlreadyOffered
                | MediaSessionError::NoLocalOffer
                | MediaSessionError::NoRemoteAnswer
                | MediaSessionError::InvalidState { .. }
                | MediaSessionError::NotConnected
                | MediaSessionError::AlreadyConnected
                | MediaSessionError::HoldConnection
        )
    }
}
