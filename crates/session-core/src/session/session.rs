//! Media session negotiation state machine

use std::path::Path;
use std::sync::Arc;

use sigmedia_infra_common::{ReleaseOutcome, Shared};
use tracing::{debug, info, warn};

use crate::errors::{MediaSessionError, Result};
use crate::sdp::{resolve_role, MediaDescriptor, RoleResolution, SetupRole};
use crate::session::interrupt::InterruptHandle;
use crate::session::state::{FailureReason, SessionId, SessionState};
use crate::transport::chunk::{ChunkTransport, RawChunkTransport};
use crate::transport::connection::MsrpConnection;

/// One MSRP media session: the descriptor triple, the resolved role and the
/// connection once established.
///
/// All methods take `&mut self` or `&self`; a session shared between tasks
/// sits behind a lock (see [`SessionRegistry`](crate::SessionRegistry)) so
/// transitions are applied one at a time.
pub struct MediaSession {
    id: SessionId,
    round: u32,
    state: SessionState,
    local: Option<MediaDescriptor>,
    remote: Option<MediaDescriptor>,
    negotiated: Option<MediaDescriptor>,
    role: Option<SetupRole>,
    connection: Option<Shared<MsrpConnection>>,
    interrupt: InterruptHandle,
    chunks: Arc<dyn ChunkTransport>,
}

impl MediaSession {
    pub fn new() -> Self {
        Self::with_id(SessionId::new())
    }

    pub fn with_id(id: SessionId) -> Self {
        Self {
            id,
            round: 0,
            state: SessionState::Idle,
            local: None,
            remote: None,
            negotiated: None,
            role: None,
            connection: None,
            interrupt: InterruptHandle::new(),
            chunks: Arc::new(RawChunkTransport),
        }
    }

    /// Replace the transport used by `send_text` / `send_file`
    pub fn with_chunk_transport(mut self, chunks: Arc<dyn ChunkTransport>) -> Self {
        self.chunks = chunks;
        self
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Offer/answer round, incremented by every teardown
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn local(&self) -> Option<&MediaDescriptor> {
        self.local.as_ref()
    }

    pub fn remote(&self) -> Option<&MediaDescriptor> {
        self.remote.as_ref()
    }

    pub fn negotiated(&self) -> Option<&MediaDescriptor> {
        self.negotiated.as_ref()
    }

    /// Resolved local role, once negotiated
    pub fn resolved_role(&self) -> Option<SetupRole> {
        self.role
    }

    pub fn is_connected(&self) -> bool {
        self.state == SessionState::Connected
    }

    /// Borrow the live connection
    pub fn connection(&self) -> Option<&MsrpConnection> {
        self.connection.as_ref().and_then(|c| c.get().ok())
    }

    /// Handle for aborting an in-flight connect or accept from another task
    pub fn interrupt_handle(&self) -> InterruptHandle {
        self.interrupt.clone()
    }

    fn transition(&mut self, next: SessionState) {
        debug!(session_id = %self.id, round = self.round, from = %self.state, to = %next, "media session state change");
        self.state = next;
    }

    fn fail(&mut self, reason: FailureReason) {
        warn!(session_id = %self.id, %reason, "media session negotiation failed");
        self.transition(SessionState::Failed(reason));
    }

    /// Set our descriptor: `Idle -> Offered`
    pub fn set_local(&mut self, descriptor: MediaDescriptor) -> Result<()> {
        if self.state != SessionState::Idle {
            return Err(MediaSessionError::AlreadyOffered);
        }
        self.local = Some(descriptor);
        self.transition(SessionState::Offered);
        Ok(())
    }

    /// Set the peer's descriptor: `Offered -> Answered`
    pub fn set_remote(&mut self, descriptor: MediaDescriptor) -> Result<()> {
        match self.state {
            SessionState::Offered => {
                self.remote = Some(descriptor);
                self.transition(SessionState::Answered);
                Ok(())
            }
            SessionState::Idle => Err(MediaSessionError::NoLocalOffer),
            state => Err(MediaSessionError::InvalidState {
                operation: "set_remote",
                state,
            }),
        }
    }

    /// Resolve the setup role and derive the negotiated descriptor:
    /// `Answered -> Negotiated` or `Answered -> Failed`
    pub fn resolve(&mut self) -> Result<SetupRole> {
        let (local, remote) = match (self.state, &self.local, &self.remote) {
            (SessionState::Answered, Some(local), Some(remote)) => (local, remote),
            (SessionState::Idle, ..) => return Err(MediaSessionError::NoLocalOffer),
            (SessionState::Offered, ..) => return Err(MediaSessionError::NoRemoteAnswer),
            (state, ..) => {
                return Err(MediaSessionError::InvalidState {
                    operation: "resolve",
                    state,
                })
            }
        };

        let outcome = resolve_role(local.setup, remote.setup);
        let (local_role, remote_role) = (local.setup, remote.setup);
        let Some(role) = outcome.role() else {
            self.fail(match outcome {
                RoleResolution::Indeterminate => FailureReason::Indeterminate,
                _ => FailureReason::RoleConflict,
            });
            return Err(MediaSessionError::RoleConflict {
                local: local_role,
                remote: remote_role,
                outcome,
            });
        };

        match MediaDescriptor::negotiate(local, remote, role) {
            Ok(negotiated) => {
                info!(
                    session_id = %self.id,
                    local = %local_role,
                    remote = %remote_role,
                    %role,
                    address = %negotiated.address,
                    port = negotiated.port,
                    "media session negotiated"
                );
                self.negotiated = Some(negotiated);
                self.role = Some(role);
                self.interrupt.arm();
                self.transition(SessionState::Negotiated);
                Ok(role)
            }
            Err(e) => {
                self.fail(FailureReason::NoCommonTypes);
                Err(e)
            }
        }
    }

    /// Install a freshly established connection: `Negotiated -> Connected`
    pub(crate) fn install_connection(&mut self, connection: MsrpConnection) -> Result<()> {
        if self.connection.is_some() || self.state == SessionState::Connected {
            return Err(MediaSessionError::AlreadyConnected);
        }
        if self.state != SessionState::Negotiated {
            return Err(MediaSessionError::InvalidState {
                operation: "install_connection",
                state: self.state,
            });
        }
        info!(
            session_id = %self.id,
            local = %connection.local_addr(),
            peer = %connection.peer_addr(),
            "media connection established"
        );
        self.connection = Some(Shared::new(connection));
        self.transition(SessionState::Connected);
        Ok(())
    }

    pub(crate) fn mark_failed(&mut self, reason: FailureReason) {
        self.fail(reason);
    }

    /// Consume a pending interrupt so the next attempt starts clean
    pub(crate) fn rearm_interrupt(&self) {
        self.interrupt.arm();
    }

    /// Release the connection handle, if one is installed
    fn release_connection(&mut self) -> Result<Option<ReleaseOutcome>> {
        let Some(mut handle) = self.connection.take() else {
            return Ok(None);
        };
        let outcome = handle.release()?;
        debug!(session_id = %self.id, ?outcome, "media connection released");
        Ok(Some(outcome))
    }

    /// End the current round: abort any pending attempt, drop the connection
    /// and go back to `Idle` with empty descriptors.
    ///
    /// Returns whether a connection was released.
    pub fn teardown(&mut self) -> Result<bool> {
        self.interrupt.interrupt();
        let released = self.release_connection()?.is_some();
        self.interrupt.arm();

        self.local = None;
        self.remote = None;
        self.negotiated = None;
        self.role = None;
        self.round += 1;
        self.transition(SessionState::Idle);
        Ok(released)
    }

    /// Tear down and immediately offer `local` for the next round
    pub fn renegotiate(&mut self, local: MediaDescriptor) -> Result<()> {
        self.teardown()?;
        self.set_local(local)
    }

    fn live_connection(&self) -> Result<&MsrpConnection> {
        if self.state != SessionState::Connected {
            return Err(MediaSessionError::NotConnected);
        }
        self.connection().ok_or(MediaSessionError::NotConnected)
    }

    /// Send a text body through the chunk transport
    pub async fn send_text(&self, content: &str, content_type: &str) -> Result<()> {
        let conn = self.live_connection()?;
        self.chunks.send_text(conn, content, content_type).await
    }

    /// Send a file through the chunk transport
    pub async fn send_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let conn = self.live_connection()?;
        self.chunks.send_file(conn, path.as_ref()).await
    }
}

impl Default for MediaSession {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MediaSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaSession")
            .field("id", &self.id)
            .field("round", &self.round)
            .field("state", &self.state)
            .field("role", &self.role)
            .field("connection", &self.connection())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc(setup: SetupRole) -> MediaDescriptor {
        MediaDescriptor::new("127.0.0.1", 2855, setup).with_accept_type("text/plain")
    }

    #[test]
    fn test_happy_path_states() {
        let mut session = MediaSession::new();
        assert_eq!(session.state(), SessionState::Idle);

        session.set_local(desc(SetupRole::Actpass)).unwrap();
        assert_eq!(session.state(), SessionState::Offered);

        session.set_remote(desc(SetupRole::Active)).unwrap();
        assert_eq!(session.state(), SessionState::Answered);

        assert_eq!(session.resolve().unwrap(), SetupRole::Passive);
        assert_eq!(session.state(), SessionState::Negotiated);
        assert_eq!(session.resolved_role(), Some(SetupRole::Passive));
        assert_eq!(session.negotiated().unwrap().setup, SetupRole::Passive);
    }

    #[test]
    fn test_sequencing_errors() {
        let mut session = MediaSession::new();
        assert!(matches!(session.set_remote(desc(SetupRole::Active)), Err(MediaSessionError::NoLocalOffer)));
        assert!(matches!(session.resolve(), Err(MediaSessionError::NoLocalOffer)));

        session.set_local(desc(SetupRole::Active)).unwrap();
        assert!(matches!(session.set_local(desc(SetupRole::Active)), Err(MediaSessionError::AlreadyOffered)));
        assert!(matches!(session.resolve(), Err(MediaSessionError::NoRemoteAnswer)));

        session.set_remote(desc(SetupRole::Passive)).unwrap();
        assert!(matches!(
            session.set_remote(desc(SetupRole::Passive)),
            Err(MediaSessionError::InvalidState { operation: "set_remote", state: SessionState::Answered })
        ));

        session.resolve().unwrap();
        assert!(matches!(
            session.resolve(),
            Err(MediaSessionError::InvalidState { operation: "resolve", .. })
        ));
    }

    #[test]
    fn test_conflict_fails_round() {
        let mut session = MediaSession::new();
        session.set_local(desc(SetupRole::Passive)).unwrap();
        session.set_remote(desc(SetupRole::Passive)).unwrap();

        let err = session.resolve().unwrap_err();
        assert!(matches!(
            err,
            MediaSessionError::RoleConflict { outcome: RoleResolution::Conflict, .. }
        ));
        assert_eq!(session.state(), SessionState::Failed(FailureReason::RoleConflict));
        assert!(session.negotiated().is_none());
    }

    #[test]
    fn test_no_common_types_fails_round() {
        let mut session = MediaSession::new();
        session.set_local(desc(SetupRole::Active)).unwrap();
        session
            .set_remote(MediaDescriptor::new("h", 1, SetupRole::Passive).with_accept_type("image/png"))
            .unwrap();
        assert!(matches!(session.resolve(), Err(MediaSessionError::NoCommonTypes)));
        assert_eq!(session.state(), SessionState::Failed(FailureReason::NoCommonTypes));
    }

    #[test]
    fn test_holdconn_stays_negotiated() {
        let mut session = MediaSession::new();
        session.set_local(desc(SetupRole::Active)).unwrap();
        session.set_remote(desc(SetupRole::Holdconn)).unwrap();
        assert_eq!(session.resolve().unwrap(), SetupRole::Holdconn);
        assert_eq!(session.state(), SessionState::Negotiated);
        assert!(session.connection().is_none());
    }

    #[test]
    fn test_negotiation_arms_fresh_token() {
        let mut session = MediaSession::new();
        let handle = session.interrupt_handle();
        handle.interrupt();

        session.set_local(desc(SetupRole::Active)).unwrap();
        session.set_remote(desc(SetupRole::Passive)).unwrap();
        session.resolve().unwrap();
        assert!(!handle.is_interrupted());

        handle.interrupt();
        assert!(handle.is_interrupted());
        session.teardown().unwrap();
        assert!(!handle.is_interrupted());
    }

    #[test]
    fn test_teardown_resets_round() {
        let mut session = MediaSession::new();
        session.set_local(desc(SetupRole::Active)).unwrap();
        session.set_remote(desc(SetupRole::Active)).unwrap();
        let _ = session.resolve();
        assert!(session.state().is_failed());

        assert!(!session.teardown().unwrap());
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.round(), 1);
        assert!(session.local().is_none());

        session.renegotiate(desc(SetupRole::Actpass)).unwrap();
        assert_eq!(session.state(), SessionState::Offered);
        assert_eq!(session.round(), 2);
    }

    #[tokio::test]
    async fn test_send_requires_connection() {
        let mut session = MediaSession::new();
        assert!(matches!(session.send_text("hi", "text/plain").await, Err(MediaSessionError::NotConnected)));

        session.set_local(desc(SetupRole::Active)).unwrap();
        session.set_remote(desc(SetupRole::Passive)).unwrap();
        session.resolve().unwrap();
        assert!(matches!(session.send_file("/dev/null").await, Err(MediaSessionError::NotConnected)));
    }
}
