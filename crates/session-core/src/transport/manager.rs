//! Opens the TCP connection a negotiated session calls for
//!
//! The resolved setup role decides the direction: `active` dials the remote
//! descriptor's address with a bounded retry budget, `passive` listens on
//! the local descriptor's address and waits for one inbound connection.
//! Both waits observe the session's [`InterruptHandle`](crate::InterruptHandle).

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::{lookup_host, TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::TransportConfig;
use crate::errors::{MediaSessionError, Result};
use crate::sdp::SetupRole;
use crate::session::{FailureReason, MediaSession, SessionId, SessionState};
use crate::transport::connection::MsrpConnection;

/// Progress notifications emitted while establishing connections
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// A passive session is accepting on `local`
    Listening { session_id: SessionId, local: SocketAddr },
    /// One outbound attempt failed and another will follow
    AttemptFailed {
        session_id: SessionId,
        attempt: u32,
        reason: String,
    },
    Connected {
        session_id: SessionId,
        local: SocketAddr,
        peer: SocketAddr,
    },
    Failed { session_id: SessionId, reason: String },
}

/// Establishes connections for negotiated sessions
#[derive(Debug, Clone)]
pub struct ConnectionManager {
    config: TransportConfig,
    events: mpsc::Sender<ConnectionEvent>,
}

impl ConnectionManager {
    /// Validate `config` and return the manager with its event stream
    pub fn new(config: TransportConfig) -> Result<(Self, mpsc::Receiver<ConnectionEvent>)> {
        config.validate()?;
        let (events, rx) = mpsc::channel(config.event_channel_capacity);
        Ok((Self { config, events }, rx))
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    fn emit(&self, event: ConnectionEvent) {
        // Observers that fall behind lose events; establishment never blocks on them
        if let Err(e) = self.events.try_send(event) {
            debug!("connection event dropped: {}", e);
        }
    }

    /// Open the connection for `session` according to its resolved role.
    ///
    /// On success the session is `Connected` and the local address of the
    /// new socket is returned. An exhausted connect budget or an accept
    /// timeout fails the round. A cancelled attempt leaves the session
    /// `Negotiated` so it can be retried; an interrupt that arrives before
    /// the attempt starts cancels it just the same.
    pub async fn establish(&self, session: &mut MediaSession) -> Result<SocketAddr> {
        let state = session.state();
        if state == SessionState::Connected {
            return Err(MediaSessionError::AlreadyConnected);
        }
        if state != SessionState::Negotiated {
            return Err(MediaSessionError::InvalidState {
                operation: "establish",
                state,
            });
        }
        let (Some(role), Some(target)) = (session.resolved_role(), session.negotiated()) else {
            return Err(MediaSessionError::InvalidState {
                operation: "establish",
                state,
            });
        };
        let (host, port) = (target.address.clone(), target.port);
        let session_id = session.id();

        if role == SetupRole::Holdconn {
            return Err(MediaSessionError::HoldConnection);
        }

        // Armed when the session entered Negotiated; an interrupt issued since
        // then cancels this attempt before any socket is opened
        let token = session.interrupt_handle().token();
        let outcome = if token.is_cancelled() {
            Err(MediaSessionError::Cancelled)
        } else if role == SetupRole::Passive {
            self.listen(session_id, &host, port, &token).await
        } else {
            self.dial(session_id, &host, port, &token).await
        };

        match outcome {
            Ok(connection) => {
                let local = connection.local_addr();
                let peer = connection.peer_addr();
                session.install_connection(connection)?;
                self.emit(ConnectionEvent::Connected {
                    session_id,
                    local,
                    peer,
                });
                Ok(local)
            }
            Err(MediaSessionError::Cancelled) => {
                info!(session_id = %session_id, "connection attempt cancelled");
                session.rearm_interrupt();
                Err(MediaSessionError::Cancelled)
            }
            Err(e) => {
                let reason = match &e {
                    MediaSessionError::ConnectError { .. } => FailureReason::ConnectError,
                    MediaSessionError::AcceptTimeout(_) => FailureReason::AcceptTimeout,
                    _ => FailureReason::Io,
                };
                session.mark_failed(reason);
                self.emit(ConnectionEvent::Failed {
                    session_id,
                    reason: e.to_string(),
                });
                Err(e)
            }
        }
    }

    async fn dial(
        &self,
        session_id: SessionId,
        host: &str,
        port: u16,
        token: &CancellationToken,
    ) -> Result<MsrpConnection> {
        let max_attempts = self.config.connect_attempts;
        let mut last_error = String::new();

        for attempt in 1..=max_attempts {
            let result = tokio::select! {
                _ = token.cancelled() => return Err(MediaSessionError::Cancelled),
                r = self.connect_once(host, port) => r,
            };

            match result {
                Ok(stream) => {
                    debug!(session_id = %session_id, attempt, "outbound connect succeeded");
                    return Ok(MsrpConnection::from_stream(stream)?);
                }
                Err(e) if is_transient(&e) => {
                    warn!(session_id = %session_id, attempt, max_attempts, error = %e, "outbound connect failed");
                    last_error = e.to_string();
                    if attempt == max_attempts {
                        break;
                    }
                    self.emit(ConnectionEvent::AttemptFailed {
                        session_id,
                        attempt,
                        reason: last_error.clone(),
                    });
                    tokio::select! {
                        _ = token.cancelled() => return Err(MediaSessionError::Cancelled),
                        _ = tokio::time::sleep(self.config.retry_delay()) => {}
                    }
                }
                Err(e) => {
                    return Err(MediaSessionError::ConnectError {
                        attempts: attempt,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Err(MediaSessionError::ConnectError {
            attempts: max_attempts,
            reason: last_error,
        })
    }

    async fn connect_once(&self, host: &str, port: u16) -> io::Result<TcpStream> {
        let timeout = self.config.connect_timeout();
        let addrs: Vec<SocketAddr> = lookup_host((host, port)).await?.collect();
        let mut last = io::Error::new(io::ErrorKind::NotFound, format!("{host}:{port} did not resolve"));
        for addr in addrs {
            match tokio::time::timeout(timeout, TcpStream::connect(addr)).await {
                Ok(Ok(stream)) => return Ok(stream),
                Ok(Err(e)) => last = e,
                Err(_) => last = io::Error::new(io::ErrorKind::TimedOut, format!("connect to {addr} timed out")),
            }
        }
        Err(last)
    }

    async fn listen(
        &self,
        session_id: SessionId,
        host: &str,
        port: u16,
        token: &CancellationToken,
    ) -> Result<MsrpConnection> {
        let listener = TcpListener::bind((host, port)).await?;
        let local = listener.local_addr()?;
        info!(session_id = %session_id, %local, "waiting for inbound media connection");
        self.emit(ConnectionEvent::Listening { session_id, local });

        let accept_timeout = self.config.accept_timeout();
        let accepted = tokio::select! {
            _ = token.cancelled() => return Err(MediaSessionError::Cancelled),
            r = tokio::time::timeout(accept_timeout, listener.accept()) => r,
        };

        // The listener is dropped on return, so only this one peer is served
        match accepted {
            Ok(Ok((stream, peer))) => {
                debug!(session_id = %session_id, %peer, "accepted inbound media connection");
                Ok(MsrpConnection::from_stream(stream)?)
            }
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(MediaSessionError::AcceptTimeout(accept_timeout)),
        }
    }
}

fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::TimedOut
            | io::ErrorKind::NotFound
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_errors() {
        assert!(is_transient(&io::Error::from(io::ErrorKind::ConnectionRefused)));
        assert!(is_transient(&io::Error::from(io::ErrorKind::TimedOut)));
        assert!(!is_transient(&io::Error::from(io::ErrorKind::PermissionDenied)));
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = TransportConfig::default().with_connect_attempts(0);
        assert!(matches!(ConnectionManager::new(config), Err(MediaSessionError::Config(_))));
    }
}
