use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::errors::{MediaSessionError, Result};
use crate::session::{InterruptHandle, MediaSession, SessionId};

/// A session as stored in the registry; lock it to drive transitions
pub type SessionHandle = Arc<Mutex<MediaSession>>;

#[derive(Debug)]
struct Entry {
    session: SessionHandle,
    // Reachable without the session lock, which an attempt holds throughout
    interrupt: InterruptHandle,
}

/// Tracks live sessions by id.
///
/// Each session sits behind its own async mutex, so operations on one
/// session are applied one at a time while distinct sessions proceed in
/// parallel.
#[derive(Debug, Default, Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<SessionId, Entry>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and register a fresh idle session
    pub async fn create(&self) -> (SessionId, SessionHandle) {
        let session = MediaSession::new();
        let id = session.id();
        let handle = self.insert(session).await;
        (id, handle)
    }

    /// Register an existing session, replacing any with the same id
    pub async fn insert(&self, session: MediaSession) -> SessionHandle {
        let id = session.id();
        let interrupt = session.interrupt_handle();
        let handle = Arc::new(Mutex::new(session));
        let entry = Entry {
            session: Arc::clone(&handle),
            interrupt,
        };
        self.sessions.write().await.insert(id, entry);
        debug!(session_id = %id, "session registered");
        handle
    }

    pub async fn get(&self, id: &SessionId) -> Option<SessionHandle> {
        self.sessions.read().await.get(id).map(|e| Arc::clone(&e.session))
    }

    /// Interrupt handle of a registered session, usable while it is locked
    pub async fn interrupt_handle(&self, id: &SessionId) -> Option<InterruptHandle> {
        self.sessions.read().await.get(id).map(|e| e.interrupt.clone())
    }

    /// Unregister without touching the session's state
    pub async fn remove(&self, id: &SessionId) -> Option<SessionHandle> {
        self.sessions.write().await.remove(id).map(|e| e.session)
    }

    /// Unregister and tear down the session, releasing its connection.
    ///
    /// A connect or accept in progress is aborted first, so this does not
    /// wait out its timeout.
    pub async fn close(&self, id: &SessionId) -> Result<()> {
        let entry = self
            .sessions
            .write()
            .await
            .remove(id)
            .ok_or(MediaSessionError::SessionNotFound(*id))?;
        entry.interrupt.interrupt();
        let released = entry.session.lock().await.teardown()?;
        debug!(session_id = %id, released, "session closed");
        Ok(())
    }

    pub async fn list(&self) -> Vec<SessionId> {
        self.sessions.read().await.keys().copied().collect()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionState;

    #[tokio::test]
    async fn test_create_get_close() {
        let registry = SessionRegistry::new();
        let (id, handle) = registry.create().await;
        assert_eq!(registry.len().await, 1);
        assert!(registry.get(&id).await.is_some());
        assert_eq!(registry.list().await, vec![id]);

        registry.close(&id).await.unwrap();
        assert!(registry.is_empty().await);
        let session = handle.lock().await;
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.round(), 1);
    }

    #[tokio::test]
    async fn test_interrupt_handle_without_lock() {
        let registry = SessionRegistry::new();
        let (id, handle) = registry.create().await;
        let _guard = handle.lock().await;

        let interrupt = registry.interrupt_handle(&id).await.unwrap();
        interrupt.interrupt();
        assert!(interrupt.is_interrupted());
        assert!(registry.interrupt_handle(&SessionId::new()).await.is_none());
    }

    #[tokio::test]
    async fn test_close_unknown_session() {
        let registry = SessionRegistry::new();
        let id = SessionId::new();
        assert!(matches!(
            registry.close(&id).await,
            Err(MediaSessionError::SessionNotFound(missing)) if missing == id
        ));
    }
}
