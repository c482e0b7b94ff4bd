//! Out-of-band cancellation of connection attempts

use std::sync::Arc;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

/// Aborts the connect or accept a session is waiting on.
///
/// Connection setup holds the session mutably for its whole duration, so
/// another task cannot reach the session to stop it. Clone this handle
/// before starting the attempt and call [`interrupt`](Self::interrupt) from
/// anywhere.
///
/// The session arms a fresh token each time it enters `Negotiated` and
/// after an attempt has been cancelled. An interrupt issued while the
/// session is negotiated is therefore never lost: it aborts the attempt in
/// flight, or the next one before it opens a socket.
#[derive(Debug, Clone, Default)]
pub struct InterruptHandle {
    slot: Arc<Mutex<CancellationToken>>,
}

impl InterruptHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the current attempt, or the next one if none is running
    pub fn interrupt(&self) {
        self.slot.lock().cancel();
    }

    /// Whether the current token has been cancelled
    pub fn is_interrupted(&self) -> bool {
        self.slot.lock().is_cancelled()
    }

    /// Install a fresh token, discarding any earlier interrupt
    pub(crate) fn arm(&self) {
        *self.slot.lock() = CancellationToken::new();
    }

    /// The current token, as seen by an attempt about to start
    pub(crate) fn token(&self) -> CancellationToken {
        self.slot.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interrupt_cancels_current_token() {
        let handle = InterruptHandle::new();
        let token = handle.token();
        assert!(!token.is_cancelled());

        handle.clone().interrupt();
        assert!(token.is_cancelled());
        assert!(handle.is_interrupted());
    }

    #[test]
    fn test_interrupt_before_attempt_is_kept() {
        let handle = InterruptHandle::new();
        handle.interrupt();
        assert!(handle.token().is_cancelled());
    }

    #[test]
    fn test_arm_clears_stale_interrupt() {
        let handle = InterruptHandle::new();
        let stale = handle.token();
        handle.interrupt();
        handle.arm();
        assert!(stale.is_cancelled());
        assert!(!handle.token().is_cancelled());
        assert!(!handle.is_interrupted());
    }
}
