//! Media session state: identifiers, the negotiation state machine and
//! out-of-band cancellation

pub mod interrupt;
pub mod session;
pub mod state;

pub use interrupt::InterruptHandle;
pub use session::MediaSession;
pub use state::{FailureReason, SessionId, SessionState};
