//! Object lifecycle substrate
//!
//! Parsed headers, header entries and negotiated connection handles are
//! published once and then read by several callers, possibly on different
//! worker threads. [`Shared`] is the handle those callers hold: creation
//! yields a count of one, [`Shared::acquire`] adds a reference to the same
//! object, and [`Shared::release`] drops one. The payload is torn down
//! (its `Drop` runs) exactly once, by whichever release brings the count to
//! zero. A released handle is left empty, so using it again surfaces as
//! [`Error::Released`](crate::Error::Released) instead of touching freed
//! state.

mod shared;

pub use shared::{ReleaseOutcome, Shared};
