use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::errors::{Error, Result};

/// What a call to [`Shared::release`] did to the underlying object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// This was the last reference; the payload has been dropped
    Destroyed,
    /// Other handles still reference the payload
    Retained,
}

/// Atomically reference-counted handle with explicit release.
///
/// Payloads are immutable once published; `Shared` only hands out shared
/// borrows. Types that need interior mutation carry their own lock.
pub struct Shared<T> {
    inner: Option<Arc<T>>,
}

impl<T> Shared<T> {
    /// Publish `payload` with a reference count of one
    pub fn new(payload: T) -> Self {
        Shared {
            inner: Some(Arc::new(payload)),
        }
    }

    /// Take another reference to the same object
    pub fn acquire(&self) -> Result<Shared<T>> {
        let arc = self.inner.as_ref().ok_or(Error::Released)?;
        Ok(Shared {
            inner: Some(Arc::clone(arc)),
        })
    }

    /// Drop this handle's reference and leave the handle empty.
    ///
    /// Releasing an already-empty handle is a programming error and fails
    /// with [`Error::Released`].
    pub fn release(&mut self) -> Result<ReleaseOutcome> {
        let arc = self.inner.take().ok_or(Error::Released)?;
        // into_inner hands the payload to exactly one of any racing releasers
        match Arc::into_inner(arc) {
            Some(payload) => {
                drop(payload);
                trace!("shared object destroyed");
                Ok(ReleaseOutcome::Destroyed)
            }
            None => Ok(ReleaseOutcome::Retained),
        }
    }

    /// Borrow the payload
    pub fn get(&self) -> Result<&T> {
        self.inner.as_deref().ok_or(Error::Released)
    }

    /// Number of live handles on the object, or 0 for an empty handle
    pub fn ref_count(&self) -> usize {
        self.inner.as_ref().map(Arc::strong_count).unwrap_or(0)
    }

    /// Whether this handle has been released
    pub fn is_released(&self) -> bool {
        self.inner.is_none()
    }

    /// Whether two handles reference the same object
    pub fn ptr_eq(&self, other: &Shared<T>) -> bool {
        match (&self.inner, &other.inner) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Some(arc) => f
                .debug_struct("Shared")
                .field("refs", &Arc::strong_count(arc))
                .field("payload", arc)
                .finish(),
            None => f.write_str("Shared(<released>)"),
        }
    }
}
