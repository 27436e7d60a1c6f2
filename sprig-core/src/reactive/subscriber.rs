//! Subscriber identities for the reactive system.
//!
//! A subscriber is any computation that depends on reactive values. In this
//! crate that is always a [`Binding`](super::Binding).

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a subscriber.
///
/// Each binding gets a unique ID when created. Signals key their subscriber
/// sets by this ID, which is what makes re-registration idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl SubscriberId {
    /// Generate a new unique subscriber ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "binding#{}", self.0)
    }
}

/// A reactive value a binding can subscribe to.
///
/// Bindings keep weak handles to their sources through this trait so they
/// can withdraw from signals they stopped reading, without knowing the
/// signal's value type.
pub(crate) trait Source {
    /// The source's unique ID.
    fn source_id(&self) -> u64;

    /// Remove the subscriber from this source's subscriber set.
    fn unsubscribe(&self, subscriber: SubscriberId);
}
