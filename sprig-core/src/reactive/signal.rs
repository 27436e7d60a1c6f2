//! Signal Implementation
//!
//! A Signal is the fundamental reactive primitive. It holds a value and
//! tracks which bindings depend on it.
//!
//! # How Signals Work
//!
//! 1. When a signal is read while a binding is running, the signal
//!    registers that binding as a subscriber. Registering twice is a no-op.
//!
//! 2. When a signal is written, every subscriber runs again, in the order
//!    it first subscribed, before `write` returns.
//!
//! 3. There is no equality check: writing the current value still notifies.
//!
//! # Threading
//!
//! Signals are single-threaded. The value lives in a `RefCell` and the
//! handle is an `Rc`, matching the browser main thread the view layer runs
//! on.

use std::cell::RefCell;
use std::fmt::{self, Debug};
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::trace;

use super::binding::BindingInner;
use super::context::ReactiveContext;
use super::subscriber::{Source, SubscriberId};
use crate::error::{Result, SprigError};

/// Counter for generating unique signal IDs.
static SIGNAL_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

fn next_signal_id() -> u64 {
    SIGNAL_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

struct SignalInner<T> {
    id: u64,
    value: RefCell<T>,

    /// Subscribed bindings in registration order. Weak, so a signal never
    /// keeps a binding alive.
    subscribers: RefCell<IndexMap<SubscriberId, Weak<BindingInner>>>,
}

impl<T> Source for SignalInner<T> {
    fn source_id(&self) -> u64 {
        self.id
    }

    fn unsubscribe(&self, subscriber: SubscriberId) {
        // shift_remove keeps the remaining subscribers in order.
        self.subscribers.borrow_mut().shift_remove(&subscriber);
    }
}

/// A reactive value cell.
///
/// # Example
///
/// ```rust
/// use sprig_core::reactive::signal;
///
/// let count = signal(0);
/// assert_eq!(count.read(), 0);
///
/// count.write(5)?;
/// assert_eq!(count.read(), 5);
/// # Ok::<(), sprig_core::SprigError>(())
/// ```
pub struct Signal<T: 'static> {
    inner: Rc<SignalInner<T>>,
}

/// Create a new signal holding `initial`.
pub fn signal<T: 'static>(initial: T) -> Signal<T> {
    Signal::new(initial)
}

impl<T: 'static> Signal<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(SignalInner {
                id: next_signal_id(),
                value: RefCell::new(value),
                subscribers: RefCell::new(IndexMap::new()),
            }),
        }
    }

    /// Get the signal's unique ID.
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Borrow the current value, subscribing the running binding.
    ///
    /// The value stays borrowed while `f` runs, so writing this signal from
    /// inside `f` fails with [`SprigError::SignalBorrowed`].
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.track();
        f(&self.inner.value.borrow())
    }

    /// Set a new value and run every subscriber.
    ///
    /// Returns the first error a subscriber produced; later subscribers
    /// are not run in that case.
    pub fn write(&self, value: T) -> Result<()> {
        {
            let mut slot = self
                .inner
                .value
                .try_borrow_mut()
                .map_err(|_| SprigError::SignalBorrowed {
                    signal: self.inner.id,
                })?;
            *slot = value;
        }
        self.notify()
    }

    /// Replace the value with `f(current)` and notify.
    ///
    /// `f` sees the value borrowed; a write to this signal from inside `f`
    /// fails with [`SprigError::SignalBorrowed`].
    pub fn update(&self, f: impl FnOnce(&T) -> T) -> Result<()> {
        let next = f(&self.inner.value.borrow());
        self.write(next)
    }

    /// Number of live bindings subscribed to this signal.
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscribers
            .borrow()
            .values()
            .filter(|binding| binding.strong_count() > 0)
            .count()
    }

    pub fn has_subscriber(&self, id: SubscriberId) -> bool {
        self.inner.subscribers.borrow().contains_key(&id)
    }

    fn track(&self) {
        let Some(binding) = ReactiveContext::current() else {
            return;
        };

        self.inner
            .subscribers
            .borrow_mut()
            .entry(binding.id())
            .or_insert_with(|| Rc::downgrade(&binding));

        let source: Weak<dyn Source> = Rc::downgrade(&self.inner) as Weak<dyn Source>;
        binding.record_source(self.inner.id, source);
        trace!(signal = self.inner.id, binding = %binding.id(), "tracked read");
    }

    fn notify(&self) -> Result<()> {
        // Snapshot so subscribers can re-read (and re-subscribe) freely.
        let subscribers: SmallVec<[Weak<BindingInner>; 4]> =
            self.inner.subscribers.borrow().values().cloned().collect();
        trace!(signal = self.inner.id, subscribers = subscribers.len(), "signal write");

        for subscriber in subscribers {
            if let Some(binding) = subscriber.upgrade() {
                BindingInner::execute(&binding)?;
            }
        }
        Ok(())
    }
}

impl<T: Clone + 'static> Signal<T> {
    /// Get the current value, subscribing the running binding.
    pub fn read(&self) -> T {
        self.with(T::clone)
    }

    /// Get the current value without subscribing anything.
    pub fn read_untracked(&self) -> T {
        self.inner.value.borrow().clone()
    }
}

impl<T: 'static> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Debug + 'static> Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("id", &self.inner.id)
            .field("value", &*self.inner.value.borrow())
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
