//! Reactive Context
//!
//! The reactive context records which binding is currently executing.
//! This enables automatic dependency tracking: when a signal is read,
//! the signal registers the current binding as a subscriber.
//!
//! # Implementation
//!
//! We use a thread-local single slot. Entering a context swaps the new
//! binding into the slot and hands back a guard holding whatever was there
//! before; dropping the guard puts the previous occupant back. Restoration
//! happens on every exit path, unwinding included, so a binding created
//! while another one is running leaves the outer binding tracked.

use std::cell::RefCell;
use std::rc::Rc;

use super::binding::{Binding, BindingInner};
use super::SubscriberId;
use crate::error::Result;

thread_local! {
    static ACTIVE: RefCell<Option<Rc<BindingInner>>> = const { RefCell::new(None) };
}

/// Guard that restores the previous active binding when dropped.
#[must_use = "the context is exited as soon as the guard is dropped"]
pub struct ReactiveContext {
    previous: Option<Rc<BindingInner>>,
}

impl ReactiveContext {
    /// Make `binding` the active binding until the guard is dropped.
    pub(crate) fn enter(binding: Rc<BindingInner>) -> Self {
        let previous = ACTIVE.with(|slot| slot.replace(Some(binding)));
        Self { previous }
    }

    /// Run `binding` with the slot pointing at it, then restore the slot.
    ///
    /// Every signal read during the run subscribes the binding.
    pub fn run(binding: &Binding) -> Result<()> {
        binding.run()
    }

    /// Run `f` with no active binding. Reads inside do not subscribe.
    pub fn untracked<R>(f: impl FnOnce() -> R) -> R {
        let previous = ACTIVE.with(|slot| slot.replace(None));
        let _guard = Self { previous };
        f()
    }

    /// Check if a binding is currently executing.
    pub fn is_active() -> bool {
        ACTIVE.with(|slot| slot.borrow().is_some())
    }

    /// Get the ID of the executing binding, if any.
    pub fn current_subscriber() -> Option<SubscriberId> {
        ACTIVE.with(|slot| slot.borrow().as_ref().map(|binding| binding.id()))
    }

    /// Get the executing binding, if any.
    pub(crate) fn current() -> Option<Rc<BindingInner>> {
        ACTIVE.with(|slot| slot.borrow().clone())
    }
}

impl Drop for ReactiveContext {
    fn drop(&mut self) {
        let previous = self.previous.take();
        // Drop the finished binding outside the slot borrow.
        let finished = ACTIVE.with(|slot| slot.replace(previous));
        drop(finished);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn context_tracks_binding() {
        let binding = Binding::new(|| Ok(()));

        assert!(!ReactiveContext::is_active());
        assert!(ReactiveContext::current_subscriber().is_none());

        {
            let _ctx = ReactiveContext::enter(Rc::clone(binding.inner()));

            assert!(ReactiveContext::is_active());
            assert_eq!(ReactiveContext::current_subscriber(), Some(binding.id()));
        }

        // Slot should be empty again after drop
        assert!(!ReactiveContext::is_active());
        assert!(ReactiveContext::current_subscriber().is_none());
    }

    #[test]
    fn nested_contexts_restore_outer() {
        let outer = Binding::new(|| Ok(()));
        let inner = Binding::new(|| Ok(()));

        {
            let _outer_ctx = ReactiveContext::enter(Rc::clone(outer.inner()));
            assert_eq!(ReactiveContext::current_subscriber(), Some(outer.id()));

            {
                let _inner_ctx = ReactiveContext::enter(Rc::clone(inner.inner()));
                assert_eq!(ReactiveContext::current_subscriber(), Some(inner.id()));
            }

            assert_eq!(ReactiveContext::current_subscriber(), Some(outer.id()));
        }

        assert!(ReactiveContext::current_subscriber().is_none());
    }

    #[test]
    fn untracked_clears_then_restores() {
        let binding = Binding::new(|| Ok(()));
        let _ctx = ReactiveContext::enter(Rc::clone(binding.inner()));

        let seen = ReactiveContext::untracked(ReactiveContext::current_subscriber);
        assert!(seen.is_none());
        assert_eq!(ReactiveContext::current_subscriber(), Some(binding.id()));
    }

    #[test]
    fn run_installs_binding_while_rendering() {
        let observed = Rc::new(Cell::new(None));
        let observed_in = Rc::clone(&observed);
        let binding = Binding::new(move || {
            observed_in.set(ReactiveContext::current_subscriber());
            Ok(())
        });

        ReactiveContext::run(&binding).unwrap();

        assert_eq!(observed.get(), Some(binding.id()));
        assert!(!ReactiveContext::is_active());
    }

    #[test]
    fn slot_is_restored_after_panic() {
        let binding = Binding::new(|| Ok(()));
        let inner = Rc::clone(binding.inner());

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _ctx = ReactiveContext::enter(inner);
            panic!("render failed");
        }));

        assert!(outcome.is_err());
        assert!(!ReactiveContext::is_active());
    }
}
