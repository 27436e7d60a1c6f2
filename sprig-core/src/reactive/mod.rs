//! Reactive Primitives
//!
//! This module implements the core reactive system: signals and the
//! bindings that depend on them.
//!
//! # Concepts
//!
//! ## Signals
//!
//! A Signal is a container for mutable state. When a signal's value is read
//! while a binding is running, the signal automatically registers that
//! binding as a dependent. When the signal is written, all dependents run
//! again before the write returns.
//!
//! ## Bindings
//!
//! A Binding is a render callback that pushes reactive state into the DOM,
//! usually into a single text node. It never subscribes explicitly; the
//! reads it performs are its subscriptions.
//!
//! # Implementation Notes
//!
//! The reactive system uses a thread-local tracking slot to detect
//! dependencies. Reads and writes go through explicit `read`/`write`
//! accessors so the subscription side effect is visible at the call site.

mod binding;
mod context;
mod signal;
mod subscriber;

pub use binding::Binding;
pub use context::ReactiveContext;
pub use signal::{signal, Signal};
pub use subscriber::SubscriberId;
