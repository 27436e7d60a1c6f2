//! Binding Implementation
//!
//! A Binding is a side-effecting render callback that re-runs whenever a
//! signal it read changes. Bindings are how reactive values reach the DOM:
//! the element builder creates one per reactive text node.
//!
//! # How Bindings Work
//!
//! 1. When installed, the binding runs its render function once inside a
//!    reactive context. Every signal read during that run subscribes it.
//!
//! 2. When any of those signals is written, the signal runs the binding
//!    again, synchronously, before the write returns.
//!
//! 3. After each successful run the binding withdraws from every signal it
//!    read last time but not this time. Signals read again keep the binding
//!    where it already sits in their subscriber order.
//!
//! # Ownership
//!
//! Signals only hold weak references to bindings. A text binding is owned
//! by the node it updates, and holds that node weakly in turn, so dropping
//! the tree drops its bindings and unsubscribes them.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::{debug, error, trace};

use super::context::ReactiveContext;
use super::subscriber::{Source, SubscriberId};
use crate::dom::Node;
use crate::error::{Result, SprigError};

type RenderFn = dyn Fn() -> Result<()>;

pub(crate) struct BindingInner {
    id: SubscriberId,
    render: Box<RenderFn>,

    /// Set while the render function is on the stack.
    running: Cell<bool>,

    run_count: Cell<usize>,

    /// Signals this binding is subscribed to, keyed by signal ID.
    sources: RefCell<IndexMap<u64, Weak<dyn Source>>>,

    /// Signal IDs read during the current run.
    touched: RefCell<SmallVec<[u64; 4]>>,
}

/// Lowers the running flag when the run ends, however it ends.
struct RunningFlag<'a>(&'a Cell<bool>);

impl<'a> RunningFlag<'a> {
    fn raise(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for RunningFlag<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl BindingInner {
    pub(crate) fn id(&self) -> SubscriberId {
        self.id
    }

    /// Record that the current run read `source_id`.
    pub(crate) fn record_source(&self, source_id: u64, source: Weak<dyn Source>) {
        self.sources.borrow_mut().entry(source_id).or_insert(source);

        let mut touched = self.touched.borrow_mut();
        if !touched.contains(&source_id) {
            touched.push(source_id);
        }
    }

    pub(crate) fn execute(this: &Rc<Self>) -> Result<()> {
        if this.running.get() {
            error!(binding = %this.id, "reactive cycle detected");
            return Err(SprigError::CycleDetected { binding: this.id });
        }

        let _running = RunningFlag::raise(&this.running);
        this.touched.borrow_mut().clear();
        trace!(binding = %this.id, run = this.run_count.get(), "running binding");

        let result = {
            let _ctx = ReactiveContext::enter(Rc::clone(this));
            (this.render)()
        };
        this.run_count.set(this.run_count.get() + 1);

        // A failed run may have stopped before reaching some of its reads.
        if result.is_ok() {
            this.sweep_stale();
        }
        result
    }

    fn sweep_stale(&self) {
        let stale = {
            let touched = self.touched.borrow();
            let mut sources = self.sources.borrow_mut();
            let stale: SmallVec<[Weak<dyn Source>; 4]> = sources
                .iter()
                .filter(|(id, _)| !touched.contains(*id))
                .map(|(_, source)| source.clone())
                .collect();
            sources.retain(|id, _| touched.contains(id));
            stale
        };

        for source in stale {
            if let Some(source) = source.upgrade() {
                debug!(binding = %self.id, signal = source.source_id(), "dropping stale subscription");
                source.unsubscribe(self.id);
            }
        }
    }
}

impl Drop for BindingInner {
    fn drop(&mut self) {
        for source in self.sources.get_mut().values() {
            if let Some(source) = source.upgrade() {
                source.unsubscribe(self.id);
            }
        }
    }
}

/// A render callback that re-runs whenever a signal it read changes.
///
/// # Example
///
/// ```rust
/// use sprig_core::dom::Node;
/// use sprig_core::reactive::{signal, Binding};
///
/// let count = signal(5);
/// let node = Node::text("");
///
/// let source = count.clone();
/// Binding::text(&node, move || source.read().to_string())?;
/// assert_eq!(node.node_value().as_deref(), Some("5"));
///
/// count.write(7)?;
/// assert_eq!(node.node_value().as_deref(), Some("7"));
/// # Ok::<(), sprig_core::SprigError>(())
/// ```
#[derive(Clone)]
pub struct Binding {
    inner: Rc<BindingInner>,
}

impl Binding {
    /// Create a binding without running it.
    ///
    /// It subscribes to nothing until [`run`](Self::run) is called.
    pub fn new<F>(render: F) -> Self
    where
        F: Fn() -> Result<()> + 'static,
    {
        Self {
            inner: Rc::new(BindingInner {
                id: SubscriberId::new(),
                render: Box::new(render),
                running: Cell::new(false),
                run_count: Cell::new(0),
                sources: RefCell::new(IndexMap::new()),
                touched: RefCell::new(SmallVec::new()),
            }),
        }
    }

    /// Create a binding and run it once to establish its subscriptions.
    pub fn install<F>(render: F) -> Result<Self>
    where
        F: Fn() -> Result<()> + 'static,
    {
        let binding = Self::new(render);
        binding.run()?;
        Ok(binding)
    }

    /// Install a binding that writes `render()` into `target`'s value.
    ///
    /// The node owns the binding; the binding only refers back to the node
    /// weakly.
    pub fn text<F>(target: &Node, render: F) -> Result<Self>
    where
        F: Fn() -> String + 'static,
    {
        let node = target.downgrade();
        let binding = Self::install(move || {
            let text = render();
            if let Some(node) = node.upgrade() {
                node.set_node_value(&text);
            }
            Ok(())
        })?;
        target.own_binding(binding.clone());
        Ok(binding)
    }

    /// Run the render function, re-tracking its dependencies.
    pub fn run(&self) -> Result<()> {
        BindingInner::execute(&self.inner)
    }

    pub fn id(&self) -> SubscriberId {
        self.inner.id
    }

    /// Number of completed runs, failed ones included.
    pub fn run_count(&self) -> usize {
        self.inner.run_count.get()
    }

    /// Number of signals this binding is currently subscribed to.
    pub fn dependency_count(&self) -> usize {
        self.inner.sources.borrow().len()
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }

    #[cfg(test)]
    pub(crate) fn inner(&self) -> &Rc<BindingInner> {
        &self.inner
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("id", &self.inner.id)
            .field("run_count", &self.run_count())
            .field("dependency_count", &self.dependency_count())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::signal;

    #[test]
    fn binding_runs_on_install() {
        let runs = Rc::new(Cell::new(0));
        let runs_in = Rc::clone(&runs);

        let binding = Binding::install(move || {
            runs_in.set(runs_in.get() + 1);
            Ok(())
        })
        .unwrap();

        assert_eq!(runs.get(), 1);
        assert_eq!(binding.run_count(), 1);
    }

    #[test]
    fn new_binding_does_not_run() {
        let runs = Rc::new(Cell::new(0));
        let runs_in = Rc::clone(&runs);

        let binding = Binding::new(move || {
            runs_in.set(runs_in.get() + 1);
            Ok(())
        });

        assert_eq!(runs.get(), 0);
        assert_eq!(binding.run_count(), 0);

        binding.run().unwrap();
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn binding_reruns_when_signal_written() {
        let count = signal(1);
        let seen = Rc::new(Cell::new(0));

        let (source, seen_in) = (count.clone(), Rc::clone(&seen));
        let binding = Binding::install(move || {
            seen_in.set(source.read());
            Ok(())
        })
        .unwrap();

        count.write(2).unwrap();
        assert_eq!(seen.get(), 2);
        assert_eq!(binding.run_count(), 2);
        assert_eq!(binding.dependency_count(), 1);
    }

    #[test]
    fn stale_subscriptions_are_dropped() {
        let use_left = signal(true);
        let left = signal(1);
        let right = signal(2);

        let (flag, l, r) = (use_left.clone(), left.clone(), right.clone());
        let binding = Binding::install(move || {
            let _ = if flag.read() { l.read() } else { r.read() };
            Ok(())
        })
        .unwrap();

        assert_eq!(left.subscriber_count(), 1);
        assert_eq!(right.subscriber_count(), 0);

        use_left.write(false).unwrap();

        assert_eq!(left.subscriber_count(), 0);
        assert_eq!(right.subscriber_count(), 1);
        assert_eq!(binding.dependency_count(), 2);

        // Writing the abandoned branch no longer reaches the binding.
        left.write(10).unwrap();
        assert_eq!(binding.run_count(), 2);
    }

    #[test]
    fn dropping_binding_unsubscribes() {
        let count = signal(0);
        let source = count.clone();
        let binding = Binding::install(move || {
            source.read();
            Ok(())
        })
        .unwrap();

        assert_eq!(count.subscriber_count(), 1);
        drop(binding);
        assert_eq!(count.subscriber_count(), 0);
        count.write(1).unwrap();
    }

    #[test]
    fn self_write_is_reported_as_cycle() {
        let count = signal(0);
        let source = count.clone();

        let err = Binding::install(move || {
            let next = source.read() + 1;
            source.write(next)
        })
        .unwrap_err();

        assert!(matches!(err, SprigError::CycleDetected { .. }));
    }

    #[test]
    fn nested_binding_creation_keeps_outer_tracking() {
        let outer_signal = signal("a");
        let inner_signal = signal("b");
        let inner_slot: Rc<RefCell<Option<Binding>>> = Rc::new(RefCell::new(None));

        let (outer_src, inner_src, slot) =
            (outer_signal.clone(), inner_signal.clone(), Rc::clone(&inner_slot));
        let outer = Binding::install(move || {
            if slot.borrow().is_none() {
                let inner_src = inner_src.clone();
                let inner = Binding::install(move || {
                    inner_src.read();
                    Ok(())
                })?;
                *slot.borrow_mut() = Some(inner);
            }
            outer_src.read();
            Ok(())
        })
        .unwrap();

        assert_eq!(outer.dependency_count(), 1);
        assert_eq!(outer_signal.subscriber_count(), 1);
        assert_eq!(inner_signal.subscriber_count(), 1);

        inner_signal.write("c").unwrap();
        assert_eq!(outer.run_count(), 1);
    }

    #[test]
    fn text_binding_populates_node() {
        let label = signal(String::from("ready"));
        let node = Node::text("");

        let source = label.clone();
        Binding::text(&node, move || source.read()).unwrap();
        assert_eq!(node.node_value().as_deref(), Some("ready"));

        label.write(String::from("go")).unwrap();
        assert_eq!(node.node_value().as_deref(), Some("go"));
    }

    #[test]
    fn dropping_node_releases_its_binding() {
        let count = signal(3);
        let node = Node::text("");

        let source = count.clone();
        let binding = Binding::text(&node, move || source.read().to_string()).unwrap();
        let id = binding.id();
        drop(binding);

        assert_eq!(count.subscriber_count(), 1);
        assert!(count.has_subscriber(id));

        drop(node);
        assert_eq!(count.subscriber_count(), 0);
    }
}
