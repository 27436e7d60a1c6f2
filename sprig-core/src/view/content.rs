//! Element content.
//!
//! Content is resolved by the caller's construction call, not by inspecting
//! values at runtime: a child is literal text, an already-built node, or
//! reactive text backed by signals.

use std::fmt::{self, Display};
use std::rc::Rc;

use serde_json::Value;
use tracing::trace;

use crate::dom::Node;
use crate::error::{Result, SprigError};
use crate::reactive::{Binding, Signal};

/// One child passed to an element builder.
pub enum Content {
    /// Text written once and never updated.
    Literal(String),
    /// A node appended as-is.
    Node(Node),
    /// Text kept in sync with the signals it reads.
    Reactive(ReactiveText),
}

/// A text source re-evaluated by a binding.
#[derive(Clone)]
pub struct ReactiveText(Rc<dyn Fn() -> String>);

impl ReactiveText {
    pub fn new<F>(render: F) -> Self
    where
        F: Fn() -> String + 'static,
    {
        Self(Rc::new(render))
    }

    /// Evaluate the text now, subscribing the running binding if any.
    pub fn render(&self) -> String {
        (self.0)()
    }
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    /// Reactive text derived from any number of signals.
    ///
    /// ```rust
    /// use sprig_core::reactive::signal;
    /// use sprig_core::view::{p, Content};
    ///
    /// let x = signal(1);
    /// let y = signal(2);
    /// let (sx, sy) = (x.clone(), y.clone());
    /// let label = p(None)
    ///     .child(Content::computed(move || format!("{},{}", sx.read(), sy.read())))
    ///     .build()?;
    ///
    /// y.write(5)?;
    /// assert_eq!(label.text_content(), "1,5");
    /// # Ok::<(), sprig_core::SprigError>(())
    /// ```
    pub fn computed<F>(render: F) -> Self
    where
        F: Fn() -> String + 'static,
    {
        Self::Reactive(ReactiveText::new(render))
    }

    /// Short name of the variant, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Literal(_) => "literal",
            Self::Node(_) => "node",
            Self::Reactive(_) => "reactive",
        }
    }

    /// Turn the content into the node that will be appended.
    ///
    /// Reactive content gets a text node with a binding installed, so the
    /// node is already populated when it is returned.
    pub(crate) fn into_node(self) -> Result<Node> {
        trace!(kind = self.kind(), "resolving content");
        match self {
            Self::Literal(text) => Ok(Node::text(text)),
            Self::Node(node) => Ok(node),
            Self::Reactive(source) => {
                let node = Node::text("");
                Binding::text(&node, move || source.render())?;
                Ok(node)
            }
        }
    }
}

impl fmt::Debug for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            Self::Node(node) => f.debug_tuple("Node").field(node).finish(),
            Self::Reactive(_) => f.write_str("Reactive(..)"),
        }
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Self::Literal(text.to_string())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Self::Literal(text)
    }
}

impl From<Node> for Content {
    fn from(node: Node) -> Self {
        Self::Node(node)
    }
}

impl From<&Node> for Content {
    fn from(node: &Node) -> Self {
        Self::Node(node.clone())
    }
}

impl<T: Display + 'static> From<Signal<T>> for Content {
    fn from(signal: Signal<T>) -> Self {
        Self::computed(move || signal.with(|value| value.to_string()))
    }
}

impl<T: Display + 'static> From<&Signal<T>> for Content {
    fn from(signal: &Signal<T>) -> Self {
        Self::from(signal.clone())
    }
}

/// Dynamically typed content, e.g. from a JSON view description.
///
/// Only strings are text; everything else is rejected here, at
/// construction time.
impl TryFrom<Value> for Content {
    type Error = SprigError;

    fn try_from(value: Value) -> Result<Self> {
        let kind = match value {
            Value::String(text) => return Ok(Self::Literal(text)),
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        };
        Err(SprigError::UnsupportedContent { kind })
    }
}
