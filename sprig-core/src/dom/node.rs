//! DOM Nodes
//!
//! A small retained DOM: element nodes with a tag, attributes, and ordered
//! children, and text nodes with a mutable value. Handles are cheap `Rc`
//! clones; parents own children, children point back weakly.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use smallvec::SmallVec;

use crate::error::{Result, SprigError};
use crate::reactive::Binding;

static NODE_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// What a node is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element { tag: String },
    Text,
}

struct NodeInner {
    id: u64,
    kind: NodeKind,
    attributes: RefCell<IndexMap<String, String>>,
    children: RefCell<Vec<Node>>,

    /// Text value. Always empty for elements.
    value: RefCell<String>,

    parent: RefCell<Weak<NodeInner>>,

    /// Bindings that update this node. The node keeps them alive.
    bindings: RefCell<SmallVec<[Binding; 1]>>,
}

/// A handle to a DOM node.
#[derive(Clone)]
pub struct Node {
    inner: Rc<NodeInner>,
}

/// A non-owning handle to a DOM node.
#[derive(Clone)]
pub struct WeakNode(Weak<NodeInner>);

impl WeakNode {
    pub fn upgrade(&self) -> Option<Node> {
        self.0.upgrade().map(|inner| Node { inner })
    }
}

impl Node {
    fn with_kind(kind: NodeKind, value: String) -> Self {
        Self {
            inner: Rc::new(NodeInner {
                id: NODE_ID_COUNTER.fetch_add(1, Ordering::Relaxed),
                kind,
                attributes: RefCell::new(IndexMap::new()),
                children: RefCell::new(Vec::new()),
                value: RefCell::new(value),
                parent: RefCell::new(Weak::new()),
                bindings: RefCell::new(SmallVec::new()),
            }),
        }
    }

    /// Create a detached element.
    pub fn element(tag: impl Into<String>) -> Self {
        Self::with_kind(NodeKind::Element { tag: tag.into() }, String::new())
    }

    /// Create a detached text node.
    pub fn text(value: impl Into<String>) -> Self {
        Self::with_kind(NodeKind::Text, value.into())
    }

    pub fn id(&self) -> u64 {
        self.inner.id
    }

    pub fn kind(&self) -> &NodeKind {
        &self.inner.kind
    }

    /// The element's tag, or `None` for text nodes.
    pub fn tag(&self) -> Option<&str> {
        match &self.inner.kind {
            NodeKind::Element { tag } => Some(tag.as_str()),
            NodeKind::Text => None,
        }
    }

    pub fn is_text(&self) -> bool {
        self.inner.kind == NodeKind::Text
    }

    /// Whether two handles point at the same node.
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn downgrade(&self) -> WeakNode {
        WeakNode(Rc::downgrade(&self.inner))
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    /// Set an attribute, replacing any previous value.
    pub fn set_attribute(&self, name: &str, value: &str) -> Result<()> {
        if self.is_text() {
            return Err(SprigError::NotAnElement { op: "set_attribute" });
        }
        if !is_valid_name(name) {
            return Err(SprigError::InvalidAttributeName {
                name: name.to_string(),
            });
        }
        self.inner
            .attributes
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.inner.attributes.borrow().get(name).cloned()
    }

    pub fn attributes(&self) -> Vec<(String, String)> {
        self.inner
            .attributes
            .borrow()
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    // ------------------------------------------------------------------
    // Tree structure
    // ------------------------------------------------------------------

    /// Append `child` as the last child of this element.
    ///
    /// A node is appended exactly once: a child that already has a parent
    /// is rejected rather than moved.
    pub fn append_child(&self, child: &Node) -> Result<()> {
        if self.is_text() {
            return Err(SprigError::NotAnElement { op: "append_child" });
        }
        if child.parent().is_some() {
            return Err(SprigError::AlreadyAttached);
        }

        let mut cursor = Some(self.clone());
        while let Some(node) = cursor {
            if node.ptr_eq(child) {
                return Err(SprigError::HierarchyRequest);
            }
            cursor = node.parent();
        }

        *child.inner.parent.borrow_mut() = Rc::downgrade(&self.inner);
        self.inner.children.borrow_mut().push(child.clone());
        Ok(())
    }

    pub fn parent(&self) -> Option<Node> {
        self.inner
            .parent
            .borrow()
            .upgrade()
            .map(|inner| Node { inner })
    }

    pub fn children(&self) -> Vec<Node> {
        self.inner.children.borrow().clone()
    }

    pub fn child(&self, index: usize) -> Option<Node> {
        self.inner.children.borrow().get(index).cloned()
    }

    pub fn child_count(&self) -> usize {
        self.inner.children.borrow().len()
    }

    /// Depth-first, pre-order search starting at this node.
    pub fn find(&self, predicate: impl Fn(&Node) -> bool) -> Option<Node> {
        let mut stack = vec![self.clone()];
        while let Some(node) = stack.pop() {
            if predicate(&node) {
                return Some(node);
            }
            stack.extend(node.inner.children.borrow().iter().rev().cloned());
        }
        None
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    /// The text node's value, or `None` for elements.
    pub fn node_value(&self) -> Option<String> {
        self.is_text().then(|| self.inner.value.borrow().clone())
    }

    /// Replace the text node's value. Has no effect on elements.
    pub fn set_node_value(&self, value: &str) {
        if self.is_text() {
            let mut current = self.inner.value.borrow_mut();
            current.clear();
            current.push_str(value);
        }
    }

    /// Concatenated text of this node and all its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match &self.inner.kind {
            NodeKind::Text => out.push_str(&self.inner.value.borrow()),
            NodeKind::Element { .. } => {
                for child in self.inner.children.borrow().iter() {
                    child.collect_text(out);
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Bindings
    // ------------------------------------------------------------------

    pub(crate) fn own_binding(&self, binding: Binding) {
        self.inner.bindings.borrow_mut().push(binding);
    }

    /// Number of bindings this node keeps alive.
    pub fn binding_count(&self) -> usize {
        self.inner.bindings.borrow().len()
    }

    // ------------------------------------------------------------------
    // Serialization
    // ------------------------------------------------------------------

    /// Serialize the subtree as HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match &self.inner.kind {
            NodeKind::Text => escape_into(out, &self.inner.value.borrow(), false),
            NodeKind::Element { tag } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in self.inner.attributes.borrow().iter() {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    escape_into(out, value, true);
                    out.push('"');
                }
                out.push('>');
                for child in self.inner.children.borrow().iter() {
                    child.write_html(out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

/// Name check shared by tags and attributes, mirroring the DOM's
/// InvalidCharacterError cases.
pub(crate) fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && !name.chars().any(|c| {
            c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '>' | '/' | '=')
        })
}

fn escape_into(out: &mut String, text: &str, attribute: bool) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.inner.id)
            .field("kind", &self.inner.kind)
            .field("children", &self.child_count())
            .finish()
    }
}

/// JSON-friendly snapshot: `{"text": ..}` for text nodes,
/// `{"tag": .., "attributes": {..}, "children": [..]}` for elements.
impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match &self.inner.kind {
            NodeKind::Text => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("text", self.inner.value.borrow().as_str())?;
                map.end()
            }
            NodeKind::Element { tag } => {
                let attributes = self.inner.attributes.borrow();
                let sorted: BTreeMap<&str, &str> = attributes
                    .iter()
                    .map(|(name, value)| (name.as_str(), value.as_str()))
                    .collect();

                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("tag", tag)?;
                map.serialize_entry("attributes", &sorted)?;
                map.serialize_entry("children", &*self.inner.children.borrow())?;
                map.end()
            }
        }
    }
}
