//! Document Model
//!
//! An in-memory DOM that view trees are built into and mounted on. It
//! carries exactly what bindings and the element builder need: elements
//! with attributes and ordered children, text nodes whose value bindings
//! rewrite, and a document with a `body` to mount into.
//!
//! Trees serialize to HTML (`to_html`) and to a JSON snapshot through
//! `serde`, which is how hosts and tests observe rendered output.

mod document;
mod node;

pub use document::{add, Document};
pub(crate) use node::is_valid_name;
pub use node::{Node, NodeKind, WeakNode};
