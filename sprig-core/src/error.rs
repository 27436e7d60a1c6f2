//! Error types for the reactive core and the DOM layer.
//!
//! Every failure here is a programming error surfaced at construction,
//! mount, or write time. Nothing is retried.

use thiserror::Error;

use crate::reactive::SubscriberId;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SprigError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SprigError {
    /// A binding was notified while it was still running.
    #[error("reactive cycle detected: {binding} was re-entered while running")]
    CycleDetected { binding: SubscriberId },

    /// The signal was written while its value was borrowed, e.g. from
    /// inside its own `with` closure.
    #[error("signal {signal} written while its value is borrowed")]
    SignalBorrowed { signal: u64 },

    /// No host element carries the requested id.
    #[error("mount target not found: #{id}")]
    TargetNotFound { id: String },

    /// Dynamically typed content that is not text.
    #[error("unsupported content type: {kind}")]
    UnsupportedContent { kind: &'static str },

    #[error("invalid tag name: {tag:?}")]
    InvalidTagName { tag: String },

    #[error("invalid attribute name: {name:?}")]
    InvalidAttributeName { name: String },

    /// An element-only operation was attempted on a text node.
    #[error("{op} requires an element node")]
    NotAnElement { op: &'static str },

    /// The node already has a parent.
    #[error("node is already attached to a parent")]
    AlreadyAttached,

    /// Appending would make a node its own ancestor.
    #[error("hierarchy request error: a node cannot contain itself")]
    HierarchyRequest,
}
