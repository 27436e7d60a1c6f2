//! Host document and mounting.

use tracing::info;

use super::Node;
use crate::error::{Result, SprigError};

/// The host document a view tree is mounted into.
#[derive(Debug)]
pub struct Document {
    body: Node,
}

impl Document {
    pub fn new() -> Self {
        Self {
            body: Node::element("body"),
        }
    }

    pub fn body(&self) -> &Node {
        &self.body
    }

    /// First element under `body` whose `id` attribute equals `id`.
    pub fn get_element_by_id(&self, id: &str) -> Option<Node> {
        self.body
            .find(|node| node.attribute("id").as_deref() == Some(id))
    }

    /// Append `tree` to the element with the given id.
    ///
    /// Fails with [`SprigError::TargetNotFound`] instead of doing nothing
    /// when no such element exists.
    pub fn mount(&self, target_id: &str, tree: &Node) -> Result<()> {
        let target = self
            .get_element_by_id(target_id)
            .ok_or_else(|| SprigError::TargetNotFound {
                id: target_id.to_string(),
            })?;
        add(&target, tree)?;
        info!(target = target_id, node = tree.id(), "mounted view");
        Ok(())
    }

    pub fn mount_to_body(&self, tree: &Node) -> Result<()> {
        add(&self.body, tree)?;
        info!(target = "body", node = tree.id(), "mounted view");
        Ok(())
    }

    /// Serialize the whole body as HTML.
    pub fn to_html(&self) -> String {
        self.body.to_html()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Append `child` to `parent`. Each tree is appended exactly once.
pub fn add(parent: &Node, child: &Node) -> Result<()> {
    parent.append_child(child)
}
