//! Errors raised by tree and tag operations.

use thiserror::Error;

use crate::NodeId;

/// Failure of a structural or attribute operation on a [`crate::Tree`].
///
/// Every failing operation leaves the tree exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// The node is detached, or no ancestor satisfied the query.
    #[error("node {0} has no matching parent")]
    ParentNotFound(NodeId),
    /// The requested child or sibling does not exist.
    #[error("no such child relative to node {0}")]
    ChildNotFound(NodeId),
    /// Attaching `child` under `parent` would make a node its own ancestor.
    #[error("cannot add node {child} under {parent}: circular reference")]
    CircularReference {
        /// The would-be parent.
        parent: NodeId,
        /// The would-be child.
        child: NodeId,
    },
    /// The tag has no attribute with this name.
    #[error("attribute `{0}` not found")]
    AttributeNotFound(String),
    /// The id does not belong to this tree.
    #[error("node {0} does not exist")]
    NodeNotFound(NodeId),
    /// The operation needs an element (or the document) but got a leaf.
    #[error("node {0} is not an element")]
    NotAnElement(NodeId),
    /// The document root cannot be attached, imported or deleted.
    #[error("node {0} is the document root")]
    DocumentNode(NodeId),
}
