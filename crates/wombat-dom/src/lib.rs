//! Arena document tree for the wombat HTML parser.
//!
//! # Design
//!
//! Every node lives in one `Vec` owned by the [`Tree`] and is addressed by a
//! [`NodeId`] index. Children are stored as ordered id lists and the parent as
//! a back-reference id, so there are no reference cycles and no borrow
//! juggling while walking or mutating the tree.
//!
//! Ids are handed out in creation order and never reused. A node removed from
//! its parent stays in the arena, detached, and may be attached again later.

mod error;
mod finder;
mod mutation;
mod serialize;
mod tag;

use std::fmt;

pub use error::DomError;
pub use tag::{Attribute, QuoteStyle, Tag};

/// A type-safe index into a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The document node is always at index 0.
    pub const ROOT: Self = Self(0);
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a node is, together with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeType {
    /// The single root of a tree.
    Document,
    /// An element; the only variant besides the document that has children.
    Element(Tag),
    /// Character data, stored exactly as it appeared.
    Text(String),
    /// `<!--...-->`; holds the text between the markers.
    Comment(String),
    /// `<![CDATA[...]]>`; holds the text between the markers.
    CData(String),
    /// `<!DOCTYPE ...>` or `<?xml ...?>`; holds the whole markup verbatim.
    Declaration(String),
}

impl NodeType {
    /// Whether nodes of this type may hold children.
    #[must_use]
    pub const fn is_container(&self) -> bool {
        matches!(self, Self::Document | Self::Element(_))
    }
}

/// A vertex of the tree.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    node_type: NodeType,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    /// This node's id.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// The node's type and payload.
    #[must_use]
    pub const fn node_type(&self) -> &NodeType {
        &self.node_type
    }

    /// The parent, or `None` for the root and detached nodes.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in render order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The tag, if this is an element.
    #[must_use]
    pub const fn tag(&self) -> Option<&Tag> {
        match &self.node_type {
            NodeType::Element(tag) => Some(tag),
            _ => None,
        }
    }

    /// Whether this is a text node.
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self.node_type, NodeType::Text(_))
    }
}

/// Arena-backed document tree.
///
/// The document node is created with the tree and is always [`NodeId::ROOT`].
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Create a tree holding only the document node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                id: NodeId::ROOT,
                node_type: NodeType::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// The document node.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Number of nodes ever allocated, attached or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree owns at least its document node.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a node by id.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a node by id, failing for ids outside this tree.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NodeNotFound`] for an unknown id.
    pub fn node(&self, id: NodeId) -> Result<&Node, DomError> {
        self.get(id).ok_or(DomError::NodeNotFound(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, DomError> {
        self.nodes.get_mut(id.0).ok_or(DomError::NodeNotFound(id))
    }

    /// Allocate a detached node with the next id.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            id,
            node_type,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Allocate a detached element.
    pub fn create_element(&mut self, tag: Tag) -> NodeId {
        self.alloc(NodeType::Element(tag))
    }

    /// Allocate a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeType::Text(text.into()))
    }

    /// Allocate a detached comment.
    pub fn create_comment(&mut self, data: impl Into<String>) -> NodeId {
        self.alloc(NodeType::Comment(data.into()))
    }

    /// Allocate a detached CDATA section.
    pub fn create_cdata(&mut self, data: impl Into<String>) -> NodeId {
        self.alloc(NodeType::CData(data.into()))
    }

    /// Allocate a detached declaration (doctype or processing instruction).
    pub fn create_declaration(&mut self, markup: impl Into<String>) -> NodeId {
        self.alloc(NodeType::Declaration(markup.into()))
    }

    /// The parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// The children of a node; empty for leaves and unknown ids.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Number of direct children.
    #[must_use]
    pub fn count_children(&self, id: NodeId) -> usize {
        self.children(id).len()
    }

    /// Whether the node has any children.
    #[must_use]
    pub fn has_children(&self, id: NodeId) -> bool {
        !self.children(id).is_empty()
    }

    /// The first child.
    ///
    /// # Errors
    ///
    /// [`DomError::NodeNotFound`] for an unknown id, [`DomError::ChildNotFound`]
    /// when the node has no children.
    pub fn first_child(&self, id: NodeId) -> Result<NodeId, DomError> {
        self.node(id)?
            .children
            .first()
            .copied()
            .ok_or(DomError::ChildNotFound(id))
    }

    /// The last child.
    ///
    /// # Errors
    ///
    /// As [`Tree::first_child`].
    pub fn last_child(&self, id: NodeId) -> Result<NodeId, DomError> {
        self.node(id)?
            .children
            .last()
            .copied()
            .ok_or(DomError::ChildNotFound(id))
    }

    /// The siblings list containing `id`, and its index in it.
    fn sibling_position(&self, id: NodeId) -> Result<(&[NodeId], usize), DomError> {
        let parent = self.node(id)?.parent.ok_or(DomError::ParentNotFound(id))?;
        let siblings = self.children(parent);
        let index = siblings
            .iter()
            .position(|&c| c == id)
            .ok_or(DomError::ChildNotFound(id))?;
        Ok((siblings, index))
    }

    /// The sibling immediately after `id`.
    ///
    /// # Errors
    ///
    /// [`DomError::ParentNotFound`] when detached, [`DomError::ChildNotFound`]
    /// when `id` is the last child.
    pub fn next_sibling(&self, id: NodeId) -> Result<NodeId, DomError> {
        let (siblings, index) = self.sibling_position(id)?;
        siblings
            .get(index + 1)
            .copied()
            .ok_or(DomError::ChildNotFound(id))
    }

    /// The sibling immediately before `id`.
    ///
    /// # Errors
    ///
    /// [`DomError::ParentNotFound`] when detached, [`DomError::ChildNotFound`]
    /// when `id` is the first child.
    pub fn previous_sibling(&self, id: NodeId) -> Result<NodeId, DomError> {
        let (siblings, index) = self.sibling_position(id)?;
        index
            .checked_sub(1)
            .map(|i| siblings[i])
            .ok_or(DomError::ChildNotFound(id))
    }

    /// Whether `id` is a direct child of `parent`.
    #[must_use]
    pub fn is_child(&self, parent: NodeId, id: NodeId) -> bool {
        self.parent(id) == Some(parent)
    }

    /// Whether `id` is somewhere below `ancestor`.
    #[must_use]
    pub fn is_descendant(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// Whether `id` is an ancestor of `node`.
    #[must_use]
    pub fn is_ancestor(&self, node: NodeId, id: NodeId) -> bool {
        self.is_descendant(id, node)
    }

    /// `Some(id)` if `id` is an ancestor of `node`.
    #[must_use]
    pub fn get_ancestor(&self, node: NodeId, id: NodeId) -> Option<NodeId> {
        self.is_ancestor(node, id).then_some(id)
    }

    /// The closest element named `name`, starting with `node` itself.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::ParentNotFound`] if no such element exists.
    pub fn ancestor_by_tag(&self, node: NodeId, name: &str) -> Result<NodeId, DomError> {
        std::iter::once(node)
            .chain(self.ancestors(node))
            .find(|&id| self.as_element(id).is_some_and(|tag| tag.matches_name(name)))
            .ok_or(DomError::ParentNotFound(node))
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Iterate over preceding siblings, closest first.
    #[must_use]
    pub fn preceding_siblings(&self, id: NodeId) -> PrecedingSiblingIterator<'_> {
        match self.sibling_position(id) {
            Ok((siblings, index)) => PrecedingSiblingIterator {
                siblings,
                remaining: index,
            },
            Err(_) => PrecedingSiblingIterator {
                siblings: &[],
                remaining: 0,
            },
        }
    }

    /// Iterate over everything below `id` in document (pre-)order.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: self.children(id).iter().rev().copied().collect(),
        }
    }

    /// The tag of an element node.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&Tag> {
        self.get(id).and_then(Node::tag)
    }

    /// Mutable access to the tag of an element node.
    pub fn as_element_mut(&mut self, id: NodeId) -> Option<&mut Tag> {
        self.nodes.get_mut(id.0).and_then(|n| match &mut n.node_type {
            NodeType::Element(tag) => Some(tag),
            _ => None,
        })
    }

    /// The payload of a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a Tree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Iterator over preceding siblings of a node.
pub struct PrecedingSiblingIterator<'a> {
    siblings: &'a [NodeId],
    remaining: usize,
}

impl Iterator for PrecedingSiblingIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        self.remaining = self.remaining.checked_sub(1)?;
        Some(self.siblings[self.remaining])
    }
}

/// Pre-order iterator over the descendants of a node.
pub struct Descendants<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
