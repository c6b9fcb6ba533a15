//! Structural edits: attaching, detaching, reordering and copying nodes.
//!
//! Every operation validates before it touches anything, so a returned error
//! means the tree is unchanged.

use crate::{DomError, NodeId, NodeType, Tree};

impl Tree {
    /// Check that `child` may be placed under `parent`.
    fn check_insert(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let parent_node = self.node(parent)?;
        let child_node = self.node(child)?;
        if child == parent || self.is_descendant(child, parent) {
            return Err(DomError::CircularReference { parent, child });
        }
        if matches!(child_node.node_type(), NodeType::Document) {
            return Err(DomError::DocumentNode(child));
        }
        if !parent_node.node_type().is_container() {
            return Err(DomError::NotAnElement(parent));
        }
        Ok(())
    }

    /// Sever `id` from its parent, if it has one.
    fn unlink(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Ok(node) = self.node_mut(parent) {
            node.children.retain(|&c| c != id);
        }
        if let Ok(node) = self.node_mut(id) {
            node.parent = None;
        }
    }

    /// Insert `child` at `index` in `parent`'s children. Both must be valid
    /// and `child` detached.
    fn attach_at(&mut self, parent: NodeId, index: usize, child: NodeId) -> Result<(), DomError> {
        self.node_mut(parent)?.children.insert(index, child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    fn child_index(&self, parent: NodeId, child: NodeId) -> Result<usize, DomError> {
        self.children(parent)
            .iter()
            .position(|&c| c == child)
            .ok_or(DomError::ChildNotFound(child))
    }

    /// Append `child` as the last child of `parent`, detaching it from its
    /// previous parent first.
    ///
    /// # Errors
    ///
    /// - [`DomError::CircularReference`] if `child` is `parent` or one of its
    ///   ancestors.
    /// - [`DomError::NotAnElement`] if `parent` cannot hold children.
    /// - [`DomError::DocumentNode`] if `child` is the document.
    /// - [`DomError::NodeNotFound`] for unknown ids.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.check_insert(parent, child)?;
        self.unlink(child);
        let index = self.count_children(parent);
        self.attach_at(parent, index, child)
    }

    /// Detach `child` from `parent`. A no-op if it is not a direct child.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        if self.is_child(parent, child) {
            self.unlink(child);
        }
    }

    /// Insert `new` immediately before `reference` among `parent`'s children.
    ///
    /// # Errors
    ///
    /// [`DomError::ChildNotFound`] if `reference` is not a child of `parent`,
    /// plus the errors of [`Tree::add_child`].
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        new: NodeId,
        reference: NodeId,
    ) -> Result<(), DomError> {
        self.insert_relative(parent, new, reference, 0)
    }

    /// Insert `new` immediately after `reference` among `parent`'s children.
    ///
    /// # Errors
    ///
    /// As [`Tree::insert_before`].
    pub fn insert_after(
        &mut self,
        parent: NodeId,
        new: NodeId,
        reference: NodeId,
    ) -> Result<(), DomError> {
        self.insert_relative(parent, new, reference, 1)
    }

    fn insert_relative(
        &mut self,
        parent: NodeId,
        new: NodeId,
        reference: NodeId,
        offset: usize,
    ) -> Result<(), DomError> {
        self.check_insert(parent, new)?;
        let _ = self.child_index(parent, reference)?;
        if new == reference {
            return Ok(());
        }
        self.unlink(new);
        // Unlinking may have shifted the reference if `new` was a sibling.
        let index = self.child_index(parent, reference)? + offset;
        self.attach_at(parent, index, new)
    }

    /// Put `new` where `old` is and detach `old`.
    ///
    /// # Errors
    ///
    /// [`DomError::ChildNotFound`] if `old` is not a child of `parent`, plus
    /// the errors of [`Tree::add_child`] for `new`.
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        old: NodeId,
        new: NodeId,
    ) -> Result<(), DomError> {
        self.check_insert(parent, new)?;
        let _ = self.child_index(parent, old)?;
        if new == old {
            return Ok(());
        }
        self.unlink(new);
        let index = self.child_index(parent, old)?;
        self.unlink(old);
        self.attach_at(parent, index, new)
    }

    /// Detach a node (and with it its subtree) from the document.
    ///
    /// The nodes stay in the arena and can be re-attached.
    ///
    /// # Errors
    ///
    /// [`DomError::DocumentNode`] for the root, [`DomError::NodeNotFound`]
    /// for unknown ids.
    pub fn delete(&mut self, id: NodeId) -> Result<(), DomError> {
        if matches!(self.node(id)?.node_type(), NodeType::Document) {
            return Err(DomError::DocumentNode(id));
        }
        self.unlink(id);
        Ok(())
    }

    /// Replace the text of a node.
    ///
    /// A text node gets a new payload; an element loses its children and
    /// gains a single new text child.
    ///
    /// # Errors
    ///
    /// [`DomError::NotAnElement`] for any other node type,
    /// [`DomError::NodeNotFound`] for unknown ids.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<(), DomError> {
        let text = text.into();
        let node = self.node_mut(id)?;
        if let NodeType::Text(payload) = &mut node.node_type {
            *payload = text;
            return Ok(());
        }
        if !matches!(node.node_type, NodeType::Element(_)) {
            return Err(DomError::NotAnElement(id));
        }

        for child in self.children(id).to_vec() {
            self.unlink(child);
        }
        let child = self.create_text(text);
        self.attach_at(id, 0, child)
    }

    /// Deep-copy the subtree at `node` in `other` into this tree.
    ///
    /// The copy is detached and its nodes get fresh ids here, in pre-order.
    ///
    /// # Errors
    ///
    /// [`DomError::DocumentNode`] when `node` is the other tree's document,
    /// [`DomError::NodeNotFound`] when `node` is not in `other`.
    pub fn import(&mut self, other: &Self, node: NodeId) -> Result<NodeId, DomError> {
        let source = other.node(node)?;
        if matches!(source.node_type(), NodeType::Document) {
            return Err(DomError::DocumentNode(node));
        }

        let copy = self.alloc(source.node_type().clone());
        let mut stack: Vec<(NodeId, NodeId)> = other
            .children(node)
            .iter()
            .rev()
            .map(|&child| (child, copy))
            .collect();

        while let Some((source_id, new_parent)) = stack.pop() {
            let source = other.node(source_id)?;
            let new_id = self.alloc(source.node_type().clone());
            let index = self.count_children(new_parent);
            self.attach_at(new_parent, index, new_id)?;
            stack.extend(
                source
                    .children()
                    .iter()
                    .rev()
                    .map(|&child| (child, new_id)),
            );
        }
        Ok(copy)
    }
}
