//! Lookup of a node by [`NodeId`] within a subtree.

use crate::{NodeId, Tree};

impl Tree {
    /// Find the node with id `target` in the subtree rooted at `start`
    /// (including `start` itself).
    ///
    /// Freshly parsed trees number nodes in pre-order, so the walk compares
    /// ids against the next sibling to decide whether to descend or skip
    /// ahead. Mutation can break that ordering; when the ordered walk comes
    /// up empty the subtree is scanned linearly, so the answer always equals
    /// a full scan.
    #[must_use]
    pub fn find_by_id(&self, start: NodeId, target: NodeId) -> Option<NodeId> {
        let _ = self.get(start)?;
        if start == target {
            return Some(start);
        }
        self.find_ordered(start, target)
            .or_else(|| self.descendants(start).find(|&id| id == target))
    }

    fn find_ordered(&self, start: NodeId, target: NodeId) -> Option<NodeId> {
        let mut current = self.children(start).first().copied()?;
        loop {
            if current == target {
                return Some(current);
            }
            match self.next_sibling(current).ok() {
                Some(next) if next == target => return Some(next),
                Some(next) if next < target => current = next,
                // The target, if present, sits below `current`.
                Some(_) | None => current = self.children(current).first().copied()?,
            }
        }
    }
}
