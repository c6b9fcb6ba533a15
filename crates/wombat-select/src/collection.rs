use thiserror::Error;
use wombat_dom::{DomError, NodeId, Tree};

/// Errors from reading an empty [`Collection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CollectionError {
    /// A single-node read on a collection with no nodes.
    #[error("collection is empty")]
    EmptyCollection,
}

/// An ordered, duplicate-free list of matched nodes.
///
/// The collection only holds ids. Reads and mutations go through the
/// [`Tree`] the ids came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
    ids: Vec<NodeId>,
}

impl Collection {
    /// An empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self { ids: Vec::new() }
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether there are no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The `n`th node, zero-based.
    #[must_use]
    pub fn get(&self, n: usize) -> Option<NodeId> {
        self.ids.get(n).copied()
    }

    /// The first node.
    #[must_use]
    pub fn first(&self) -> Option<NodeId> {
        self.ids.first().copied()
    }

    /// The last node.
    #[must_use]
    pub fn last(&self) -> Option<NodeId> {
        self.ids.last().copied()
    }

    /// Iterate over the ids in order.
    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.ids.iter().copied()
    }

    /// The ids as a vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<NodeId> {
        self.ids.clone()
    }

    /// Call `f` for every node.
    pub fn each<F>(&self, tree: &Tree, mut f: F)
    where
        F: FnMut(&Tree, NodeId),
    {
        for &id in &self.ids {
            f(tree, id);
        }
    }

    fn require_first(&self) -> Result<NodeId, CollectionError> {
        self.first().ok_or(CollectionError::EmptyCollection)
    }

    /// Outer HTML of the first node.
    ///
    /// # Errors
    ///
    /// [`CollectionError::EmptyCollection`] when there are no nodes.
    pub fn outer_html(&self, tree: &Tree) -> Result<String, CollectionError> {
        Ok(tree.outer_html(self.require_first()?))
    }

    /// Inner HTML of the first node.
    ///
    /// # Errors
    ///
    /// [`CollectionError::EmptyCollection`] when there are no nodes.
    pub fn inner_html(&self, tree: &Tree) -> Result<String, CollectionError> {
        Ok(tree.inner_html(self.require_first()?))
    }

    /// Direct text of the first node.
    ///
    /// # Errors
    ///
    /// [`CollectionError::EmptyCollection`] when there are no nodes.
    pub fn text(&self, tree: &Tree) -> Result<String, CollectionError> {
        Ok(tree.text(self.require_first()?, false))
    }

    /// Outer HTML of every node, concatenated.
    #[must_use]
    pub fn outer_html_all(&self, tree: &Tree) -> String {
        self.ids.iter().map(|&id| tree.outer_html(id)).collect()
    }

    /// Set an attribute on every element in the collection. Non-elements are
    /// skipped.
    pub fn set_attribute(&self, tree: &mut Tree, name: &str, value: Option<&str>) {
        for &id in &self.ids {
            if let Some(tag) = tree.as_element_mut(id) {
                tag.set_attribute(name, value);
            }
        }
    }

    /// Remove an attribute from every element in the collection.
    pub fn remove_attribute(&self, tree: &mut Tree, name: &str) {
        for &id in &self.ids {
            if let Some(tag) = tree.as_element_mut(id) {
                tag.remove_attribute(name);
            }
        }
    }

    /// Detach every node from its parent.
    ///
    /// # Errors
    ///
    /// Stops at the first node that cannot be deleted, such as the document.
    pub fn delete(&self, tree: &mut Tree) -> Result<(), DomError> {
        self.ids.iter().try_for_each(|&id| tree.delete(id))
    }
}

impl From<Vec<NodeId>> for Collection {
    /// Keeps the first occurrence of each id.
    fn from(ids: Vec<NodeId>) -> Self {
        ids.into_iter().collect()
    }
}

impl FromIterator<NodeId> for Collection {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        let mut seen = std::collections::HashSet::new();
        let ids = iter.into_iter().filter(|&id| seen.insert(id)).collect();
        Self { ids }
    }
}

impl IntoIterator for Collection {
    type Item = NodeId;
    type IntoIter = std::vec::IntoIter<NodeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.into_iter()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = NodeId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, NodeId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use wombat_dom::Tag;

    use super::*;

    fn tree_with_paragraphs(count: usize) -> (Tree, Vec<NodeId>) {
        let mut tree = Tree::new();
        let ids = (0..count)
            .map(|i| {
                let p = tree.create_element(Tag::new("p"));
                let text = tree.create_text(format!("p{i}"));
                tree.add_child(NodeId::ROOT, p).unwrap();
                tree.add_child(p, text).unwrap();
                p
            })
            .collect();
        (tree, ids)
    }

    #[test]
    fn test_empty_reads_fail() {
        let (tree, _) = tree_with_paragraphs(0);
        let empty = Collection::new();
        assert_eq!(empty.outer_html(&tree), Err(CollectionError::EmptyCollection));
        assert_eq!(empty.text(&tree), Err(CollectionError::EmptyCollection));
        assert_eq!(empty.outer_html_all(&tree), "");
    }

    #[test]
    fn test_duplicates_dropped_in_order() {
        let collection = Collection::from(vec![NodeId(3), NodeId(1), NodeId(3), NodeId(2)]);
        assert_eq!(collection.to_vec(), vec![NodeId(3), NodeId(1), NodeId(2)]);
        assert_eq!(collection.first(), Some(NodeId(3)));
        assert_eq!(collection.last(), Some(NodeId(2)));
        assert_eq!(collection.get(5), None);
    }

    #[test]
    fn test_bulk_reads() {
        let (tree, ids) = tree_with_paragraphs(2);
        let collection = Collection::from(ids);
        assert_eq!(collection.text(&tree), Ok("p0".to_string()));
        assert_eq!(collection.inner_html(&tree), Ok("p0".to_string()));
        assert_eq!(collection.outer_html_all(&tree), "<p>p0</p><p>p1</p>");

        let mut seen = Vec::new();
        collection.each(&tree, |tree, id| seen.push(tree.text(id, false)));
        assert_eq!(seen, vec!["p0", "p1"]);
    }

    #[test]
    fn test_bulk_mutations() {
        let (mut tree, ids) = tree_with_paragraphs(3);
        let collection: Collection = ids[1..].iter().copied().collect();

        collection.set_attribute(&mut tree, "class", Some("x"));
        assert_eq!(
            tree.outer_html(NodeId::ROOT),
            r#"<p>p0</p><p class="x">p1</p><p class="x">p2</p>"#
        );

        collection.remove_attribute(&mut tree, "CLASS");
        collection.delete(&mut tree).unwrap();
        assert_eq!(tree.outer_html(NodeId::ROOT), "<p>p0</p>");
        assert_eq!(tree.outer_html(ids[2]), "<p>p2</p>");
    }
}
