//! Tests for tree mutation: add_child, remove_child, insert_before/after,
//! replace_child, delete, set_text and import.

use wombat_dom::{DomError, NodeId, Tag, Tree};

/// Helper to create an element node and return its NodeId.
fn alloc_element(tree: &mut Tree, tag: &str) -> NodeId {
    tree.create_element(Tag::new(tag))
}

/// A `div` under the root with children `a`, `b`, `c`.
fn three_children() -> (Tree, NodeId, [NodeId; 3]) {
    let mut tree = Tree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.add_child(NodeId::ROOT, parent).unwrap();
    let a = alloc_element(&mut tree, "a");
    let b = alloc_element(&mut tree, "b");
    let c = alloc_element(&mut tree, "c");
    for child in [a, b, c] {
        tree.add_child(parent, child).unwrap();
    }
    (tree, parent, [a, b, c])
}

// ========== add_child ==========

#[test]
fn test_add_child_sets_parent() {
    let mut tree = Tree::new();
    let parent = alloc_element(&mut tree, "div");
    let child = alloc_element(&mut tree, "p");

    tree.add_child(parent, child).unwrap();

    assert_eq!(tree.parent(child), Some(parent));
    assert!(tree.is_child(parent, child));
    assert_eq!(tree.children(parent), &[child]);
}

#[test]
fn test_add_child_to_itself() {
    let mut tree = Tree::new();
    let node = alloc_element(&mut tree, "div");

    assert_eq!(
        tree.add_child(node, node),
        Err(DomError::CircularReference {
            parent: node,
            child: node
        })
    );
    assert!(!tree.has_children(node));
}

#[test]
fn test_add_ancestor_as_child() {
    let mut tree = Tree::new();
    let parent = alloc_element(&mut tree, "div");
    let child = alloc_element(&mut tree, "p");
    let grandchild = alloc_element(&mut tree, "span");
    tree.add_child(parent, child).unwrap();
    tree.add_child(child, grandchild).unwrap();

    let result = tree.add_child(grandchild, parent);

    assert_eq!(
        result,
        Err(DomError::CircularReference {
            parent: grandchild,
            child: parent
        })
    );
    // Unchanged on failure
    assert_eq!(tree.parent(parent), None);
    assert!(!tree.has_children(grandchild));
}

#[test]
fn test_add_child_moves_from_old_parent() {
    let mut tree = Tree::new();
    let first = alloc_element(&mut tree, "div");
    let second = alloc_element(&mut tree, "div");
    let child = alloc_element(&mut tree, "p");
    tree.add_child(first, child).unwrap();

    tree.add_child(second, child).unwrap();

    assert!(!tree.has_children(first));
    assert_eq!(tree.children(second), &[child]);
    assert_eq!(tree.parent(child), Some(second));
}

#[test]
fn test_add_child_to_text_node() {
    let mut tree = Tree::new();
    let text = tree.create_text("hello");
    let child = alloc_element(&mut tree, "p");

    assert_eq!(tree.add_child(text, child), Err(DomError::NotAnElement(text)));
}

#[test]
fn test_add_document_as_child() {
    let mut tree = Tree::new();
    let div = alloc_element(&mut tree, "div");

    assert_eq!(
        tree.add_child(div, NodeId::ROOT),
        Err(DomError::DocumentNode(NodeId::ROOT))
    );
}

#[test]
fn test_add_unknown_node() {
    let mut tree = Tree::new();
    assert_eq!(
        tree.add_child(NodeId::ROOT, NodeId(42)),
        Err(DomError::NodeNotFound(NodeId(42)))
    );
}

// ========== remove_child ==========

#[test]
fn test_remove_child_middle_of_three() {
    let (mut tree, parent, [a, b, c]) = three_children();

    tree.remove_child(parent, b);

    // a and c are siblings now
    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.next_sibling(a), Ok(c));
    assert_eq!(tree.previous_sibling(c), Ok(a));
    assert_eq!(tree.parent(b), None);
}

#[test]
fn test_remove_child_not_a_child_is_noop() {
    let (mut tree, parent, [a, ..]) = three_children();
    let stranger = alloc_element(&mut tree, "x");

    tree.remove_child(parent, stranger);
    tree.remove_child(a, parent);

    assert_eq!(tree.count_children(parent), 3);
    assert_eq!(tree.parent(parent), Some(NodeId::ROOT));
}

// ========== siblings ==========

#[test]
fn test_sibling_errors() {
    let (mut tree, _, [a, _, c]) = three_children();
    let detached = alloc_element(&mut tree, "x");

    assert_eq!(tree.next_sibling(c), Err(DomError::ChildNotFound(c)));
    assert_eq!(tree.previous_sibling(a), Err(DomError::ChildNotFound(a)));
    assert_eq!(
        tree.next_sibling(detached),
        Err(DomError::ParentNotFound(detached))
    );
    assert_eq!(
        tree.previous_sibling(detached),
        Err(DomError::ParentNotFound(detached))
    );
}

#[test]
fn test_first_and_last_child() {
    let (mut tree, parent, [a, _, c]) = three_children();
    let empty = alloc_element(&mut tree, "x");

    assert_eq!(tree.first_child(parent), Ok(a));
    assert_eq!(tree.last_child(parent), Ok(c));
    assert_eq!(tree.first_child(empty), Err(DomError::ChildNotFound(empty)));
    assert_eq!(tree.last_child(empty), Err(DomError::ChildNotFound(empty)));
}

#[test]
fn test_preceding_siblings() {
    let (tree, _, [a, b, c]) = three_children();
    assert_eq!(tree.preceding_siblings(c).collect::<Vec<_>>(), vec![b, a]);
    assert_eq!(tree.preceding_siblings(a).count(), 0);
}

// ========== insert_before / insert_after ==========

#[test]
fn test_insert_before_first_child() {
    let mut tree = Tree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.add_child(NodeId::ROOT, parent).unwrap();

    let existing = alloc_element(&mut tree, "b");
    tree.add_child(parent, existing).unwrap();

    let new_child = alloc_element(&mut tree, "a");
    tree.insert_before(parent, new_child, existing).unwrap();

    // new_child should be first, existing second
    assert_eq!(tree.children(parent), &[new_child, existing]);
    assert_eq!(tree.parent(new_child), Some(parent));
    assert_eq!(tree.next_sibling(new_child), Ok(existing));
    assert_eq!(tree.previous_sibling(existing), Ok(new_child));
}

#[test]
fn test_insert_after_middle() {
    let (mut tree, parent, [a, b, c]) = three_children();
    let x = alloc_element(&mut tree, "x");

    tree.insert_after(parent, x, b).unwrap();

    assert_eq!(tree.children(parent), &[a, b, x, c]);
    assert_eq!(tree.next_sibling(b), Ok(x));
    assert_eq!(tree.previous_sibling(c), Ok(x));
}

#[test]
fn test_insert_after_last() {
    let (mut tree, parent, [a, b, c]) = three_children();
    let x = alloc_element(&mut tree, "x");

    tree.insert_after(parent, x, c).unwrap();

    assert_eq!(tree.children(parent), &[a, b, c, x]);
}

#[test]
fn test_insert_before_reorders_existing_sibling() {
    let (mut tree, parent, [a, b, c]) = three_children();

    tree.insert_before(parent, c, a).unwrap();

    assert_eq!(tree.children(parent), &[c, a, b]);
}

#[test]
fn test_insert_before_unknown_reference() {
    let (mut tree, parent, [a, ..]) = three_children();
    let x = alloc_element(&mut tree, "x");
    let stranger = alloc_element(&mut tree, "y");

    assert_eq!(
        tree.insert_before(parent, x, stranger),
        Err(DomError::ChildNotFound(stranger))
    );
    assert_eq!(tree.parent(x), None);
    assert_eq!(tree.first_child(parent), Ok(a));
}

#[test]
fn test_insert_before_circular() {
    let (mut tree, parent, [a, ..]) = three_children();

    assert_eq!(
        tree.insert_before(a, parent, a),
        Err(DomError::CircularReference {
            parent: a,
            child: parent
        })
    );
}

// ========== replace_child ==========

#[test]
fn test_replace_child() {
    let (mut tree, parent, [a, b, c]) = three_children();
    let x = alloc_element(&mut tree, "x");

    tree.replace_child(parent, b, x).unwrap();

    assert_eq!(tree.children(parent), &[a, x, c]);
    assert_eq!(tree.parent(b), None);
    assert_eq!(tree.parent(x), Some(parent));
}

#[test]
fn test_replace_child_not_found() {
    let (mut tree, parent, _) = three_children();
    let x = alloc_element(&mut tree, "x");
    let y = alloc_element(&mut tree, "y");

    assert_eq!(
        tree.replace_child(parent, x, y),
        Err(DomError::ChildNotFound(x))
    );
}

// ========== ancestors ==========

#[test]
fn test_ancestor_queries() {
    let (mut tree, parent, [a, ..]) = three_children();
    let leaf = tree.create_text("leaf");
    tree.add_child(a, leaf).unwrap();

    assert!(tree.is_descendant(parent, leaf));
    assert!(tree.is_ancestor(leaf, parent));
    assert!(!tree.is_ancestor(parent, leaf));
    assert_eq!(tree.get_ancestor(leaf, parent), Some(parent));
    assert_eq!(tree.get_ancestor(leaf, NodeId(999)), None);
    assert_eq!(
        tree.ancestors(leaf).collect::<Vec<_>>(),
        vec![a, parent, NodeId::ROOT]
    );
}

#[test]
fn test_ancestor_by_tag() {
    let (mut tree, parent, [a, ..]) = three_children();
    let leaf = tree.create_text("leaf");
    tree.add_child(a, leaf).unwrap();

    assert_eq!(tree.ancestor_by_tag(leaf, "DIV"), Ok(parent));
    assert_eq!(tree.ancestor_by_tag(a, "a"), Ok(a));
    assert_eq!(
        tree.ancestor_by_tag(leaf, "table"),
        Err(DomError::ParentNotFound(leaf))
    );
}

// ========== delete / set_text / import ==========

#[test]
fn test_delete_detaches_subtree() {
    let (mut tree, parent, [a, b, c]) = three_children();
    let leaf = tree.create_text("leaf");
    tree.add_child(b, leaf).unwrap();

    tree.delete(b).unwrap();

    assert_eq!(tree.children(parent), &[a, c]);
    // The subtree survives detached and can be re-attached.
    assert_eq!(tree.parent(leaf), Some(b));
    tree.add_child(c, b).unwrap();
    assert_eq!(tree.outer_html(parent), "<div><a></a><c><b>leaf</b></c></div>");
}

#[test]
fn test_delete_root_fails() {
    let mut tree = Tree::new();
    assert_eq!(
        tree.delete(NodeId::ROOT),
        Err(DomError::DocumentNode(NodeId::ROOT))
    );
}

#[test]
fn test_set_text() {
    let (mut tree, parent, [a, ..]) = three_children();
    let text = tree.create_text("old");
    tree.add_child(a, text).unwrap();

    tree.set_text(text, "new").unwrap();
    assert_eq!(tree.as_text(text), Some("new"));

    tree.set_text(parent, "flat").unwrap();
    assert_eq!(tree.outer_html(parent), "<div>flat</div>");

    let comment = tree.create_comment("c");
    assert_eq!(
        tree.set_text(comment, "x"),
        Err(DomError::NotAnElement(comment))
    );
}

#[test]
fn test_import_from_other_tree() {
    let (source, parent, _) = three_children();
    let mut target = Tree::new();
    let holder = alloc_element(&mut target, "section");
    target.add_child(NodeId::ROOT, holder).unwrap();

    let copy = target.import(&source, parent).unwrap();
    target.add_child(holder, copy).unwrap();

    assert_eq!(
        target.outer_html(NodeId::ROOT),
        "<section><div><a></a><b></b><c></c></div></section>"
    );
    // Fresh ids in pre-order after the existing ones
    assert_eq!(copy, NodeId(2));
    assert_eq!(target.children(copy), &[NodeId(3), NodeId(4), NodeId(5)]);
    // Source untouched
    assert_eq!(source.count_children(parent), 3);
}

#[test]
fn test_import_document_fails() {
    let source = Tree::new();
    let mut target = Tree::new();
    assert_eq!(
        target.import(&source, NodeId::ROOT),
        Err(DomError::DocumentNode(NodeId::ROOT))
    );
}
