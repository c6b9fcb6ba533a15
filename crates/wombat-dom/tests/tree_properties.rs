//! Serialization, id lookup, and randomized structural properties.

use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use wombat_dom::{DomError, NodeId, QuoteStyle, Tag, Tree};

/// Build a tree from a list of `(parent_index, is_text)` instructions.
///
/// Each entry creates one node and attaches it to an earlier element (or the
/// root), so ids come out in creation order.
fn build_tree(shape: &[(u8, bool)]) -> Tree {
    let mut tree = Tree::new();
    let mut elements = vec![NodeId::ROOT];
    for (index, &(parent, is_text)) in shape.iter().enumerate() {
        let parent = elements[usize::from(parent) % elements.len()];
        let node = if is_text {
            tree.create_text(format!("t{index}"))
        } else {
            tree.create_element(Tag::new(format!("e{index}")))
        };
        tree.add_child(parent, node).unwrap();
        if !is_text {
            elements.push(node);
        }
    }
    tree
}

/// Snapshot of every node's parent and children.
fn structure(tree: &Tree) -> Vec<(Option<NodeId>, Vec<NodeId>)> {
    (0..tree.len())
        .map(NodeId)
        .map(|id| (tree.parent(id), tree.children(id).to_vec()))
        .collect()
}

// ========== serialization ==========

#[test]
fn test_outer_html_nested() {
    let mut tree = Tree::new();
    let mut div = Tag::new("div");
    div.set_attribute("class", Some("all"));
    let div = tree.create_element(div);
    let br = tree.create_element(Tag::new("br").with_self_closing(true));
    let p = tree.create_element(Tag::new("p"));
    let text = tree.create_text("Hey bro, ");
    tree.add_child(NodeId::ROOT, div).unwrap();
    tree.add_child(div, br).unwrap();
    tree.add_child(div, p).unwrap();
    tree.add_child(p, text).unwrap();

    assert_eq!(
        tree.outer_html(NodeId::ROOT),
        r#"<div class="all"><br /><p>Hey bro, </p></div>"#
    );
    assert_eq!(tree.inner_html(div), "<br /><p>Hey bro, </p>");
    assert_eq!(tree.inner_html(text), "Hey bro, ");
}

#[test]
fn test_leaf_variants_render_verbatim() {
    let mut tree = Tree::new();
    let doctype = tree.create_declaration("<!DOCTYPE html>");
    let comment = tree.create_comment(" note ");
    let cdata = tree.create_cdata("x < y");
    for node in [doctype, comment, cdata] {
        tree.add_child(NodeId::ROOT, node).unwrap();
    }

    assert_eq!(
        tree.outer_html(NodeId::ROOT),
        "<!DOCTYPE html><!-- note --><![CDATA[x < y]]>"
    );
    assert_eq!(tree.inner_text(NodeId::ROOT), "");
}

#[test]
fn test_text_recursive_and_direct() {
    let mut tree = Tree::new();
    let p = tree.create_element(Tag::new("p"));
    let a = tree.create_element(Tag::new("a"));
    let before = tree.create_text("Hey ");
    let inner = tree.create_text("click");
    let after = tree.create_text(" now");
    tree.add_child(NodeId::ROOT, p).unwrap();
    tree.add_child(p, before).unwrap();
    tree.add_child(p, a).unwrap();
    tree.add_child(a, inner).unwrap();
    tree.add_child(p, after).unwrap();

    assert_eq!(tree.text(p, false), "Hey  now");
    assert_eq!(tree.text(p, true), "Hey click now");
    assert_eq!(tree.inner_text(p), "Hey click now");
    assert_eq!(tree.text(inner, false), "click");
}

#[test]
fn test_render_reflects_mutation() {
    let mut tree = Tree::new();
    let mut tag = Tag::new("a");
    tag.set_attribute_quoted("href", Some("x"), QuoteStyle::Single);
    let a = tree.create_element(tag);
    tree.add_child(NodeId::ROOT, a).unwrap();
    assert_eq!(tree.outer_html(a), "<a href='x'></a>");

    tree.as_element_mut(a).unwrap().set_attribute("href", Some("y"));
    assert_eq!(tree.outer_html(a), r#"<a href="y"></a>"#);
}

#[test]
fn test_deep_nesting_does_not_overflow() {
    let mut tree = Tree::new();
    let mut parent = NodeId::ROOT;
    for _ in 0..5_000 {
        let child = tree.create_element(Tag::new("b"));
        tree.add_child(parent, child).unwrap();
        parent = child;
    }
    let html = tree.outer_html(NodeId::ROOT);
    assert_eq!(html.len(), 5_000 * "<b></b>".len());
}

// ========== find_by_id ==========

#[test]
fn test_find_by_id_in_parse_order() {
    let tree = build_tree(&[(0, false), (1, false), (1, true), (0, false), (2, true)]);
    for id in 0..tree.len() {
        assert_eq!(tree.find_by_id(NodeId::ROOT, NodeId(id)), Some(NodeId(id)));
    }
    assert_eq!(tree.find_by_id(NodeId::ROOT, NodeId(99)), None);
}

#[test]
fn test_find_by_id_outside_subtree() {
    let tree = build_tree(&[(0, false), (0, false), (2, true)]);
    // Node 3 lives under node 2, not under node 1
    assert_eq!(tree.find_by_id(NodeId(1), NodeId(3)), None);
    assert_eq!(tree.find_by_id(NodeId(2), NodeId(3)), Some(NodeId(3)));
}

#[test]
fn test_find_by_id_after_reordering() {
    let mut tree = build_tree(&[(0, false), (0, false), (0, false)]);
    let leaf = tree.create_text("late");
    tree.add_child(NodeId(1), leaf).unwrap();
    tree.insert_before(NodeId::ROOT, NodeId(3), NodeId(1)).unwrap();

    assert_eq!(tree.find_by_id(NodeId::ROOT, leaf), Some(leaf));
    assert_eq!(tree.find_by_id(NodeId::ROOT, NodeId(2)), Some(NodeId(2)));
}

// ========== properties ==========

#[quickcheck]
fn prop_find_by_id_equals_scan(mut shape: Vec<(u8, bool)>, moves: Vec<(u8, u8)>) -> bool {
    shape.truncate(40);
    let mut tree = build_tree(&shape);
    let len = tree.len();
    for (child, parent) in moves {
        let child = NodeId(usize::from(child) % len);
        let parent = NodeId(usize::from(parent) % len);
        let _ = tree.add_child(parent, child);
    }

    (0..len).map(NodeId).all(|start| {
        (0..len).map(NodeId).all(|target| {
            let scan = (start == target && tree.get(start).is_some())
                || tree.descendants(start).any(|d| d == target);
            tree.find_by_id(start, target) == scan.then_some(target)
        })
    })
}

#[quickcheck]
fn prop_circular_add_leaves_tree_unchanged(shape: Vec<(u8, bool)>, pick: u8) -> TestResult {
    let mut tree = build_tree(&shape);
    let elements: Vec<NodeId> = (1..tree.len())
        .map(NodeId)
        .filter(|&id| tree.as_element(id).is_some())
        .collect();
    if elements.is_empty() {
        return TestResult::discard();
    }
    let node = elements[usize::from(pick) % elements.len()];
    let Some(deepest) = std::iter::once(node)
        .chain(tree.descendants(node))
        .filter(|&id| tree.as_element(id).is_some())
        .last()
    else {
        return TestResult::discard();
    };

    let before = structure(&tree);
    let result = tree.add_child(deepest, node);
    TestResult::from_bool(
        result
            == Err(DomError::CircularReference {
                parent: deepest,
                child: node,
            })
            && structure(&tree) == before,
    )
}

#[quickcheck]
fn prop_insert_after_is_adjacent(count: u8, at: u8) -> TestResult {
    let count = usize::from(count % 16);
    if count == 0 {
        return TestResult::discard();
    }
    let shape: Vec<(u8, bool)> = vec![(0, false); count];
    let mut tree = build_tree(&shape);
    let reference = NodeId(1 + usize::from(at) % count);
    let new = tree.create_text("new");

    tree.insert_after(NodeId::ROOT, new, reference).unwrap();

    TestResult::from_bool(
        tree.count_children(NodeId::ROOT) == count + 1
            && tree.next_sibling(reference) == Ok(new)
            && tree.previous_sibling(new) == Ok(reference),
    )
}
