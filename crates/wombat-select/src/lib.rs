//! CSS-like selectors over the wombat tree.
//!
//! # Scope
//!
//! - **Selectors**: type, class, id, universal, attribute tests
//!   (`= != ^= $= *=`, with `*=` also taking `/regex/flags`), a handful of
//!   structural pseudo-classes, the four combinators, and comma groups.
//! - **Collections**: ordered, duplicate-free results with bulk reads and
//!   mutations.
//!
//! Selector parsing never fails. Syntax it cannot read degrades to "no
//! condition" or "matches nothing", and is logged once.
//!
//! # Example
//!
//! ```
//! use wombat_common::Options;
//! use wombat_dom::{NodeId, Tag, Tree};
//! use wombat_select::select;
//!
//! let mut tree = Tree::new();
//! let p = tree.create_element(Tag::new("p").with_attribute("class", Some("lead")));
//! tree.add_child(NodeId::ROOT, p).unwrap();
//!
//! let found = select(&tree, NodeId::ROOT, "p.lead", &Options::default());
//! assert_eq!(found.first(), Some(p));
//! ```

/// Result collections.
pub mod collection;
/// Selector AST, parsing and matching.
pub mod selector;

use wombat_common::Options;
use wombat_dom::{NodeId, Tree};

pub use collection::{Collection, CollectionError};
pub use selector::{
    AttributeOperator, AttributeSelector, AttributeTest, Combinator, ComplexSelector,
    CompoundSelector, PseudoClass, SelectorList, SimpleSelector, ValuePattern, parse_selector,
};

/// Every element strictly below `root` that matches `selectors`, in
/// document order.
///
/// Order follows the live tree. On a freshly parsed tree that is increasing
/// id order; once nodes have been moved it is pre-order, which ids no
/// longer track.
///
/// Combinators only resolve to nodes below `root`, so `find(div, "p span")`
/// needs the `p` inside the `div`.
#[must_use]
pub fn find(tree: &Tree, root: NodeId, selectors: &SelectorList, options: &Options) -> Collection {
    if selectors.is_empty() {
        return Collection::new();
    }
    let found: Collection = tree
        .descendants(root)
        .filter(|&id| selectors.matches(tree, root, id, options))
        .collect();
    tracing::trace!(selector = %selectors, root = %root, matches = found.len(), "find");
    found
}

/// Parse `selector` and run [`find`].
#[must_use]
pub fn select(tree: &Tree, root: NodeId, selector: &str, options: &Options) -> Collection {
    find(tree, root, &parse_selector(selector), options)
}
