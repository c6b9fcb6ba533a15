//! Selector AST and matching.
//!
//! A [`SelectorList`] is a comma-separated group of [`ComplexSelector`]s. Each
//! complex selector is stored subject-first: the rightmost compound, then the
//! `(combinator, compound)` pairs walking left. Matching starts at a
//! candidate element and resolves combinators upward or sideways from it.

mod parser;

use std::fmt;

use regex::Regex;
use strum_macros::{Display, EnumString};
use wombat_common::Options;
use wombat_dom::{NodeId, NodeType, Tag, Tree};

pub use parser::parse_selector;

/// A single condition on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// `div`, `p`: tag name.
    Type(String),
    /// `.name`: one word of the `class` attribute.
    Class(String),
    /// `#name`: the `id` attribute.
    Id(String),
    /// `*`
    Universal,
    /// `[...]`
    Attribute(AttributeSelector),
    /// `:first-child` and friends.
    PseudoClass(PseudoClass),
    /// An unsupported pseudo-class. Matches nothing.
    NeverMatch,
}

/// Structural pseudo-classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum PseudoClass {
    /// An element whose parent is the document.
    Root,
    /// First element among its siblings.
    FirstChild,
    /// Last element among its siblings.
    LastChild,
    /// The only element among its siblings.
    OnlyChild,
    /// No children other than whitespace text and comments.
    Empty,
}

/// The operator inside `[name op value]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum AttributeOperator {
    /// Exact match.
    #[strum(serialize = "=")]
    Equals,
    /// Not equal, or absent.
    #[strum(serialize = "!=")]
    NotEquals,
    /// Value starts with.
    #[strum(serialize = "^=")]
    Prefix,
    /// Value ends with.
    #[strum(serialize = "$=")]
    Suffix,
    /// Value contains, or matches a `/regex/`.
    #[strum(serialize = "*=")]
    Contains,
}

/// A compiled `/pattern/flags` value.
#[derive(Debug, Clone)]
pub struct ValuePattern(Regex);

impl ValuePattern {
    /// Compile `pattern` with `/.../` style `flags`. Flags `i`, `m`, `s`
    /// and `x` are honored; anything else is ignored.
    ///
    /// # Errors
    ///
    /// Returns the regex compile error.
    pub fn new(pattern: &str, flags: &str) -> Result<Self, regex::Error> {
        let inline: String = flags
            .chars()
            .filter(|c| matches!(c, 'i' | 'm' | 's' | 'x'))
            .collect();
        let source = if inline.is_empty() {
            pattern.to_string()
        } else {
            format!("(?{inline}){pattern}")
        };
        Regex::new(&source).map(Self)
    }

    /// Whether the pattern matches anywhere in `value`.
    #[must_use]
    pub fn is_match(&self, value: &str) -> bool {
        self.0.is_match(value)
    }
}

impl PartialEq for ValuePattern {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_str() == other.0.as_str()
    }
}

impl Eq for ValuePattern {}

/// What an attribute selector requires of the attribute's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeTest {
    /// `[name]`
    Exists,
    /// `[!name]`
    Absent,
    /// `[name op value]`
    Compare(AttributeOperator, String),
    /// `[name*=*]`: present with any value.
    AnyValue,
    /// `[name*=/pattern/flags]`
    Pattern(ValuePattern),
}

/// `[...]`: a test on one attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSelector {
    /// Attribute name; compared case-insensitively.
    pub name: String,
    /// The condition.
    pub test: AttributeTest,
}

impl AttributeSelector {
    /// Check the condition against a tag.
    #[must_use]
    pub fn matches(&self, tag: &Tag) -> bool {
        let value = tag.get_attribute(&self.name);
        match &self.test {
            AttributeTest::Exists | AttributeTest::AnyValue => value.is_some(),
            AttributeTest::Absent => value.is_none(),
            AttributeTest::Pattern(pattern) => value.is_some_and(|v| pattern.is_match(v)),
            AttributeTest::Compare(op, expected) => match op {
                AttributeOperator::Equals => value == Some(expected.as_str()),
                AttributeOperator::NotEquals => value != Some(expected.as_str()),
                AttributeOperator::Prefix => value.is_some_and(|v| v.starts_with(expected.as_str())),
                AttributeOperator::Suffix => value.is_some_and(|v| v.ends_with(expected.as_str())),
                AttributeOperator::Contains => value.is_some_and(|v| {
                    v.to_lowercase().contains(&expected.to_lowercase())
                }),
            },
        }
    }
}

/// Simple selectors that must all hold for one element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompoundSelector {
    /// The conditions; an empty list matches any element.
    pub simple_selectors: Vec<SimpleSelector>,
}

/// The relationship between two compounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum Combinator {
    /// `A B`: B has an ancestor A.
    #[strum(serialize = " ")]
    Descendant,
    /// `A > B`: B's parent is A.
    #[strum(serialize = ">")]
    Child,
    /// `A + B`: the element just before B is A.
    #[strum(serialize = "+")]
    NextSibling,
    /// `A ~ B`: some element before B is A.
    #[strum(serialize = "~")]
    SubsequentSibling,
}

/// A chain of compounds joined by combinators, e.g. `ul.nav > li a`.
///
/// ```text
/// [ul.nav] --(Child)--> [li] --(Descendant)--> [a]
/// subject: a, combinators: [(Descendant, li), (Child, ul.nav)]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    /// The rightmost compound; the elements the selector returns.
    pub subject: CompoundSelector,
    /// `(combinator, compound)` pairs going left from the subject.
    pub combinators: Vec<(Combinator, CompoundSelector)>,
}

/// Comma-separated selectors; an element matches if any member does.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectorList {
    /// The group members in source order.
    pub selectors: Vec<ComplexSelector>,
}

impl SelectorList {
    /// Whether the list holds no selectors (and so matches nothing).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    /// Whether `id` matches any member, with combinators resolved no higher
    /// than `scope` (exclusive).
    #[must_use]
    pub fn matches(&self, tree: &Tree, scope: NodeId, id: NodeId, options: &Options) -> bool {
        let context = MatchContext {
            tree,
            scope,
            options,
        };
        self.selectors
            .iter()
            .any(|selector| context.matches_complex(selector, id))
    }
}

impl fmt::Display for SimpleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(name) => write!(f, "{name}"),
            Self::Class(name) => write!(f, ".{name}"),
            Self::Id(id) => write!(f, "#{id}"),
            Self::Universal => write!(f, "*"),
            Self::PseudoClass(pc) => write!(f, ":{pc}"),
            Self::NeverMatch => write!(f, ":never"),
            Self::Attribute(attr) => match &attr.test {
                AttributeTest::Exists => write!(f, "[{}]", attr.name),
                AttributeTest::Absent => write!(f, "[!{}]", attr.name),
                AttributeTest::AnyValue => write!(f, "[{}*=*]", attr.name),
                AttributeTest::Pattern(pattern) => write!(f, "[{}*=/{}/]", attr.name, pattern.0),
                AttributeTest::Compare(op, value) => write!(f, "[{}{op}\"{value}\"]", attr.name),
            },
        }
    }
}

impl fmt::Display for CompoundSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.simple_selectors.is_empty() {
            return write!(f, "*");
        }
        for simple in &self.simple_selectors {
            write!(f, "{simple}")?;
        }
        Ok(())
    }
}

impl fmt::Display for ComplexSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (combinator, compound) in self.combinators.iter().rev() {
            match combinator {
                Combinator::Descendant => write!(f, "{compound} ")?,
                _ => write!(f, "{compound} {combinator} ")?,
            }
        }
        write!(f, "{}", self.subject)
    }
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, selector) in self.selectors.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{selector}")?;
        }
        Ok(())
    }
}

/// Everything a match needs besides the selector and the candidate.
struct MatchContext<'a> {
    tree: &'a Tree,
    /// Combinators never resolve to this node or above it.
    scope: NodeId,
    options: &'a Options,
}

impl MatchContext<'_> {
    fn matches_complex(&self, selector: &ComplexSelector, id: NodeId) -> bool {
        self.matches_compound(&selector.subject, id)
            && self.matches_chain(&selector.combinators, id)
    }

    /// Resolve the combinator chain leftward from `id`. Backtracks so that
    /// `A > B C` finds a `B` with an `A` parent even when a nearer `B`
    /// ancestor has none.
    fn matches_chain(&self, chain: &[(Combinator, CompoundSelector)], id: NodeId) -> bool {
        let Some(((combinator, compound), rest)) = chain.split_first() else {
            return true;
        };
        let tree = self.tree;
        match combinator {
            Combinator::Descendant => tree
                .ancestors(id)
                .take_while(|&ancestor| ancestor != self.scope)
                .any(|ancestor| {
                    self.matches_compound(compound, ancestor) && self.matches_chain(rest, ancestor)
                }),
            Combinator::Child => tree.parent(id).is_some_and(|parent| {
                parent != self.scope
                    && self.matches_compound(compound, parent)
                    && self.matches_chain(rest, parent)
            }),
            Combinator::NextSibling => tree
                .preceding_siblings(id)
                .find(|&sibling| tree.as_element(sibling).is_some())
                .is_some_and(|sibling| {
                    self.matches_compound(compound, sibling) && self.matches_chain(rest, sibling)
                }),
            Combinator::SubsequentSibling => tree.preceding_siblings(id).any(|sibling| {
                self.matches_compound(compound, sibling) && self.matches_chain(rest, sibling)
            }),
        }
    }

    fn matches_compound(&self, compound: &CompoundSelector, id: NodeId) -> bool {
        let Some(tag) = self.tree.as_element(id) else {
            return false;
        };
        compound
            .simple_selectors
            .iter()
            .all(|simple| self.matches_simple(simple, tag, id))
    }

    fn matches_simple(&self, simple: &SimpleSelector, tag: &Tag, id: NodeId) -> bool {
        match simple {
            SimpleSelector::Type(name) => self.options.tag_names_match(tag.name(), name),
            SimpleSelector::Class(class) => tag.has_class(class),
            SimpleSelector::Id(expected) => tag.id() == Some(expected.as_str()),
            SimpleSelector::Universal => true,
            SimpleSelector::Attribute(attr) => attr.matches(tag),
            SimpleSelector::PseudoClass(pc) => self.matches_pseudo_class(*pc, id),
            SimpleSelector::NeverMatch => false,
        }
    }

    fn matches_pseudo_class(&self, pc: PseudoClass, id: NodeId) -> bool {
        let tree = self.tree;
        let element_siblings = move || {
            tree.parent(id)
                .map(|parent| tree.children(parent))
                .unwrap_or_default()
                .iter()
                .copied()
                .filter(move |&c| tree.as_element(c).is_some())
        };
        match pc {
            PseudoClass::Root => tree.parent(id) == Some(NodeId::ROOT),
            PseudoClass::FirstChild => element_siblings().next() == Some(id),
            PseudoClass::LastChild => element_siblings().last() == Some(id),
            PseudoClass::OnlyChild => {
                let mut siblings = element_siblings();
                siblings.next() == Some(id) && siblings.next().is_none()
            }
            PseudoClass::Empty => tree.children(id).iter().all(|&c| {
                match tree.get(c).map(|n| n.node_type()) {
                    Some(NodeType::Text(text)) => text.trim().is_empty(),
                    Some(NodeType::Comment(_)) => true,
                    _ => false,
                }
            }),
        }
    }
}
