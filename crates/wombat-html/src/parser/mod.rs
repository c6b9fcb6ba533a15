//! Tree construction from markup.

/// Start tags and attribute values.
mod attributes;
/// The builder loop, end tags, markup declarations and raw text.
pub mod core;

pub use self::core::{HtmlParser, ParseIssue, format_tree, parse, print_tree};
