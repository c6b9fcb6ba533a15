//! Tolerant HTML reading for wombat.
//!
//! # Scope
//!
//! This crate implements:
//! - **Cleaner**: an optional regex pass over the raw input that drops
//!   comments, CDATA, the doctype, script and style blocks, and template
//!   tokens.
//! - **Cursor**: a character buffer with the scanning primitives the tree
//!   builder is written in terms of.
//! - **Tree builder**: a single forward pass that turns markup into a
//!   [`wombat_dom::Tree`], recovering from malformed input instead of
//!   failing.
//!
//! # Not Implemented
//!
//! - Character references (`&amp;` and friends are kept as written)
//! - Implicit tag closing (`<p>` does not close an open `<p>`)
//! - Encoding detection

/// Regex cleanup pass.
pub mod cleaner;
/// Character buffer with a read position.
pub mod cursor;
/// Tree construction.
pub mod parser;

pub use cleaner::{CleanError, clean};
pub use cursor::{Cursor, CursorError, TokenClass};
pub use parser::{HtmlParser, ParseIssue, format_tree, parse, print_tree};
