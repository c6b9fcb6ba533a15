//! Character cursor used by the tree builder.
//!
//! The cursor knows nothing about HTML. It offers bounded lookahead, forward
//! and backward movement, and "copy until" scanning over a token class or a
//! literal marker.

/// Cursor state and scanning primitives.
pub mod core;
/// Terminator classes for token scanning.
pub mod token;

pub use self::core::{Cursor, CursorError};
pub use token::TokenClass;
