use thiserror::Error;

use super::TokenClass;

/// Cursor access outside the buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    /// The requested index is at or past the end of the buffer.
    #[error("index {index} is out of bounds for a buffer of length {len}")]
    OutOfBounds {
        /// Requested index.
        index: usize,
        /// Buffer length.
        len: usize,
    },
}

/// A character buffer with a read position.
///
/// The position always satisfies `0 <= position <= len`. All scanning
/// primitives move it forward; only [`Cursor::retreat`] moves it back.
/// Indices and lengths are in `char`s, not bytes.
#[derive(Debug, Clone)]
pub struct Cursor {
    buffer: Vec<char>,
    position: usize,
}

impl Cursor {
    /// Create a cursor at the start of `input`.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self {
            buffer: input.chars().collect(),
            position: 0,
        }
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Buffer length in characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Whether the position has reached the end of the buffer.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.position >= self.buffer.len()
    }

    /// The character at an absolute index.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::OutOfBounds`] past the end of the buffer.
    pub fn char_at(&self, index: usize) -> Result<char, CursorError> {
        self.buffer
            .get(index)
            .copied()
            .ok_or(CursorError::OutOfBounds {
                index,
                len: self.buffer.len(),
            })
    }

    /// The character under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<char> {
        self.peek(0)
    }

    /// Look ahead `offset` characters without consuming.
    #[must_use]
    pub fn peek(&self, offset: usize) -> Option<char> {
        self.buffer.get(self.position + offset).copied()
    }

    /// Move forward `n` characters, stopping at the end.
    pub fn advance(&mut self, n: usize) {
        self.position = (self.position + n).min(self.buffer.len());
    }

    /// Move back `n` characters, stopping at the start.
    pub fn retreat(&mut self, n: usize) {
        self.position = self.position.saturating_sub(n);
    }

    /// Whether the next characters are exactly `literal`.
    #[must_use]
    pub fn starts_with(&self, literal: &str) -> bool {
        literal
            .chars()
            .enumerate()
            .all(|(i, expected)| self.peek(i) == Some(expected))
    }

    /// Whether the next characters match `literal`, ASCII case-insensitively.
    #[must_use]
    pub fn starts_with_ignore_case(&self, literal: &str) -> bool {
        literal
            .chars()
            .enumerate()
            .all(|(i, expected)| self.peek(i).is_some_and(|c| c.eq_ignore_ascii_case(&expected)))
    }

    /// Absolute index of the next occurrence of `marker` at or after `from`.
    fn find_literal(&self, marker: &[char], from: usize) -> Option<usize> {
        if marker.is_empty() || from > self.buffer.len() {
            return None;
        }
        self.buffer[from..]
            .windows(marker.len())
            .position(|window| window == marker)
            .map(|offset| from + offset)
    }

    /// Absolute index of the next occurrence of `marker` (from the current
    /// position), without moving.
    #[must_use]
    pub fn find(&self, marker: &str) -> Option<usize> {
        let marker: Vec<char> = marker.chars().collect();
        self.find_literal(&marker, self.position)
    }

    /// Like [`Cursor::find`] but ASCII case-insensitive.
    #[must_use]
    pub fn find_ignore_case(&self, marker: &str) -> Option<usize> {
        self.find_ignore_case_from(marker, self.position)
    }

    /// ASCII case-insensitive search for `marker` starting at absolute
    /// index `from`.
    #[must_use]
    pub fn find_ignore_case_from(&self, marker: &str, from: usize) -> Option<usize> {
        let marker: Vec<char> = marker.chars().collect();
        if marker.is_empty() {
            return None;
        }
        self.buffer
            .get(from..)?
            .windows(marker.len())
            .position(|window| {
                window
                    .iter()
                    .zip(&marker)
                    .all(|(a, b)| a.eq_ignore_ascii_case(b))
            })
            .map(|offset| from + offset)
    }

    /// Copy from the position up to (not including) the absolute index
    /// `end`, moving there. `end` is clamped to the buffer.
    pub fn copy_to(&mut self, end: usize) -> String {
        let end = end.clamp(self.position, self.buffer.len());
        let out: String = self.buffer[self.position..end].iter().collect();
        self.position = end;
        out
    }

    /// Copy up to the first occurrence of `marker`.
    ///
    /// - With `stop_at_char`, `marker` is a set and the copy stops at the
    ///   first character contained in it.
    /// - With `respect_escape`, `marker` is literal and occurrences preceded
    ///   by `\` are skipped. This takes precedence over `stop_at_char`.
    ///
    /// If the marker is not found, the remainder is returned and the cursor
    /// moves to the end. Already at the marker, or at the end, returns `""`.
    pub fn copy_until(&mut self, marker: &str, stop_at_char: bool, respect_escape: bool) -> String {
        if self.is_at_end() {
            return String::new();
        }

        let marker_chars: Vec<char> = marker.chars().collect();
        let found = if respect_escape {
            let mut from = self.position;
            loop {
                match self.find_literal(&marker_chars, from) {
                    Some(index) if index > 0 && self.buffer[index - 1] == '\\' => from = index + 1,
                    other => break other,
                }
            }
        } else if stop_at_char {
            self.buffer[self.position..]
                .iter()
                .position(|c| marker_chars.contains(c))
                .map(|offset| self.position + offset)
        } else {
            self.find_literal(&marker_chars, self.position)
        };

        self.copy_to(found.unwrap_or(self.buffer.len()))
    }

    /// Step over one character, then copy up to the next unescaped `marker`.
    ///
    /// If the copied span contains none of the characters in `unless`, the
    /// result is `marker` followed by the span. Otherwise the cursor is put
    /// back where it was and `""` is returned.
    pub fn copy_until_unless(&mut self, marker: &str, unless: &str) -> String {
        let start = self.position;
        self.advance(1);
        let span = self.copy_until(marker, true, true);
        if span.chars().any(|c| unless.contains(c)) {
            self.position = start;
            return String::new();
        }
        format!("{marker}{span}")
    }

    /// Copy until the next terminator of `class`.
    pub fn copy_by_token(&mut self, class: TokenClass) -> String {
        self.copy_until(class.terminators(), !class.is_literal(), false)
    }

    /// Skip characters contained in `charset`; returns them when `copy`.
    pub fn skip(&mut self, charset: &str, copy: bool) -> String {
        let end = self.buffer[self.position..]
            .iter()
            .position(|c| !charset.contains(*c))
            .map_or(self.buffer.len(), |offset| self.position + offset);
        if copy {
            self.copy_to(end)
        } else {
            self.position = end;
            String::new()
        }
    }

    /// Skip characters in the terminator set of `class`.
    pub fn skip_by_token(&mut self, class: TokenClass) {
        let _ = self.skip(class.terminators(), false);
    }

    /// Everything from the position to the end, without moving.
    #[must_use]
    pub fn remaining(&self) -> String {
        self.buffer[self.position..].iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_at() {
        let cursor = Cursor::new("abcde");
        assert_eq!(cursor.char_at(2), Ok('c'));
        assert_eq!(
            cursor.char_at(10),
            Err(CursorError::OutOfBounds { index: 10, len: 5 })
        );
    }

    #[test]
    fn test_advance_and_retreat_clamp() {
        let mut cursor = Cursor::new("abcde");
        cursor.advance(100);
        assert!(cursor.is_at_end());
        assert_eq!(cursor.current(), None);
        cursor.retreat(100);
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.current(), Some('a'));
    }

    #[test]
    fn test_copy_until_literal() {
        let mut cursor = Cursor::new("abcdeedcba");
        assert_eq!(cursor.copy_until("ed", false, false), "abcde");
        assert_eq!(cursor.position(), 5);
    }

    #[test]
    fn test_copy_until_char_set() {
        let mut cursor = Cursor::new("abcdeedcba");
        assert_eq!(cursor.copy_until("edc", true, false), "ab");
    }

    #[test]
    fn test_copy_until_escaped() {
        let mut cursor = Cursor::new(r#"foo\"bar"bax"#);
        assert_eq!(cursor.copy_until("\"", false, true), r#"foo\"bar"#);
        assert_eq!(cursor.current(), Some('"'));
    }

    #[test]
    fn test_copy_until_not_found() {
        let mut cursor = Cursor::new("abcde");
        assert_eq!(cursor.copy_until("z", false, false), "abcde");
        assert!(cursor.is_at_end());
        assert_eq!(cursor.copy_until("z", false, false), "");
    }

    #[test]
    fn test_copy_until_at_marker() {
        let mut cursor = Cursor::new("<a>");
        assert_eq!(cursor.copy_until("<", false, false), "");
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_copy_until_unless() {
        let mut cursor = Cursor::new(r#""test" of" href="x""#);
        assert_eq!(cursor.copy_until_unless("\"", "=>"), "\"test");
        assert_eq!(cursor.copy_until_unless("\"", "=>"), "\" of");
        let before = cursor.position();
        assert_eq!(cursor.copy_until_unless("\"", "=>"), "");
        assert_eq!(cursor.position(), before);
    }

    #[test]
    fn test_copy_by_token_attr() {
        let mut cursor = Cursor::new(r#"<a href="google.com">"#);
        cursor.advance(3);
        assert_eq!(cursor.copy_by_token(TokenClass::Attr), r#"href="google.com""#);
    }

    #[test]
    fn test_attribute_tokens_stop_at_any_blank() {
        let mut cursor = Cursor::new("disabled\tname=x\ny");
        assert_eq!(cursor.copy_by_token(TokenClass::Equal), "disabled");
        cursor.skip_by_token(TokenClass::Blank);
        assert_eq!(cursor.copy_by_token(TokenClass::Equal), "name");
        cursor.advance(1);
        assert_eq!(cursor.copy_by_token(TokenClass::Attr), "x");
        assert_eq!(cursor.current(), Some('\n'));
    }

    #[test]
    fn test_copy_by_token_close_comment() {
        let mut cursor = Cursor::new(" a - b -->rest");
        assert_eq!(cursor.copy_by_token(TokenClass::CloseComment), " a - b ");
        assert!(cursor.starts_with("-->"));
    }

    #[test]
    fn test_skip() {
        let mut cursor = Cursor::new("abcde");
        assert_eq!(cursor.skip("abcd", true), "abcd");
        assert_eq!(cursor.current(), Some('e'));

        let mut cursor = Cursor::new(" \t\n x");
        cursor.skip_by_token(TokenClass::Blank);
        assert_eq!(cursor.current(), Some('x'));
    }

    #[test]
    fn test_starts_with() {
        let cursor = Cursor::new("<!DOCTYPE html>");
        assert!(cursor.starts_with("<!"));
        assert!(!cursor.starts_with("<!doctype"));
        assert!(cursor.starts_with_ignore_case("<!doctype"));
        assert!(!cursor.starts_with("<!DOCTYPE html> and more"));
    }

    #[test]
    fn test_find_ignore_case() {
        let mut cursor = Cursor::new("x</SCRIPT>");
        assert_eq!(cursor.find_ignore_case("</script"), Some(1));
        cursor.advance(2);
        assert_eq!(cursor.find_ignore_case("</script"), None);
        assert_eq!(cursor.find(">"), Some(9));
    }

    #[test]
    fn test_multibyte_positions() {
        let mut cursor = Cursor::new("Dzień<p>");
        assert_eq!(cursor.copy_until("<", false, false), "Dzień");
        assert_eq!(cursor.position(), 5);
        assert_eq!(cursor.remaining(), "<p>");
    }
}
