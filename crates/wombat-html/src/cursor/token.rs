use strum_macros::Display;

/// Named terminator sets for [`super::Cursor::copy_by_token`].
///
/// Each class describes where a lexical unit of a tag ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum TokenClass {
    /// ASCII blanks: space, tab, CR, LF.
    Blank,
    /// End of an attribute name: a blank, `=`, `/` or `>`.
    Equal,
    /// End of a tag name: blank, `/` or `>`.
    Slash,
    /// End of an unquoted attribute value: a blank or `>`.
    Attr,
    /// The literal comment terminator `-->`.
    CloseComment,
}

impl TokenClass {
    /// The terminator characters, or the literal marker for
    /// [`TokenClass::CloseComment`].
    #[must_use]
    pub const fn terminators(self) -> &'static str {
        match self {
            Self::Blank => " \t\r\n",
            Self::Equal => " =/>\t\r\n",
            Self::Slash => " />\r\n\t",
            Self::Attr => " >\t\r\n",
            Self::CloseComment => "-->",
        }
    }

    /// Whether [`TokenClass::terminators`] is one literal marker rather than
    /// a set of characters.
    #[must_use]
    pub const fn is_literal(self) -> bool {
        matches!(self, Self::CloseComment)
    }
}
