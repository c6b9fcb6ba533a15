//! Start tags and their attributes.

use wombat_dom::{QuoteStyle, Tag};

use super::HtmlParser;
use crate::cursor::TokenClass;

impl HtmlParser<'_> {
    /// `<name attr="v" ...>`: create the element and open it unless it is
    /// self-closing or raw text.
    pub(super) fn parse_start_tag(&mut self) {
        let start = self.cursor.position();
        self.cursor.advance(1);
        let name = self.cursor.copy_by_token(TokenClass::Slash);
        let mut tag = Tag::new(name.clone());

        let mut slash = false;
        let mut terminated = false;
        loop {
            self.cursor.skip_by_token(TokenClass::Blank);
            match self.cursor.current() {
                None => break,
                Some('>') => {
                    self.cursor.advance(1);
                    terminated = true;
                    break;
                }
                Some('/') => {
                    slash = true;
                    self.cursor.advance(1);
                }
                Some(_) => {
                    // Only a `/` right before `>` makes the tag self-closing.
                    slash = false;
                    self.parse_attribute(&mut tag);
                }
            }
        }
        if !terminated {
            self.parse_warning(start, &format!("unterminated tag <{name}>"));
        }

        let self_closing = slash || self.options.is_self_closing(&name);
        tag.set_self_closing(self_closing);
        let raw_text = !self_closing && self.options.is_raw_text(&name);

        let element = self.tree.create_element(tag);
        self.insert(element);
        if raw_text {
            if terminated {
                self.read_raw_text(element, &name);
            }
        } else if !self_closing {
            self.stack_of_open_elements.push(element);
        }
    }

    /// One `name`, `name=value`, `name="value"` or `name='value'`.
    fn parse_attribute(&mut self, tag: &mut Tag) {
        let name = self.cursor.copy_by_token(TokenClass::Equal);
        if name.is_empty() {
            // A stray `=` with no name in front of it.
            self.cursor.advance(1);
            return;
        }

        self.cursor.skip_by_token(TokenClass::Blank);
        if self.cursor.current() != Some('=') {
            tag.set_attribute(&name, None);
            return;
        }
        self.cursor.advance(1);
        self.cursor.skip_by_token(TokenClass::Blank);

        match self.cursor.current() {
            Some('"') => {
                let value = self.parse_quoted_value('"');
                tag.set_attribute_quoted(&name, Some(&value), QuoteStyle::Double);
            }
            Some('\'') => {
                let value = self.parse_quoted_value('\'');
                tag.set_attribute_quoted(&name, Some(&value), QuoteStyle::Single);
            }
            _ => {
                let value = self.cursor.copy_by_token(TokenClass::Attr);
                tag.set_attribute_quoted(&name, Some(&value), QuoteStyle::None);
            }
        }
    }

    /// Read a quoted value, starting on the opening quote.
    ///
    /// A quote inside the value ends it only if what follows up to the next
    /// quote looks like more attributes (contains `=` or `>`). That lets
    /// `title="a "b" c"` and `data-x="\""` through intact.
    fn parse_quoted_value(&mut self, quote: char) -> String {
        let start = self.cursor.position();
        let marker = quote.to_string();
        self.cursor.advance(1);

        let mut value = self.cursor.copy_until(&marker, true, false);
        while !self.cursor.is_at_end() {
            let more = self.cursor.copy_until_unless(&marker, "=>");
            if more.is_empty() {
                break;
            }
            value.push_str(&more);
        }

        if self.cursor.current() == Some(quote) {
            self.cursor.advance(1);
        } else {
            self.parse_warning(start, "unterminated attribute value");
        }
        value
    }
}
