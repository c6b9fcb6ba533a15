//! Element tags: name, ordered attributes, and the self-closing flag.

use strum_macros::Display;

use crate::DomError;

/// How an attribute value was quoted in the source.
///
/// Preserved so that serialization reproduces the input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display)]
pub enum QuoteStyle {
    /// `name="value"`
    #[default]
    Double,
    /// `name='value'`
    Single,
    /// `name=value`
    None,
}

/// A single attribute on a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name, in the case it was first written.
    pub name: String,
    /// `None` for a valueless attribute such as `selected`.
    pub value: Option<String>,
    /// Quote style used when rendering the value.
    pub quote: QuoteStyle,
}

impl Attribute {
    /// Render as it appears inside an opening tag, without the leading space.
    #[must_use]
    pub fn render(&self) -> String {
        let Some(value) = &self.value else {
            return self.name.clone();
        };
        match self.quote {
            QuoteStyle::Single => format!("{}='{value}'", self.name),
            QuoteStyle::None if is_safe_unquoted(value) => format!("{}={value}", self.name),
            QuoteStyle::None if value.contains('"') && !value.contains('\'') => {
                format!("{}='{value}'", self.name)
            }
            QuoteStyle::Double | QuoteStyle::None => format!("{}=\"{value}\"", self.name),
        }
    }
}

/// An unquoted value must re-read as the same single token.
fn is_safe_unquoted(value: &str) -> bool {
    !value.is_empty()
        && !value
            .chars()
            .any(|c| c.is_ascii_whitespace() || matches!(c, '"' | '\'' | '>'))
}

/// The tag of an element node.
///
/// Names and attribute keys compare ASCII case-insensitively but keep the
/// spelling they were created with for output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    name: String,
    attributes: Vec<Attribute>,
    self_closing: bool,
}

impl Tag {
    /// Create a tag with no attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            self_closing: false,
        }
    }

    /// Builder form of [`Tag::set_self_closing`].
    #[must_use]
    pub fn with_self_closing(mut self, self_closing: bool) -> Self {
        self.self_closing = self_closing;
        self
    }

    /// Builder form of [`Tag::set_attribute`].
    #[must_use]
    pub fn with_attribute(mut self, name: &str, value: Option<&str>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// The tag name as written.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the tag.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// ASCII case-insensitive name comparison.
    #[must_use]
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Whether the tag renders as `<name ... />` with no closing tag.
    #[must_use]
    pub const fn is_self_closing(&self) -> bool {
        self.self_closing
    }

    /// Set the self-closing flag.
    pub fn set_self_closing(&mut self, self_closing: bool) {
        self.self_closing = self_closing;
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.attributes
            .iter()
            .position(|attr| attr.name.eq_ignore_ascii_case(name))
    }

    /// Set an attribute, rendered with double quotes.
    ///
    /// An existing attribute keeps its position and original name spelling.
    pub fn set_attribute(&mut self, name: &str, value: Option<&str>) {
        self.set_attribute_quoted(name, value, QuoteStyle::Double);
    }

    /// Set an attribute with an explicit quote style.
    pub fn set_attribute_quoted(&mut self, name: &str, value: Option<&str>, quote: QuoteStyle) {
        let value = value.map(str::to_string);
        match self.position(name) {
            Some(index) => {
                let attr = &mut self.attributes[index];
                attr.value = value;
                attr.quote = quote;
            }
            None => self.attributes.push(Attribute {
                name: name.to_string(),
                value,
                quote,
            }),
        }
    }

    /// Set several attributes at once, all double-quoted.
    pub fn set_attributes<'a, I>(&mut self, attributes: I)
    where
        I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
    {
        for (name, value) in attributes {
            self.set_attribute(name, value);
        }
    }

    /// Look up an attribute.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::AttributeNotFound`] if the tag has no such attribute.
    pub fn attribute(&self, name: &str) -> Result<&Attribute, DomError> {
        self.position(name)
            .map(|index| &self.attributes[index])
            .ok_or_else(|| DomError::AttributeNotFound(name.to_string()))
    }

    /// The value of an attribute; a valueless attribute reads as `""`.
    #[must_use]
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.position(name)
            .map(|index| self.attributes[index].value.as_deref().unwrap_or(""))
    }

    /// Whether the attribute is present (with or without a value).
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Remove an attribute. Removing an absent attribute is a no-op.
    pub fn remove_attribute(&mut self, name: &str) {
        if let Some(index) = self.position(name) {
            let _ = self.attributes.remove(index);
        }
    }

    /// Remove every attribute.
    pub fn remove_all_attributes(&mut self) {
        self.attributes.clear();
    }

    /// All attributes in insertion order.
    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// The `id` attribute.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.get_attribute("id")
    }

    /// The whitespace-separated tokens of the `class` attribute.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.get_attribute("class")
            .unwrap_or("")
            .split_ascii_whitespace()
    }

    /// Whether `class` contains the given token (case-sensitive).
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|token| token == class)
    }

    /// The `style` attribute as ordered `(property, value)` pairs.
    ///
    /// Declarations without a `:` and empty property names are skipped.
    #[must_use]
    pub fn style(&self) -> Vec<(String, String)> {
        self.get_attribute("style")
            .unwrap_or("")
            .split(';')
            .filter_map(|declaration| {
                let (property, value) = declaration.split_once(':')?;
                let property = property.trim();
                if property.is_empty() {
                    return None;
                }
                Some((property.to_string(), value.trim().to_string()))
            })
            .collect()
    }

    /// Set one style property and regenerate the `style` attribute.
    pub fn set_style_property(&mut self, property: &str, value: &str) {
        let mut style = self.style();
        match style.iter_mut().find(|(p, _)| p.eq_ignore_ascii_case(property)) {
            Some(entry) => entry.1 = value.to_string(),
            None => style.push((property.to_string(), value.to_string())),
        }
        self.write_style(&style);
    }

    /// Remove one style property and regenerate the `style` attribute.
    ///
    /// The attribute itself is removed once no property is left.
    pub fn remove_style_property(&mut self, property: &str) {
        let mut style = self.style();
        style.retain(|(p, _)| !p.eq_ignore_ascii_case(property));
        if style.is_empty() {
            self.remove_attribute("style");
        } else {
            self.write_style(&style);
        }
    }

    fn write_style(&mut self, style: &[(String, String)]) {
        let rendered: String = style
            .iter()
            .map(|(property, value)| format!("{property}:{value};"))
            .collect();
        self.set_attribute("style", Some(&rendered));
    }

    /// Render the opening tag, e.g. `<a href="x" hidden>` or `<br />`.
    #[must_use]
    pub fn make_opening_tag(&self) -> String {
        let mut out = format!("<{}", self.name);
        for attr in &self.attributes {
            out.push(' ');
            out.push_str(&attr.render());
        }
        out.push_str(if self.self_closing { " />" } else { ">" });
        out
    }

    /// Render the closing tag; empty for self-closing tags.
    #[must_use]
    pub fn make_closing_tag(&self) -> String {
        if self.self_closing {
            String::new()
        } else {
            format!("</{}>", self.name)
        }
    }
}
