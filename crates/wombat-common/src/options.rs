//! Parse and cleanup configuration.
//!
//! An [`Options`] value is the read-only snapshot the parser and the cleaner
//! consult. A document keeps one as its default; individual load calls may
//! layer an [`OptionsOverride`] on top of it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Tags that never have content or a closing tag in HTML.
const DEFAULT_SELF_CLOSING: [&str; 17] = [
    "area", "base", "basefont", "br", "col", "embed", "hr", "img", "input", "keygen", "link",
    "meta", "param", "source", "spacer", "track", "wbr",
];

/// Tags whose content is copied verbatim up to the literal closing tag.
const DEFAULT_RAW_TEXT: [&str; 2] = ["script", "style"];

fn tag_set(tags: &[&str]) -> BTreeSet<String> {
    tags.iter().map(|tag| (*tag).to_string()).collect()
}

/// Configuration snapshot for parsing and pre-parse cleanup.
///
/// Tag names in the sets are stored lowercase; lookups are ASCII
/// case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Drop text runs that consist only of whitespace.
    pub remove_whitespace_text_nodes: bool,
    /// Collapse every run of whitespace inside text to a single space.
    pub remove_double_space: bool,
    /// Keep line breaks when whitespace is collapsed or cleaned.
    pub preserve_line_breaks: bool,
    /// Elements that never take children (`<br>`, `<img>`, ...).
    pub self_closing_tags: BTreeSet<String>,
    /// Elements whose content is raw text (`<script>`, `<style>`).
    pub raw_text_tags: BTreeSet<String>,
    /// Compare tag names exactly instead of ASCII case-insensitively.
    pub case_sensitive_tag_matching: bool,
    /// Run the cleaner over the input before parsing.
    pub cleanup_input: bool,
    /// Cleaner: strip `<script>` blocks.
    pub remove_scripts: bool,
    /// Cleaner: strip `<style>` blocks.
    pub remove_styles: bool,
    /// Cleaner: strip `{x...}` template-engine tokens.
    pub remove_smarty_scripts: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            remove_whitespace_text_nodes: false,
            remove_double_space: true,
            preserve_line_breaks: false,
            self_closing_tags: tag_set(&DEFAULT_SELF_CLOSING),
            raw_text_tags: tag_set(&DEFAULT_RAW_TEXT),
            case_sensitive_tag_matching: false,
            cleanup_input: true,
            remove_scripts: true,
            remove_styles: true,
            remove_smarty_scripts: true,
        }
    }
}

impl Options {
    /// Create the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `name` is configured as a self-closing tag.
    #[must_use]
    pub fn is_self_closing(&self, name: &str) -> bool {
        self.self_closing_tags.contains(&name.to_ascii_lowercase())
    }

    /// Whether `name` is configured as a raw-text tag.
    #[must_use]
    pub fn is_raw_text(&self, name: &str) -> bool {
        self.raw_text_tags.contains(&name.to_ascii_lowercase())
    }

    /// Compare two tag names under the configured case sensitivity.
    #[must_use]
    pub fn tag_names_match(&self, a: &str, b: &str) -> bool {
        if self.case_sensitive_tag_matching {
            a == b
        } else {
            a.eq_ignore_ascii_case(b)
        }
    }

    /// Add one tag to the self-closing set.
    #[must_use]
    pub fn add_self_closing_tag(mut self, tag: &str) -> Self {
        let _ = self.self_closing_tags.insert(tag.to_ascii_lowercase());
        self
    }

    /// Add several tags to the self-closing set.
    #[must_use]
    pub fn add_self_closing_tags<'a, I>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.self_closing_tags
            .extend(tags.into_iter().map(str::to_ascii_lowercase));
        self
    }

    /// Remove one tag from the self-closing set.
    #[must_use]
    pub fn remove_self_closing_tag(mut self, tag: &str) -> Self {
        let _ = self.self_closing_tags.remove(&tag.to_ascii_lowercase());
        self
    }

    /// Empty the self-closing set.
    #[must_use]
    pub fn clear_self_closing_tags(mut self) -> Self {
        self.self_closing_tags.clear();
        self
    }

    /// Set [`Options::remove_whitespace_text_nodes`].
    #[must_use]
    pub fn with_remove_whitespace_text_nodes(mut self, value: bool) -> Self {
        self.remove_whitespace_text_nodes = value;
        self
    }

    /// Set [`Options::remove_double_space`].
    #[must_use]
    pub fn with_remove_double_space(mut self, value: bool) -> Self {
        self.remove_double_space = value;
        self
    }

    /// Set [`Options::preserve_line_breaks`].
    #[must_use]
    pub fn with_preserve_line_breaks(mut self, value: bool) -> Self {
        self.preserve_line_breaks = value;
        self
    }

    /// Set [`Options::case_sensitive_tag_matching`].
    #[must_use]
    pub fn with_case_sensitive_tag_matching(mut self, value: bool) -> Self {
        self.case_sensitive_tag_matching = value;
        self
    }

    /// Set [`Options::cleanup_input`].
    #[must_use]
    pub fn with_cleanup_input(mut self, value: bool) -> Self {
        self.cleanup_input = value;
        self
    }

    /// Set [`Options::remove_scripts`].
    #[must_use]
    pub fn with_remove_scripts(mut self, value: bool) -> Self {
        self.remove_scripts = value;
        self
    }

    /// Set [`Options::remove_styles`].
    #[must_use]
    pub fn with_remove_styles(mut self, value: bool) -> Self {
        self.remove_styles = value;
        self
    }

    /// Set [`Options::remove_smarty_scripts`].
    #[must_use]
    pub fn with_remove_smarty_scripts(mut self, value: bool) -> Self {
        self.remove_smarty_scripts = value;
        self
    }

    /// Resolve a per-call override against these defaults.
    #[must_use]
    pub fn merged(&self, overrides: &OptionsOverride) -> Self {
        Self {
            remove_whitespace_text_nodes: overrides
                .remove_whitespace_text_nodes
                .unwrap_or(self.remove_whitespace_text_nodes),
            remove_double_space: overrides
                .remove_double_space
                .unwrap_or(self.remove_double_space),
            preserve_line_breaks: overrides
                .preserve_line_breaks
                .unwrap_or(self.preserve_line_breaks),
            self_closing_tags: overrides
                .self_closing_tags
                .clone()
                .unwrap_or_else(|| self.self_closing_tags.clone()),
            raw_text_tags: overrides
                .raw_text_tags
                .clone()
                .unwrap_or_else(|| self.raw_text_tags.clone()),
            case_sensitive_tag_matching: overrides
                .case_sensitive_tag_matching
                .unwrap_or(self.case_sensitive_tag_matching),
            cleanup_input: overrides.cleanup_input.unwrap_or(self.cleanup_input),
            remove_scripts: overrides.remove_scripts.unwrap_or(self.remove_scripts),
            remove_styles: overrides.remove_styles.unwrap_or(self.remove_styles),
            remove_smarty_scripts: overrides
                .remove_smarty_scripts
                .unwrap_or(self.remove_smarty_scripts),
        }
    }
}

/// Per-call override: every `Some` field replaces the document default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionsOverride {
    /// Override for [`Options::remove_whitespace_text_nodes`].
    pub remove_whitespace_text_nodes: Option<bool>,
    /// Override for [`Options::remove_double_space`].
    pub remove_double_space: Option<bool>,
    /// Override for [`Options::preserve_line_breaks`].
    pub preserve_line_breaks: Option<bool>,
    /// Override for [`Options::self_closing_tags`].
    pub self_closing_tags: Option<BTreeSet<String>>,
    /// Override for [`Options::raw_text_tags`].
    pub raw_text_tags: Option<BTreeSet<String>>,
    /// Override for [`Options::case_sensitive_tag_matching`].
    pub case_sensitive_tag_matching: Option<bool>,
    /// Override for [`Options::cleanup_input`].
    pub cleanup_input: Option<bool>,
    /// Override for [`Options::remove_scripts`].
    pub remove_scripts: Option<bool>,
    /// Override for [`Options::remove_styles`].
    pub remove_styles: Option<bool>,
    /// Override for [`Options::remove_smarty_scripts`].
    pub remove_smarty_scripts: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_self_closing_contains_br() {
        let options = Options::default();
        assert!(options.is_self_closing("br"));
        assert!(options.is_self_closing("BR"));
        assert!(!options.is_self_closing("div"));
    }

    #[test]
    fn test_self_closing_edits() {
        let options = Options::default()
            .add_self_closing_tag("MyTag")
            .remove_self_closing_tag("br");
        assert!(options.is_self_closing("mytag"));
        assert!(!options.is_self_closing("br"));

        let cleared = options.clear_self_closing_tags();
        assert!(cleared.self_closing_tags.is_empty());
    }

    #[test]
    fn test_override_only_replaces_given_fields() {
        let defaults = Options::default().with_remove_whitespace_text_nodes(true);
        let merged = defaults.merged(&OptionsOverride {
            remove_whitespace_text_nodes: Some(false),
            ..OptionsOverride::default()
        });
        assert!(!merged.remove_whitespace_text_nodes);
        assert_eq!(merged.self_closing_tags, defaults.self_closing_tags);
        assert!(merged.cleanup_input);
    }

    #[test]
    fn test_deserialize_partial_json() {
        let options: Options =
            serde_json::from_str(r#"{"cleanup_input": false, "raw_text_tags": ["script"]}"#)
                .unwrap();
        assert!(!options.cleanup_input);
        assert!(options.is_raw_text("script"));
        assert!(!options.is_raw_text("style"));
        assert!(options.remove_double_space);
    }
}
