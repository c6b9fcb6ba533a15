//! Regex pre-pass run over the raw input before tree building.
//!
//! Only runs when [`Options::cleanup_input`] is set. Every pattern is
//! case-insensitive and lets `.` cross line breaks.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use wombat_common::Options;

/// A cleanup pattern failed to compile.
#[derive(Debug, Clone, Error)]
#[error("invalid cleanup pattern: {0}")]
pub struct CleanError(#[from] regex::Error);

struct Patterns {
    doctype: Regex,
    comment: Regex,
    cdata: Regex,
    script: Regex,
    style: Regex,
    smarty: Regex,
}

impl Patterns {
    fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            doctype: Regex::new(r"(?is)<!doctype(.*?)>")?,
            comment: Regex::new(r"(?is)<!--(.*?)-->")?,
            cdata: Regex::new(r"(?is)<!\[CDATA\[(.*?)\]\]>")?,
            // An opening tag with attributes must not end in `/>`.
            script: Regex::new(r"(?is)<\s*script(?:\s[^>]*[^/])?\s*>.*?<\s*/\s*script\s*>")?,
            style: Regex::new(r"(?is)<\s*style(?:\s[^>]*[^/])?\s*>.*?<\s*/\s*style\s*>")?,
            smarty: Regex::new(r"(?s)\{\w.*?\}")?,
        })
    }
}

static PATTERNS: LazyLock<Result<Patterns, regex::Error>> = LazyLock::new(Patterns::compile);

fn strip(input: String, pattern: &Regex) -> String {
    match pattern.replace_all(&input, "") {
        std::borrow::Cow::Borrowed(_) => input,
        std::borrow::Cow::Owned(out) => out,
    }
}

/// Apply the cleanup pass selected by `options`.
///
/// Line breaks become spaces (or a single `\n` each when
/// [`Options::preserve_line_breaks`] is set), then the doctype, comments,
/// CDATA sections and, per option, script blocks, style blocks and `{x...}`
/// template tokens are removed. Returns the input unchanged when
/// [`Options::cleanup_input`] is off.
///
/// # Errors
///
/// Returns [`CleanError`] if the built-in patterns fail to compile.
pub fn clean(input: &str, options: &Options) -> Result<String, CleanError> {
    if !options.cleanup_input {
        return Ok(input.to_string());
    }
    let patterns = PATTERNS.as_ref().map_err(|err| CleanError(err.clone()))?;

    let line_break = if options.preserve_line_breaks { "\n" } else { " " };
    let mut out = input.replace("\r\n", line_break).replace(['\r', '\n'], line_break);

    out = strip(out, &patterns.doctype);
    out = strip(out, &patterns.comment);
    out = strip(out, &patterns.cdata);
    if options.remove_scripts {
        out = strip(out, &patterns.script);
    }
    if options.remove_styles {
        out = strip(out, &patterns.style);
    }
    if options.remove_smarty_scripts {
        out = strip(out, &patterns.smarty);
    }

    tracing::trace!(before = input.len(), after = out.len(), "cleaned input");
    Ok(out)
}
