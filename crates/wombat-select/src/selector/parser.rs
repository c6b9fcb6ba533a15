//! Selector string parsing.
//!
//! Parsing never fails. Unknown characters are skipped, unknown pseudo-classes
//! become [`SimpleSelector::NeverMatch`], and a bracket that cannot be read
//! (empty name, unknown operator, bad regex) adds no condition at all.

use std::iter::Peekable;
use std::str::{Chars, FromStr};

use wombat_common::warning::warn_once;

use super::{
    AttributeOperator, AttributeSelector, AttributeTest, Combinator, ComplexSelector,
    CompoundSelector, PseudoClass, SelectorList, SimpleSelector, ValuePattern,
};

type Input<'a> = Peekable<Chars<'a>>;

/// Characters allowed in tag, class, id and attribute names.
const fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || !c.is_ascii()
}

fn read_ident(chars: &mut Input<'_>) -> String {
    let mut ident = String::new();
    while let Some(c) = chars.next_if(|&c| is_ident_char(c)) {
        ident.push(c);
    }
    ident
}

fn skip_whitespace(chars: &mut Input<'_>) {
    while chars.next_if(char::is_ascii_whitespace).is_some() {}
}

/// Split on commas that are outside brackets, parentheses and quotes.
fn split_groups(raw: &str) -> Vec<String> {
    let mut groups = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for c in raw.chars() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') if depth > 0 => quote = Some(c),
            (None, '[' | '(') => depth += 1,
            (None, ']' | ')') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                groups.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    groups.push(current);
    groups
}

/// Parse a selector string into a [`SelectorList`].
///
/// Supports:
/// - Type, class, id and universal selectors: `div`, `.a`, `#b`, `*`
/// - Compounds: `div.a.b#c[x]`
/// - Combinators: `A B`, `A > B`, `A + B`, `A ~ B`
/// - Attributes: `[a]`, `[!a]`, `[a=v]`, `[a!=v]`, `[a^=v]`, `[a$=v]`,
///   `[a*=v]`, `[a*=*]`, `[a*=/pattern/flags]`, values bare or quoted
/// - Pseudo-classes: `:root`, `:first-child`, `:last-child`, `:only-child`,
///   `:empty`
/// - Groups: `A, B`
#[must_use]
pub fn parse_selector(raw: &str) -> SelectorList {
    let selectors = split_groups(raw)
        .iter()
        .filter_map(|group| parse_complex(group))
        .collect();
    SelectorList { selectors }
}

/// Collects compounds and the combinators between them, left to right.
#[derive(Default)]
struct ChainBuilder {
    compounds: Vec<CompoundSelector>,
    combinators: Vec<Combinator>,
    current: Vec<SimpleSelector>,
    pending: Option<Combinator>,
}

impl ChainBuilder {
    /// Close the current compound, if it has anything in it.
    fn finish_compound(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let combinator = self.pending.take();
        if !self.compounds.is_empty() {
            self.combinators
                .push(combinator.unwrap_or(Combinator::Descendant));
        }
        self.compounds.push(CompoundSelector {
            simple_selectors: std::mem::take(&mut self.current),
        });
    }

    fn build(mut self) -> Option<ComplexSelector> {
        self.finish_compound();
        let subject = self.compounds.pop()?;
        let combinators = self
            .compounds
            .into_iter()
            .zip(self.combinators)
            .rev()
            .map(|(compound, combinator)| (combinator, compound))
            .collect();
        Some(ComplexSelector {
            subject,
            combinators,
        })
    }
}

fn parse_complex(raw: &str) -> Option<ComplexSelector> {
    let mut chars = raw.trim().chars().peekable();
    let mut chain = ChainBuilder::default();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_ascii_whitespace() => chain.finish_compound(),
            '>' | '+' | '~' => {
                chain.finish_compound();
                chain.pending = Combinator::from_str(&c.to_string()).ok();
            }
            '.' => {
                let class = read_ident(&mut chars);
                if !class.is_empty() {
                    chain.current.push(SimpleSelector::Class(class));
                }
            }
            '#' => {
                let id = read_ident(&mut chars);
                if !id.is_empty() {
                    chain.current.push(SimpleSelector::Id(id));
                }
            }
            '*' => chain.current.push(SimpleSelector::Universal),
            '[' => {
                if let Some(attr) = parse_attribute(&mut chars) {
                    chain.current.push(SimpleSelector::Attribute(attr));
                }
            }
            ':' => chain.current.push(parse_pseudo(&mut chars)),
            c if is_ident_char(c) => {
                let mut name = c.to_string();
                name.push_str(&read_ident(&mut chars));
                chain.current.push(SimpleSelector::Type(name));
            }
            other => warn_once("Selector", &format!("ignoring '{other}' in selector {raw:?}")),
        }
    }

    chain.build()
}

/// After `:`. Functional and unknown pseudo-classes and pseudo-elements
/// never match.
fn parse_pseudo(chars: &mut Input<'_>) -> SimpleSelector {
    let is_pseudo_element = chars.next_if_eq(&':').is_some();
    let name = read_ident(chars);

    let mut has_arguments = false;
    if chars.next_if_eq(&'(').is_some() {
        has_arguments = true;
        let mut depth = 1u32;
        for c in chars.by_ref() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
        }
    }

    if is_pseudo_element || has_arguments {
        return SimpleSelector::NeverMatch;
    }
    match PseudoClass::from_str(&name) {
        Ok(pc) => SimpleSelector::PseudoClass(pc),
        Err(_) => {
            warn_once("Selector", &format!("unsupported pseudo-class :{name}"));
            SimpleSelector::NeverMatch
        }
    }
}

/// After `[`. Consumes through the closing `]`. Returns `None` when the
/// bracket should impose no condition.
fn parse_attribute(chars: &mut Input<'_>) -> Option<AttributeSelector> {
    skip_whitespace(chars);
    let _ = chars.next_if_eq(&'@');
    let negated = chars.next_if_eq(&'!').is_some();
    let mut name = String::new();
    while let Some(c) = chars.next_if(|&c| is_ident_char(c) || c == ':') {
        name.push(c);
    }
    skip_whitespace(chars);

    // Operator: an optional symbol followed by `=`.
    let mut op = String::new();
    let is_symbol = |&c: &char| c != '=' && c != ']' && !c.is_alphanumeric() && !c.is_whitespace();
    if let Some(c) = chars.next_if(is_symbol) {
        op.push(c);
    }
    if chars.next_if_eq(&'=').is_some() {
        op.push('=');
    }

    let test = if op.is_empty() {
        skip_past_bracket(chars);
        if negated {
            AttributeTest::Absent
        } else {
            AttributeTest::Exists
        }
    } else {
        skip_whitespace(chars);
        let test = parse_attribute_value(chars, &op);
        skip_past_bracket(chars);
        test?
    };

    if name.is_empty() {
        warn_once("Selector", "attribute selector without a name");
        return None;
    }
    Some(AttributeSelector { name, test })
}

/// Read the value after the operator and turn the pair into a test.
fn parse_attribute_value(chars: &mut Input<'_>, op: &str) -> Option<AttributeTest> {
    let Ok(operator) = AttributeOperator::from_str(op) else {
        warn_once("Selector", &format!("unknown attribute operator {op}"));
        return None;
    };

    match chars.peek() {
        Some(&q @ ('"' | '\'')) => {
            let _ = chars.next();
            let value: String = chars.by_ref().take_while(|&c| c != q).collect();
            Some(AttributeTest::Compare(operator, value))
        }
        Some('/') if operator == AttributeOperator::Contains => {
            let _ = chars.next();
            let mut pattern = String::new();
            while let Some(c) = chars.next() {
                match c {
                    '/' => break,
                    '\\' => {
                        pattern.push(c);
                        if let Some(escaped) = chars.next() {
                            pattern.push(escaped);
                        }
                    }
                    _ => pattern.push(c),
                }
            }
            let mut flags = String::new();
            while let Some(c) = chars.next_if(char::is_ascii_alphabetic) {
                flags.push(c);
            }
            match ValuePattern::new(&pattern, &flags) {
                Ok(compiled) => Some(AttributeTest::Pattern(compiled)),
                Err(err) => {
                    warn_once("Selector", &format!("invalid pattern /{pattern}/: {err}"));
                    None
                }
            }
        }
        _ => {
            let mut value = String::new();
            while let Some(c) = chars.next_if(|&c| c != ']') {
                value.push(c);
            }
            let value = value.trim_end().to_string();
            if operator == AttributeOperator::Contains && value == "*" {
                Some(AttributeTest::AnyValue)
            } else {
                Some(AttributeTest::Compare(operator, value))
            }
        }
    }
}

fn skip_past_bracket(chars: &mut Input<'_>) {
    for c in chars.by_ref() {
        if c == ']' {
            break;
        }
    }
}
