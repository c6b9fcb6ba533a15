use std::fmt::Write as _;

use wombat_common::Options;
use wombat_common::warning::warn_once;
use wombat_dom::{NodeId, NodeType, Tree};

use crate::cursor::{Cursor, TokenClass};

/// A recovered anomaly in the input.
///
/// Malformed markup never fails a parse. Each point where the builder had
/// to guess is recorded here and logged once through the warning module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// What was wrong.
    pub message: String,
    /// Character offset in the input where the anomaly starts.
    pub position: usize,
}

/// Characters after `<` that may start a tag name.
pub(super) fn is_name_start(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | ':')
}

/// Collapse each whitespace run to one space, or to `\n` when the run holds
/// a line break and line breaks are preserved.
fn collapse_whitespace(text: &str, preserve_line_breaks: bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run: Option<bool> = None;
    for c in text.chars() {
        if c.is_ascii_whitespace() {
            run = Some(run.unwrap_or(false) || c == '\n');
            continue;
        }
        if let Some(has_newline) = run.take() {
            out.push(if has_newline && preserve_line_breaks { '\n' } else { ' ' });
        }
        out.push(c);
    }
    if let Some(has_newline) = run {
        out.push(if has_newline && preserve_line_breaks { '\n' } else { ' ' });
    }
    out
}

/// Builds a [`Tree`] from markup with best-effort recovery.
///
/// The builder keeps a stack of open elements. Text accumulates until the
/// next node is created, start tags open elements (unless self-closing or
/// raw text), and end tags close the nearest open element with a matching
/// name. Closing tags that match nothing are dropped.
pub struct HtmlParser<'a> {
    pub(super) cursor: Cursor,
    pub(super) options: &'a Options,
    pub(super) tree: Tree,
    /// Innermost element last. The document is implied below the bottom.
    pub(super) stack_of_open_elements: Vec<NodeId>,
    pending_text: String,
    issues: Vec<ParseIssue>,
}

impl<'a> HtmlParser<'a> {
    /// Create a builder over `input`.
    #[must_use]
    pub fn new(input: &str, options: &'a Options) -> Self {
        Self {
            cursor: Cursor::new(input),
            options,
            tree: Tree::new(),
            stack_of_open_elements: Vec::new(),
            pending_text: String::new(),
            issues: Vec::new(),
        }
    }

    /// Run the builder and return the tree.
    #[must_use]
    pub fn run(self) -> Tree {
        self.run_with_issues().0
    }

    /// Run the builder and return the tree together with every recovered
    /// anomaly.
    #[must_use]
    pub fn run_with_issues(mut self) -> (Tree, Vec<ParseIssue>) {
        // Every iteration consumes at least one character.
        while !self.cursor.is_at_end() {
            if self.cursor.current() == Some('<') {
                if !self.parse_markup() {
                    // A `<` that opens nothing is plain text.
                    self.pending_text.push('<');
                    self.cursor.advance(1);
                }
            } else {
                let text = self.cursor.copy_until("<", false, false);
                self.pending_text.push_str(&text);
            }
        }
        self.flush_text();

        let unclosed = std::mem::take(&mut self.stack_of_open_elements);
        for id in unclosed.into_iter().rev() {
            if let Some(tag) = self.tree.as_element(id) {
                let message = format!("<{}> closed at end of input", tag.name());
                self.parse_warning(self.cursor.position(), &message);
            }
        }

        tracing::debug!(
            nodes = self.tree.len(),
            issues = self.issues.len(),
            "finished building tree"
        );
        (self.tree, self.issues)
    }

    /// Record a recovered anomaly.
    pub(super) fn parse_warning(&mut self, position: usize, message: &str) {
        warn_once("HTML Parser", &format!("{message} (at {position})"));
        self.issues.push(ParseIssue {
            message: message.to_string(),
            position,
        });
    }

    /// The element new nodes are appended to.
    pub(super) fn current_node(&self) -> NodeId {
        self.stack_of_open_elements
            .last()
            .copied()
            .unwrap_or(NodeId::ROOT)
    }

    /// Append a freshly created node to the current node.
    pub(super) fn insert(&mut self, node: NodeId) {
        let parent = self.current_node();
        if let Err(err) = self.tree.add_child(parent, node) {
            let position = self.cursor.position();
            self.parse_warning(position, &err.to_string());
        }
    }

    /// Emit the accumulated text run as a text node, subject to the
    /// whitespace options.
    pub(super) fn flush_text(&mut self) {
        if self.pending_text.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.pending_text);
        if self.options.remove_whitespace_text_nodes && text.trim().is_empty() {
            return;
        }
        let text = if self.options.remove_double_space {
            collapse_whitespace(&text, self.options.preserve_line_breaks)
        } else {
            text
        };
        let node = self.tree.create_text(text);
        self.insert(node);
    }

    /// Dispatch on the markup at a `<`. Returns false when the `<` does not
    /// open anything and must be read as text.
    fn parse_markup(&mut self) -> bool {
        if self.cursor.starts_with("<!--") {
            self.flush_text();
            self.parse_comment();
        } else if self.cursor.starts_with_ignore_case("<![CDATA[") {
            self.flush_text();
            self.parse_cdata();
        } else if self.cursor.starts_with("<!") {
            self.flush_text();
            self.parse_declaration();
        } else if self.cursor.starts_with("<?") {
            self.flush_text();
            self.parse_processing_instruction();
        } else if self.cursor.starts_with("</") && self.cursor.peek(2).is_some_and(is_name_start) {
            self.parse_end_tag();
        } else if self.cursor.peek(1).is_some_and(is_name_start) {
            self.flush_text();
            self.parse_start_tag();
        } else {
            return false;
        }
        true
    }

    /// Copy up to `terminator`, consuming it. Records an issue and copies
    /// the rest of the input when it is missing.
    fn copy_through(&mut self, terminator: &str, what: &str, start: usize) -> (String, bool) {
        let body = self.cursor.copy_until(terminator, false, false);
        if self.cursor.starts_with(terminator) {
            self.cursor.advance(terminator.chars().count());
            (body, true)
        } else {
            self.parse_warning(start, &format!("unterminated {what}"));
            (body, false)
        }
    }

    /// `<!-- ... -->`
    fn parse_comment(&mut self) {
        let start = self.cursor.position();
        self.cursor.advance(4);
        let (data, _) = self.copy_through(TokenClass::CloseComment.terminators(), "comment", start);
        let node = self.tree.create_comment(data);
        self.insert(node);
    }

    /// `<![CDATA[ ... ]]>`
    fn parse_cdata(&mut self) {
        let start = self.cursor.position();
        self.cursor.advance("<![CDATA[".len());
        let (data, _) = self.copy_through("]]>", "CDATA section", start);
        let node = self.tree.create_cdata(data);
        self.insert(node);
    }

    /// `<!DOCTYPE ...>` and other `<!...>` markup, kept verbatim.
    fn parse_declaration(&mut self) {
        let start = self.cursor.position();
        self.cursor.advance(2);
        let (body, _) = self.copy_through(">", "declaration", start);
        let markup = format!("<!{body}>");
        let node = self.tree.create_declaration(markup);
        self.insert(node);
    }

    /// `<?xml ... ?>`, kept verbatim. Ends at `?>`, or at `>` if there is
    /// no `?>`. An unterminated one is closed with `>`.
    fn parse_processing_instruction(&mut self) {
        let start = self.cursor.position();
        let end = match (self.cursor.find("?>"), self.cursor.find(">")) {
            (Some(end), _) => Some(end + 2),
            (None, Some(end)) => Some(end + 1),
            (None, None) => None,
        };
        let markup = match end {
            Some(end) => self.cursor.copy_to(end),
            None => {
                self.parse_warning(start, "unterminated processing instruction");
                let len = self.cursor.len();
                self.cursor.copy_to(len) + ">"
            }
        };
        let node = self.tree.create_declaration(markup);
        self.insert(node);
    }

    /// `</name ...>`: close the nearest open element called `name`.
    ///
    /// A closing tag that closes nothing leaves no node behind, so the text
    /// on either side of it stays one run.
    fn parse_end_tag(&mut self) {
        let start = self.cursor.position();
        self.cursor.advance(2);
        let name = self.cursor.copy_by_token(TokenClass::Slash);
        let _ = self.copy_through(">", "closing tag", start);

        if self.options.is_self_closing(&name) {
            self.guard_text_join(start);
            return;
        }

        let options = self.options;
        let matching = self.stack_of_open_elements.iter().rposition(|&id| {
            self.tree
                .as_element(id)
                .is_some_and(|tag| options.tag_names_match(tag.name(), &name))
        });
        match matching {
            Some(index) => {
                self.flush_text();
                self.stack_of_open_elements.truncate(index);
            }
            None => {
                self.parse_warning(start, &format!("unmatched closing tag </{name}>"));
                self.guard_text_join(start);
            }
        }
    }

    /// Escape a `<` left dangling at the end of the text run when the text
    /// that resumes after a dropped closing tag would turn it into markup.
    fn guard_text_join(&mut self, position: usize) {
        let opens_markup = if self.pending_text.ends_with("</") {
            self.cursor.current().is_some_and(is_name_start)
        } else if self.pending_text.ends_with('<') {
            match self.cursor.current() {
                Some('!' | '?') => true,
                Some('/') => self.cursor.peek(1).is_some_and(is_name_start),
                Some(c) => is_name_start(c),
                None => false,
            }
        } else {
            false
        };
        if !opens_markup {
            return;
        }
        if let Some(at) = self.pending_text.rfind('<') {
            self.pending_text.replace_range(at..=at, "&lt;");
            self.parse_warning(position, "stray '<' escaped before joined text");
        }
    }

    /// Copy the content of a raw-text element verbatim up to its closing
    /// tag, then consume the closing tag.
    pub(super) fn read_raw_text(&mut self, element: NodeId, name: &str) {
        let start = self.cursor.position();
        let close = format!("</{name}");
        let close_len = close.chars().count();

        let mut from = start;
        let end = loop {
            match self.cursor.find_ignore_case_from(&close, from) {
                Some(index) => {
                    let after = self.cursor.char_at(index + close_len).ok();
                    if after.is_none_or(|c| c.is_ascii_whitespace() || matches!(c, '/' | '>')) {
                        break Some(index);
                    }
                    from = index + 1;
                }
                None => break None,
            }
        };

        let text = match end {
            Some(end) => self.cursor.copy_to(end),
            None => {
                self.parse_warning(start, &format!("unterminated <{name}> content"));
                let len = self.cursor.len();
                self.cursor.copy_to(len)
            }
        };
        if !text.is_empty() {
            let node = self.tree.create_text(text);
            if let Err(err) = self.tree.add_child(element, node) {
                self.parse_warning(start, &err.to_string());
            }
        }
        if end.is_some() {
            let _ = self.copy_through(">", "closing tag", start);
        }
    }
}

/// Parse `input` into a tree, returning the recovered anomalies alongside.
#[must_use]
pub fn parse(input: &str, options: &Options) -> (Tree, Vec<ParseIssue>) {
    HtmlParser::new(input, options).run_with_issues()
}

/// Render a tree as an indented outline, one node per line.
#[must_use]
pub fn format_tree(tree: &Tree, id: NodeId) -> String {
    let mut out = String::new();
    let mut stack = vec![(id, 0usize)];
    while let Some((id, depth)) = stack.pop() {
        let Some(node) = tree.get(id) else {
            continue;
        };
        let prefix = "  ".repeat(depth);
        let _ = match node.node_type() {
            NodeType::Document => writeln!(out, "{prefix}Document"),
            NodeType::Element(tag) => writeln!(out, "{prefix}{}", tag.make_opening_tag()),
            NodeType::Text(data) => {
                let display = data.replace('\n', "\\n").replace(' ', "\u{00B7}");
                writeln!(out, "{prefix}\"{display}\"")
            }
            NodeType::Comment(data) => writeln!(out, "{prefix}<!--{data}-->"),
            NodeType::CData(data) => writeln!(out, "{prefix}<![CDATA[{data}]]>"),
            NodeType::Declaration(markup) => writeln!(out, "{prefix}{markup}"),
        };
        stack.extend(node.children().iter().rev().map(|&c| (c, depth + 1)));
    }
    out
}

/// Print a tree for debugging.
pub fn print_tree(tree: &Tree, id: NodeId) {
    print!("{}", format_tree(tree, id));
}
