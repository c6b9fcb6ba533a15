//! Rendering nodes back to markup and extracting their text.
//!
//! Output is computed on every call; nothing is cached, so mutations are
//! always reflected.

use crate::{NodeId, NodeType, Tree};

enum Step {
    Open(NodeId),
    Close(NodeId),
}

impl Tree {
    /// Render a node and everything below it.
    ///
    /// The document renders as its children. Unknown ids render as `""`.
    #[must_use]
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    /// Render the children of a node. Leaves render as themselves.
    #[must_use]
    pub fn inner_html(&self, id: NodeId) -> String {
        let Some(node) = self.get(id) else {
            return String::new();
        };
        if !node.node_type().is_container() {
            return self.outer_html(id);
        }
        let mut out = String::new();
        for &child in node.children() {
            self.write_html(child, &mut out);
        }
        out
    }

    /// Iterative so that deeply nested garbage cannot overflow the stack.
    fn write_html(&self, id: NodeId, out: &mut String) {
        let mut stack = vec![Step::Open(id)];
        while let Some(step) = stack.pop() {
            match step {
                Step::Open(id) => {
                    let Some(node) = self.get(id) else {
                        continue;
                    };
                    match node.node_type() {
                        NodeType::Document => {}
                        NodeType::Element(tag) => {
                            out.push_str(&tag.make_opening_tag());
                            if tag.is_self_closing() {
                                continue;
                            }
                        }
                        NodeType::Text(text) => {
                            out.push_str(text);
                            continue;
                        }
                        NodeType::Comment(data) => {
                            out.push_str("<!--");
                            out.push_str(data);
                            out.push_str("-->");
                            continue;
                        }
                        NodeType::CData(data) => {
                            out.push_str("<![CDATA[");
                            out.push_str(data);
                            out.push_str("]]>");
                            continue;
                        }
                        NodeType::Declaration(markup) => {
                            out.push_str(markup);
                            continue;
                        }
                    }
                    stack.push(Step::Close(id));
                    stack.extend(node.children().iter().rev().map(|&c| Step::Open(c)));
                }
                Step::Close(id) => {
                    if let Some(tag) = self.as_element(id) {
                        out.push_str(&tag.make_closing_tag());
                    }
                }
            }
        }
    }

    /// The character data of a node.
    ///
    /// For a text node, its payload. For an element or the document, the
    /// concatenated text children; with `recursive`, the text of every
    /// descendant in document order. Comments, CDATA and declarations
    /// contribute nothing.
    #[must_use]
    pub fn text(&self, id: NodeId, recursive: bool) -> String {
        if let Some(text) = self.as_text(id) {
            return text.to_string();
        }
        if recursive {
            self.descendants(id)
                .filter_map(|d| self.as_text(d))
                .collect()
        } else {
            self.children(id)
                .iter()
                .filter_map(|&c| self.as_text(c))
                .collect()
        }
    }

    /// All text below a node, in document order.
    #[must_use]
    pub fn inner_text(&self, id: NodeId) -> String {
        self.text(id, true)
    }
}
