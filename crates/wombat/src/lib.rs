//! Load, query and edit tolerant HTML documents.
//!
//! # Scope
//!
//! This crate provides:
//! - **Document Loading** - from a string, a file or a URL, with the
//!   optional cleanup pass applied first
//! - **Queries** - selectors, id/tag/class lookups and the serialized views
//!   of the whole document
//! - **Registry** - named documents shared across a process, with an
//!   explicit `init`/`reset` lifecycle
//!
//! # Example
//!
//! ```
//! use wombat::Dom;
//!
//! let mut dom = Dom::new();
//! dom.load_str(r#"<div class="all"><p>Hey bro, <a href="google.com">click here</a></p></div>"#)?;
//! let link = dom.find_nth("a", 0)?.expect("one link");
//! assert_eq!(dom.tree()?.inner_html(link), "click here");
//! # Ok::<(), wombat::Error>(())
//! ```

pub mod error;
mod loader;
pub mod registry;

use std::fmt;
use std::path::Path;

pub use wombat_common as common;
pub use wombat_dom as dom;
pub use wombat_html as html;
pub use wombat_select as select;

pub use error::{Error, Result};
pub use wombat_common::{Options, OptionsOverride};
pub use wombat_select::Collection;

use wombat_common::net::HttpClient;
use wombat_dom::{NodeId, Tree};
use wombat_html::ParseIssue;

/// A parsed document and the options it was built with.
#[derive(Debug, Clone)]
struct Document {
    tree: Tree,
    options: Options,
    issues: Vec<ParseIssue>,
}

/// A document handle: default options plus, once loaded, the tree.
///
/// Every query fails with [`Error::NotLoaded`] until one of the `load_*`
/// methods succeeds. Loading again replaces the previous tree.
#[derive(Debug, Clone, Default)]
pub struct Dom {
    options: Options,
    document: Option<Document>,
}

impl Dom {
    /// An empty handle with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty handle with the given default options.
    #[must_use]
    pub fn with_options(options: Options) -> Self {
        Self {
            options,
            document: None,
        }
    }

    /// Replace the default options used by later loads.
    pub fn set_options(&mut self, options: Options) {
        self.options = options;
    }

    /// Default options for later loads.
    #[must_use]
    pub const fn options(&self) -> &Options {
        &self.options
    }

    // ========== loading ==========

    /// Parse `html` with the default options.
    ///
    /// # Errors
    ///
    /// [`Error::Clean`] if the cleanup patterns fail to compile.
    pub fn load_str(&mut self, html: &str) -> Result<()> {
        self.load_str_with(html, &OptionsOverride::default())
    }

    /// Parse `html` with `overrides` merged over the default options.
    ///
    /// # Errors
    ///
    /// [`Error::Clean`] if the cleanup patterns fail to compile.
    pub fn load_str_with(&mut self, html: &str, overrides: &OptionsOverride) -> Result<()> {
        let options = self.options.merged(overrides);
        let (tree, issues) = loader::build(html, &options)?;
        self.document = Some(Document {
            tree,
            options,
            issues,
        });
        Ok(())
    }

    /// Read and parse a file.
    ///
    /// # Errors
    ///
    /// [`Error::FileNotFound`] or [`Error::Io`] when the file can't be read.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.load_file_with(path, &OptionsOverride::default())
    }

    /// Read and parse a file with per-call overrides.
    ///
    /// # Errors
    ///
    /// [`Error::FileNotFound`] or [`Error::Io`] when the file can't be read.
    pub fn load_file_with(
        &mut self,
        path: impl AsRef<Path>,
        overrides: &OptionsOverride,
    ) -> Result<()> {
        let html = loader::read_file(path.as_ref())?;
        self.load_str_with(&html, overrides)
    }

    /// Fetch and parse a URL.
    ///
    /// # Errors
    ///
    /// [`Error::Fetch`] when the request fails.
    pub fn load_url(&mut self, url: &str, client: &dyn HttpClient) -> Result<()> {
        self.load_url_with(url, client, &OptionsOverride::default())
    }

    /// Fetch and parse a URL with per-call overrides.
    ///
    /// # Errors
    ///
    /// [`Error::Fetch`] when the request fails.
    pub fn load_url_with(
        &mut self,
        url: &str,
        client: &dyn HttpClient,
        overrides: &OptionsOverride,
    ) -> Result<()> {
        let html = loader::fetch(url, client)?;
        self.load_str_with(&html, overrides)
    }

    // ========== state ==========

    /// Whether a document has been loaded.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.document.is_some()
    }

    fn document(&self) -> Result<&Document> {
        self.document.as_ref().ok_or(Error::NotLoaded)
    }

    /// The loaded tree.
    ///
    /// # Errors
    ///
    /// [`Error::NotLoaded`] before the first load.
    pub fn tree(&self) -> Result<&Tree> {
        Ok(&self.document()?.tree)
    }

    /// The loaded tree, for mutation.
    ///
    /// # Errors
    ///
    /// [`Error::NotLoaded`] before the first load.
    pub fn tree_mut(&mut self) -> Result<&mut Tree> {
        self.document
            .as_mut()
            .map(|doc| &mut doc.tree)
            .ok_or(Error::NotLoaded)
    }

    /// The options the loaded tree was built with (defaults plus overrides).
    ///
    /// # Errors
    ///
    /// [`Error::NotLoaded`] before the first load.
    pub fn effective_options(&self) -> Result<&Options> {
        Ok(&self.document()?.options)
    }

    /// Anomalies recovered from while building the loaded tree.
    ///
    /// # Errors
    ///
    /// [`Error::NotLoaded`] before the first load.
    pub fn issues(&self) -> Result<&[ParseIssue]> {
        Ok(&self.document()?.issues)
    }

    /// The document node.
    ///
    /// # Errors
    ///
    /// [`Error::NotLoaded`] before the first load.
    pub fn root(&self) -> Result<NodeId> {
        Ok(self.tree()?.root())
    }

    // ========== queries ==========

    /// Every element matching `selector`, in document order.
    ///
    /// # Errors
    ///
    /// [`Error::NotLoaded`] before the first load.
    pub fn find(&self, selector: &str) -> Result<Collection> {
        let doc = self.document()?;
        Ok(wombat_select::select(
            &doc.tree,
            NodeId::ROOT,
            selector,
            &doc.options,
        ))
    }

    /// The `n`th element (zero-based) matching `selector`.
    ///
    /// # Errors
    ///
    /// [`Error::NotLoaded`] before the first load.
    pub fn find_nth(&self, selector: &str, n: usize) -> Result<Option<NodeId>> {
        Ok(self.find(selector)?.get(n))
    }

    /// The first element whose `id` attribute is `id`.
    ///
    /// # Errors
    ///
    /// [`Error::NotLoaded`] before the first load.
    pub fn get_element_by_id(&self, id: &str) -> Result<Option<NodeId>> {
        let tree = self.tree()?;
        Ok(tree
            .descendants(NodeId::ROOT)
            .find(|&node| tree.as_element(node).and_then(|tag| tag.id()) == Some(id)))
    }

    /// Every element named `name`.
    ///
    /// # Errors
    ///
    /// [`Error::NotLoaded`] before the first load.
    pub fn get_elements_by_tag(&self, name: &str) -> Result<Collection> {
        let doc = self.document()?;
        let tree = &doc.tree;
        Ok(tree
            .descendants(NodeId::ROOT)
            .filter(|&node| {
                tree.as_element(node)
                    .is_some_and(|tag| doc.options.tag_names_match(tag.name(), name))
            })
            .collect())
    }

    /// Every element carrying `class`.
    ///
    /// # Errors
    ///
    /// [`Error::NotLoaded`] before the first load.
    pub fn get_elements_by_class(&self, class: &str) -> Result<Collection> {
        let tree = self.tree()?;
        Ok(tree
            .descendants(NodeId::ROOT)
            .filter(|&node| tree.as_element(node).is_some_and(|tag| tag.has_class(class)))
            .collect())
    }

    /// Number of top-level nodes.
    ///
    /// # Errors
    ///
    /// [`Error::NotLoaded`] before the first load.
    pub fn count_children(&self) -> Result<usize> {
        Ok(self.tree()?.count_children(NodeId::ROOT))
    }

    /// Whether the document has any top-level node.
    ///
    /// # Errors
    ///
    /// [`Error::NotLoaded`] before the first load.
    pub fn has_children(&self) -> Result<bool> {
        Ok(self.tree()?.has_children(NodeId::ROOT))
    }

    /// The whole document as markup.
    ///
    /// # Errors
    ///
    /// [`Error::NotLoaded`] before the first load.
    pub fn outer_html(&self) -> Result<String> {
        Ok(self.tree()?.outer_html(NodeId::ROOT))
    }

    /// Markup of the document's children. Same as [`Dom::outer_html`], the
    /// document node has no markup of its own.
    ///
    /// # Errors
    ///
    /// [`Error::NotLoaded`] before the first load.
    pub fn inner_html(&self) -> Result<String> {
        Ok(self.tree()?.inner_html(NodeId::ROOT))
    }

    /// All text in the document.
    ///
    /// # Errors
    ///
    /// [`Error::NotLoaded`] before the first load.
    pub fn inner_text(&self) -> Result<String> {
        Ok(self.tree()?.inner_text(NodeId::ROOT))
    }
}

impl fmt::Display for Dom {
    /// Renders nothing when no document is loaded.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.document {
            Some(doc) => f.write_str(&doc.tree.outer_html(NodeId::ROOT)),
            None => Ok(()),
        }
    }
}
