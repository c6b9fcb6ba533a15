//! Input acquisition: string, file or URL, then cleanup and tree building.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use wombat_common::Options;
use wombat_common::net::HttpClient;
use wombat_common::warning::clear_warnings;
use wombat_dom::Tree;
use wombat_html::ParseIssue;

use crate::error::{Error, Result};

/// Read a document from disk. Bytes that are not UTF-8 are replaced.
pub(crate) fn read_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => Error::FileNotFound(path.to_path_buf()),
        _ => Error::Io(err),
    })?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "read document");
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Fetch a document through `client`.
pub(crate) fn fetch(url: &str, client: &dyn HttpClient) -> Result<String> {
    let body = client.get_text(url)?;
    tracing::debug!(url, bytes = body.len(), "fetched document");
    Ok(body)
}

/// Clean `html` according to `options` and build its tree.
pub(crate) fn build(html: &str, options: &Options) -> Result<(Tree, Vec<ParseIssue>)> {
    clear_warnings();
    let cleaned = wombat_html::clean(html, options)?;
    let (tree, issues) = wombat_html::parse(&cleaned, options);
    tracing::debug!(nodes = tree.len(), issues = issues.len(), "built document");
    Ok((tree, issues))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file() {
        let path = Path::new("/definitely/not/here.html");
        assert!(matches!(read_file(path), Err(Error::FileNotFound(p)) if p == path));
    }

    #[test]
    fn test_build_applies_cleanup() {
        let (tree, issues) = build("<p>a</p><!-- gone --><script>x</script>", &Options::default())
            .unwrap();
        assert!(issues.is_empty());
        assert_eq!(tree.outer_html(wombat_dom::NodeId::ROOT), "<p>a</p>");
    }
}
