//! Errors surfaced by the document facade.

use std::path::PathBuf;

use thiserror::Error;
use wombat_common::net::FetchError;
use wombat_dom::DomError;
use wombat_html::CleanError;
use wombat_select::CollectionError;

/// Failure of a load, query or registry operation.
#[derive(Debug, Error)]
pub enum Error {
    /// A query ran before any document was loaded.
    #[error("no document loaded")]
    NotLoaded,
    /// The file to load does not exist.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    /// The file exists but could not be read.
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),
    /// Fetching a URL failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// The cleanup patterns could not be compiled.
    #[error(transparent)]
    Clean(#[from] CleanError),
    /// A tree operation failed.
    #[error(transparent)]
    Dom(#[from] DomError),
    /// A single-node read on an empty result.
    #[error(transparent)]
    Collection(#[from] CollectionError),
    /// The registry was used before [`crate::registry::init`].
    #[error("document registry is not initialized")]
    RegistryNotInitialized,
    /// No document is mounted under this name.
    #[error("no document mounted as `{0}`")]
    UnknownDocument(String),
}

/// Result alias for the facade.
pub type Result<T, E = Error> = std::result::Result<T, E>;
