//! Process-wide named documents.
//!
//! The registry does nothing until [`init`] is called, and [`reset`] tears
//! it down again. Between the two, documents are mounted under a name and
//! borrowed through closures, so the lock is never held by a caller's
//! reference. Those closures run under the lock and must not call back into
//! the registry.
//!
//! ```
//! use wombat::{Dom, registry};
//!
//! registry::init();
//! let mut dom = Dom::new();
//! dom.load_str("<p>hi</p>")?;
//! registry::mount("page", dom)?;
//! let count = registry::with_document("page", |dom| dom.count_children())??;
//! assert_eq!(count, 1);
//! registry::reset();
//! # Ok::<(), wombat::Error>(())
//! ```

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::Dom;
use crate::error::{Error, Result};

/// `None` until [`init`].
static DOCUMENTS: Mutex<Option<HashMap<String, Dom>>> = Mutex::new(None);

fn lock() -> MutexGuard<'static, Option<HashMap<String, Dom>>> {
    DOCUMENTS.lock().unwrap_or_else(PoisonError::into_inner)
}

fn with_map<R>(f: impl FnOnce(&mut HashMap<String, Dom>) -> Result<R>) -> Result<R> {
    lock().as_mut().map_or(Err(Error::RegistryNotInitialized), f)
}

/// Activate the registry. Calling it again keeps mounted documents.
pub fn init() {
    let _ = lock().get_or_insert_with(HashMap::new);
    tracing::debug!("document registry initialized");
}

/// Drop every mounted document and deactivate the registry.
pub fn reset() {
    if let Some(documents) = lock().take() {
        tracing::debug!(dropped = documents.len(), "document registry reset");
    }
}

/// Whether [`init`] has been called since the last [`reset`].
#[must_use]
pub fn is_initialized() -> bool {
    lock().is_some()
}

/// Mount `dom` under `name`, returning whatever was mounted there before.
///
/// # Errors
///
/// [`Error::RegistryNotInitialized`] outside `init`/`reset`.
pub fn mount(name: &str, dom: Dom) -> Result<Option<Dom>> {
    with_map(|documents| Ok(documents.insert(name.to_string(), dom)))
}

/// Remove and return the document mounted under `name`.
///
/// # Errors
///
/// [`Error::UnknownDocument`] when nothing is mounted there.
pub fn unmount(name: &str) -> Result<Dom> {
    with_map(|documents| {
        documents
            .remove(name)
            .ok_or_else(|| Error::UnknownDocument(name.to_string()))
    })
}

/// Names of every mounted document, sorted.
///
/// # Errors
///
/// [`Error::RegistryNotInitialized`] outside `init`/`reset`.
pub fn names() -> Result<Vec<String>> {
    with_map(|documents| {
        let mut names: Vec<String> = documents.keys().cloned().collect();
        names.sort();
        Ok(names)
    })
}

/// Run `f` against the document mounted under `name`.
///
/// # Errors
///
/// [`Error::UnknownDocument`] when nothing is mounted there.
pub fn with_document<R>(name: &str, f: impl FnOnce(&Dom) -> R) -> Result<R> {
    with_map(|documents| {
        documents
            .get(name)
            .map(f)
            .ok_or_else(|| Error::UnknownDocument(name.to_string()))
    })
}

/// Run `f` against the document mounted under `name`, mutably.
///
/// # Errors
///
/// [`Error::UnknownDocument`] when nothing is mounted there.
pub fn with_document_mut<R>(name: &str, f: impl FnOnce(&mut Dom) -> R) -> Result<R> {
    with_map(|documents| {
        documents
            .get_mut(name)
            .map(f)
            .ok_or_else(|| Error::UnknownDocument(name.to_string()))
    })
}
