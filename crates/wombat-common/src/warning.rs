//! Deduplicated warnings for recovered parse anomalies.
//!
//! Malformed markup is never an error in wombat, but callers debugging a
//! scrape still want to hear about it. Each distinct message is emitted once
//! through `tracing` so a page full of stray `</span>` tags does not flood
//! the log.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Global set of warnings we've already emitted (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Emit a warning about a recovered anomaly (once per unique message).
///
/// # Example
/// ```ignore
/// warn_once("HTML Parser", "unmatched closing tag </span> at 42");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_emit = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_emit {
        tracing::warn!(component, "{message}");
    }
}

/// Forget all recorded warnings (call when loading a new document).
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
