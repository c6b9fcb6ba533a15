//! Common utilities for wombat.
//!
//! This crate provides shared infrastructure used by every wombat crate:
//! - **Options** - the parse/cleanup configuration snapshot and per-call overrides
//! - **Warning System** - deduplicated reporting of recovered parse anomalies
//! - **Network** - the `HttpClient` seam used to fetch documents by URL

pub mod net;
pub mod options;
pub mod warning;

pub use options::{Options, OptionsOverride};
