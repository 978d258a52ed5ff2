//! Core data types for contextflow.
//!
//! - [`ContextualRecord`] - one `(selector, name, value)` entry of a context database
//! - [`LogMessage`] - the event record an enrichment stage writes into
//! - [`PathOptions`] - routing metadata passed along with each message
//! - [`InstallPaths`] - installation directories used to resolve relative paths

mod config;
mod message;
mod record;

pub use config::{InstallPaths, DEFAULT_SYSCONFDIR, SYSCONFDIR_ENV};
pub use message::{LogMessage, PathOptions};
pub use record::ContextualRecord;
