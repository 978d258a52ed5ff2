//! Core traits for contextflow.
//!
//! - [`RecordScanner`] - turns a database file into [`ContextualRecord`](cf_types::ContextualRecord)s
//! - [`LogParser`] - the lifecycle contract a host pipeline drives

mod parser;
mod scanner;

pub use parser::LogParser;
pub use scanner::{RecordIter, RecordScanner};
