//! Context database for contextflow enrichment.
//!
//! This crate provides the reference table that enrichment stages look
//! contextual records up in:
//! - [`ContextDatabase`] - reference-counted, load-once selector index
//! - [`MatchMode`] - exact or case-insensitive selector matching
//! - [`CsvScanner`] / [`NdjsonScanner`] - record scanners for database files
//! - [`ScannerType`] - picks a scanner from a filename extension
//!
//! # Example
//!
//! ```rust,ignore
//! use cf_context_db::{ContextDatabase, MatchMode, ScannerType};
//!
//! let db = ContextDatabase::new();
//! let mut scanner = ScannerType::from_filename("hosts.csv").unwrap().create();
//! scanner.set_name_prefix(Some("ctx.".to_string()));
//! db.load_file(Path::new("/etc/contextflow/hosts.csv"), scanner.as_ref(), MatchMode::Exact)?;
//!
//! db.for_each_record("host1", |record| println!("{}", record.name()));
//! ```

mod database;
mod loader;
mod scanner;

pub use database::{ContextDatabase, MatchMode};
pub use scanner::{CsvScanner, NdjsonScanner, ScannerType};
