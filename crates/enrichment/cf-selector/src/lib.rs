//! Selector resolution for contextflow enrichment.
//!
//! A selector is the key an enrichment stage looks up in its context
//! database. This crate provides the two interchangeable strategies:
//! - [`SelectorResolver::Fixed`] - a constant configured up front
//! - [`SelectorResolver::Template`] - a Rhai expression evaluated per message
//!
//! # Example
//!
//! ```rust,ignore
//! use cf_selector::SelectorResolver;
//!
//! let mut selector = SelectorResolver::template(r#"to_lowercase(record.host)"#)?;
//! selector.initialize(db.ordered_selectors())?;
//!
//! let key = selector.resolve(&msg);
//! ```

mod builtin;
mod config;
mod resolver;
mod template;

pub use config::SelectorConfig;
pub use resolver::{FixedSelector, SelectorResolver};
pub use template::TemplateSelector;
