//! Contextual data enrichment for contextflow.
//!
//! This crate provides the pipeline-facing enrichment stage:
//! - [`AddContextualData`] - looks up a selector per message and merges the
//!   matching name/value pairs into it
//! - [`ContextualDataConfig`] - serde configuration for the stage
//! - [`EnrichmentStats`] - per-instance counters
//!
//! # Example
//!
//! ```rust,ignore
//! use cf_enrichment::AddContextualData;
//! use cf_types::InstallPaths;
//!
//! let mut stage = AddContextualData::new(InstallPaths::from_env());
//! stage.set_filename("hosts.csv");
//! stage.set_selector_template("record.host")?;
//! stage.set_default_selector("unknown");
//! stage.initialize()?;
//!
//! let mut worker = stage.clone();
//! worker.initialize()?;
//! worker.process(&mut msg, &PathOptions::default());
//! ```

mod config;
mod stage;
mod stats;

pub use config::ContextualDataConfig;
pub use stage::AddContextualData;
pub use stats::{EnrichmentStats, StatsSnapshot};
