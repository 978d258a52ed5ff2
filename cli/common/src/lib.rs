//! Shared utilities for contextflow CLI binaries.

pub mod args;
pub mod format;
pub mod logging;

pub use args::LogLevel;
pub use format::{format_count, format_rate};
pub use logging::init_logging;
