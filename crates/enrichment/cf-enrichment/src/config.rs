//! Configuration for the contextual data stage.

use cf_selector::SelectorConfig;
use serde::{Deserialize, Serialize};

/// Configuration for an [`AddContextualData`](crate::AddContextualData) stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextualDataConfig {
    /// Database file; relative paths are resolved against the sysconfdir.
    pub database: Option<String>,

    /// Prefix prepended to every injected field name.
    pub prefix: Option<String>,

    /// Selector used when the computed one has no records.
    pub default_selector: Option<String>,

    /// How the selector is computed.
    pub selector: Option<SelectorConfig>,

    /// Match selectors case-insensitively.
    pub ignore_case: bool,
}

impl ContextualDataConfig {
    /// Creates a config for the given database file.
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: Some(database.into()),
            ..Default::default()
        }
    }

    /// Set the field name prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set the fallback selector.
    pub fn with_default_selector(mut self, selector: impl Into<String>) -> Self {
        self.default_selector = Some(selector.into());
        self
    }

    /// Set the selector strategy.
    pub fn with_selector(mut self, selector: SelectorConfig) -> Self {
        self.selector = Some(selector);
        self
    }

    /// Enable or disable case-insensitive matching.
    pub fn with_ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }
}
