//! Configuration types for selectors.

use serde::{Deserialize, Serialize};

/// How the lookup key is computed for each message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SelectorConfig {
    /// The same key for every message.
    Fixed {
        /// Selector value
        value: String,
    },

    /// A Rhai expression evaluated against each message.
    ///
    /// The message fields are available as the `record` map, and the known
    /// database selectors as the `selectors` array.
    Template {
        /// Rhai expression source
        expression: String,
    },
}

impl SelectorConfig {
    /// Creates a fixed selector config.
    pub fn fixed(value: impl Into<String>) -> Self {
        Self::Fixed {
            value: value.into(),
        }
    }

    /// Creates a template selector config.
    pub fn template(expression: impl Into<String>) -> Self {
        Self::Template {
            expression: expression.into(),
        }
    }
}
