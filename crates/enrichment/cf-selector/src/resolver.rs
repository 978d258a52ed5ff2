//! SelectorResolver - the two selector strategies.

use crate::config::SelectorConfig;
use crate::template::TemplateSelector;
use cf_error::SelectorError;
use cf_types::LogMessage;
use std::borrow::Cow;

/// A selector that is the same for every message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedSelector {
    value: String,
}

impl FixedSelector {
    /// Creates a fixed selector.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::Empty`] if `value` is empty.
    pub fn new(value: impl Into<String>) -> Result<Self, SelectorError> {
        let value = value.into();
        if value.is_empty() {
            return Err(SelectorError::Empty);
        }
        Ok(Self { value })
    }

    /// Returns the configured selector.
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Computes the lookup key for each message.
///
/// Cloning produces an independent resolver: template selectors get a
/// fresh engine and scope, so clones can run on different threads.
#[derive(Debug, Clone)]
pub enum SelectorResolver {
    /// Constant selector.
    Fixed(FixedSelector),

    /// Per-message Rhai expression.
    Template(TemplateSelector),
}

impl SelectorResolver {
    /// Creates a fixed selector.
    pub fn fixed(value: impl Into<String>) -> Result<Self, SelectorError> {
        FixedSelector::new(value).map(Self::Fixed)
    }

    /// Compiles a template selector.
    pub fn template(expression: impl Into<String>) -> Result<Self, SelectorError> {
        TemplateSelector::compile(expression).map(Self::Template)
    }

    /// Builds a resolver from configuration.
    pub fn from_config(config: &SelectorConfig) -> Result<Self, SelectorError> {
        match config {
            SelectorConfig::Fixed { value } => Self::fixed(value.as_str()),
            SelectorConfig::Template { expression } => Self::template(expression.as_str()),
        }
    }

    /// Prepares the resolver once the database is loaded.
    pub fn initialize(&mut self, known_selectors: &[String]) -> Result<(), SelectorError> {
        match self {
            Self::Fixed(_) => Ok(()),
            Self::Template(template) => template.initialize(known_selectors),
        }
    }

    /// Computes the selector for a message.
    pub fn resolve(&mut self, msg: &LogMessage) -> Option<Cow<'_, str>> {
        match self {
            Self::Fixed(fixed) => Some(Cow::Borrowed(fixed.value())),
            Self::Template(template) => template.resolve(msg).map(Cow::Owned),
        }
    }

    /// Returns the strategy name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fixed(_) => "fixed",
            Self::Template(_) => "template",
        }
    }
}
