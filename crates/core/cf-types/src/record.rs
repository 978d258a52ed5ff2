//! ContextualRecord - a single entry of a context database.

use bytes::Bytes;

/// One `(selector, name, value)` entry.
///
/// The value is opaque: it is not required to be UTF-8 and may contain
/// embedded NUL bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextualRecord {
    selector: String,
    name: String,
    value: Bytes,
}

impl ContextualRecord {
    /// Creates a new record.
    pub fn new(selector: impl Into<String>, name: impl Into<String>, value: impl Into<Bytes>) -> Self {
        Self {
            selector: selector.into(),
            name: name.into(),
            value: value.into(),
        }
    }

    /// Returns the selector this record is filed under.
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Returns the field name injected into matching messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the raw field value.
    pub fn value(&self) -> &Bytes {
        &self.value
    }
}
