//! LogMessage - the event record that enrichment stages write into.

use bytes::Bytes;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// An event record: named fields holding opaque byte values.
///
/// Stages receive `&mut LogMessage` from the host, which is responsible for
/// handing over a private, writable copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogMessage {
    fields: BTreeMap<String, Bytes>,
}

impl LogMessage {
    /// Creates an empty message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field, replacing any previous value.
    pub fn set_value(&mut self, name: impl Into<String>, value: impl Into<Bytes>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Gets a field's raw value.
    pub fn get_value(&self, name: &str) -> Option<&Bytes> {
        self.fields.get(name)
    }

    /// Gets a field as UTF-8 text, if it is valid UTF-8.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(|v| std::str::from_utf8(v).ok())
    }

    /// Removes a field, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<Bytes> {
        self.fields.remove(name)
    }

    /// Returns true if the field exists.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Iterates over fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Bytes)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the message has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Parses a message from one NDJSON line.
    ///
    /// The line must hold a JSON object. String values are stored verbatim;
    /// any other value is stored as its JSON text.
    pub fn from_json_str(line: &str) -> Result<Self, serde_json::Error> {
        let object: Map<String, Value> = serde_json::from_str(line)?;
        let fields = object
            .into_iter()
            .map(|(name, value)| {
                let value = match value {
                    Value::String(s) => Bytes::from(s),
                    other => Bytes::from(other.to_string()),
                };
                (name, value)
            })
            .collect();
        Ok(Self { fields })
    }

    /// Converts the message to a JSON object, decoding values as lossy UTF-8.
    pub fn to_json_value(&self) -> Value {
        let object: Map<String, Value> = self
            .fields
            .iter()
            .map(|(name, value)| {
                (
                    name.clone(),
                    Value::String(String::from_utf8_lossy(value).into_owned()),
                )
            })
            .collect();
        Value::Object(object)
    }
}

impl<K, V> FromIterator<(K, V)> for LogMessage
where
    K: Into<String>,
    V: Into<Bytes>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut msg = Self::new();
        for (name, value) in iter {
            msg.set_value(name, value);
        }
        msg
    }
}

/// Routing and flow-control metadata travelling with a message.
///
/// Stages pass it through without inspecting it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PathOptions {
    /// The source expects an acknowledgement for this message
    pub ack_needed: bool,

    /// Flow control was requested on this path
    pub flow_control_requested: bool,
}
