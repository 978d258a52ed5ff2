//! NdjsonScanner - one JSON object per line.

use bytes::Bytes;
use cf_error::ScannerError;
use cf_traits::{RecordIter, RecordScanner};
use cf_types::ContextualRecord;
use serde::Deserialize;
use serde_json::Value;
use std::io::BufRead;

#[derive(Debug, Deserialize)]
struct RawRecord {
    selector: String,
    name: String,
    value: Value,
}

/// Scans newline-delimited JSON objects of the form
/// `{"selector": "...", "name": "...", "value": ...}`.
///
/// String values are stored verbatim; any other JSON value is stored as
/// its JSON text. Blank lines are skipped.
#[derive(Debug, Default)]
pub struct NdjsonScanner {
    name_prefix: Option<String>,
}

impl NdjsonScanner {
    /// Creates a scanner without a name prefix.
    pub fn new() -> Self {
        Self::default()
    }

    fn parse_line(&self, line: &str, line_number: u64) -> Result<ContextualRecord, ScannerError> {
        let raw: RawRecord = serde_json::from_str(line).map_err(|e| ScannerError::Json {
            line: line_number,
            reason: e.to_string(),
        })?;

        if raw.selector.is_empty() {
            return Err(ScannerError::InvalidRecord {
                line: line_number,
                reason: "empty selector".to_string(),
            });
        }
        if raw.name.is_empty() {
            return Err(ScannerError::InvalidRecord {
                line: line_number,
                reason: "empty field name".to_string(),
            });
        }

        let value = match raw.value {
            Value::String(s) => Bytes::from(s),
            other => Bytes::from(other.to_string()),
        };

        Ok(ContextualRecord::new(
            raw.selector,
            self.prefixed_name(&raw.name),
            value,
        ))
    }
}

impl RecordScanner for NdjsonScanner {
    fn set_name_prefix(&mut self, prefix: Option<String>) {
        self.name_prefix = prefix;
    }

    fn name_prefix(&self) -> Option<&str> {
        self.name_prefix.as_deref()
    }

    fn scan<'a>(&'a self, input: Box<dyn BufRead + 'a>) -> RecordIter<'a> {
        Box::new(input.lines().enumerate().filter_map(move |(idx, line)| {
            let line_number = idx as u64 + 1;
            match line {
                Ok(line) if line.trim().is_empty() => None,
                Ok(line) => Some(self.parse_line(line.trim(), line_number)),
                Err(e) => Some(Err(ScannerError::Io(format!(
                    "failed to read line {line_number}: {e}"
                )))),
            }
        }))
    }

    fn name(&self) -> &str {
        "ndjson"
    }
}
