//! CsvScanner - `selector,name,value` rows.

use bytes::Bytes;
use cf_error::ScannerError;
use cf_traits::{RecordIter, RecordScanner};
use cf_types::ContextualRecord;
use csv::{ByteRecord, ReaderBuilder};
use std::io::BufRead;

const COLUMNS: usize = 3;

/// Scans headerless CSV with exactly three columns per row.
///
/// Standard CSV quoting applies, so values may contain commas, quotes and
/// newlines. The value column is kept as raw bytes; selector and name must
/// be UTF-8. Empty lines are skipped.
#[derive(Debug, Default)]
pub struct CsvScanner {
    name_prefix: Option<String>,
}

impl CsvScanner {
    /// Creates a scanner without a name prefix.
    pub fn new() -> Self {
        Self::default()
    }

    fn convert(&self, result: csv::Result<ByteRecord>) -> Result<ContextualRecord, ScannerError> {
        let record = result.map_err(csv_error)?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.len() != COLUMNS {
            return Err(ScannerError::InvalidRecord {
                line,
                reason: format!(
                    "expected {COLUMNS} columns (selector,name,value), found {}",
                    record.len()
                ),
            });
        }

        let selector = utf8_column(&record[0], "selector", line)?;
        let name = utf8_column(&record[1], "name", line)?;

        if selector.is_empty() {
            return Err(ScannerError::InvalidRecord {
                line,
                reason: "empty selector".to_string(),
            });
        }
        if name.is_empty() {
            return Err(ScannerError::InvalidRecord {
                line,
                reason: "empty field name".to_string(),
            });
        }

        Ok(ContextualRecord::new(
            selector,
            self.prefixed_name(name),
            Bytes::copy_from_slice(&record[2]),
        ))
    }
}

impl RecordScanner for CsvScanner {
    fn set_name_prefix(&mut self, prefix: Option<String>) {
        self.name_prefix = prefix;
    }

    fn name_prefix(&self) -> Option<&str> {
        self.name_prefix.as_deref()
    }

    fn scan<'a>(&'a self, input: Box<dyn BufRead + 'a>) -> RecordIter<'a> {
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(input);

        Box::new(
            reader
                .into_byte_records()
                .map(move |result| self.convert(result)),
        )
    }

    fn name(&self) -> &str {
        "csv"
    }
}

fn utf8_column<'r>(raw: &'r [u8], column: &str, line: u64) -> Result<&'r str, ScannerError> {
    std::str::from_utf8(raw).map_err(|e| ScannerError::InvalidRecord {
        line,
        reason: format!("{column} is not valid UTF-8: {e}"),
    })
}

fn csv_error(error: csv::Error) -> ScannerError {
    if error.is_io_error() {
        return ScannerError::Io(error.to_string());
    }

    ScannerError::Csv {
        line: error.position().map(|p| p.line()).unwrap_or(0),
        reason: error.to_string(),
    }
}
