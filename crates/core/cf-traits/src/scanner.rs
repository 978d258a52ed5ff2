//! Record scanner trait for context database files.

use cf_error::ScannerError;
use cf_types::ContextualRecord;
use std::io::BufRead;

/// Sequence of scanned records. Scanning stops at the first error.
pub type RecordIter<'a> = Box<dyn Iterator<Item = Result<ContextualRecord, ScannerError>> + 'a>;

/// Parses one input stream into contextual records.
///
/// Implementations own the file format; the database only consumes the
/// record sequence. A scanner is dropped by its caller once scanning is
/// over, whatever the outcome.
pub trait RecordScanner: Send {
    /// Sets the prefix prepended to every produced field name.
    fn set_name_prefix(&mut self, prefix: Option<String>);

    /// Returns the currently configured name prefix.
    fn name_prefix(&self) -> Option<&str>;

    /// Scans the input, yielding records in file order.
    fn scan<'a>(&'a self, input: Box<dyn BufRead + 'a>) -> RecordIter<'a>;

    /// Returns the name of this scanner for logging.
    fn name(&self) -> &str {
        "scanner"
    }

    /// Applies the configured prefix to a field name.
    fn prefixed_name(&self, name: &str) -> String {
        match self.name_prefix() {
            Some(prefix) => format!("{prefix}{name}"),
            None => name.to_string(),
        }
    }
}
