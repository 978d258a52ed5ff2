//! Record scanners for context database files.

mod csv;
mod ndjson;

pub use self::csv::CsvScanner;
pub use self::ndjson::NdjsonScanner;

use cf_traits::RecordScanner;
use std::path::Path;

/// Database file formats, detected from the filename extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScannerType {
    /// `selector,name,value` rows without a header
    Csv,
    /// One `{"selector", "name", "value"}` object per line
    Ndjson,
}

impl ScannerType {
    /// Maps a file extension (without the dot) to a scanner type.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "ndjson" | "jsonl" => Some(Self::Ndjson),
            _ => None,
        }
    }

    /// Detects the scanner type from a filename's extension.
    pub fn from_filename(filename: impl AsRef<Path>) -> Option<Self> {
        filename
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Creates a fresh scanner of this type.
    pub fn create(self) -> Box<dyn RecordScanner> {
        match self {
            Self::Csv => Box::new(CsvScanner::new()),
            Self::Ndjson => Box::new(NdjsonScanner::new()),
        }
    }
}
