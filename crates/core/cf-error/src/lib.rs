//! Error types for contextflow.
//!
//! This crate provides:
//! - [`CfError`] - Top-level error enum for the enrichment stage
//! - Domain-specific errors ([`InitError`], [`ImportError`], [`ScannerError`], [`SelectorError`])
//!
//! Every [`InitError`] is terminal for the stage instance that produced it.
//! The per-record path has no error channel at all.

use thiserror::Error;

/// Top-level error type for contextflow.
#[derive(Error, Debug)]
pub enum CfError {
    /// Stage initialization failed
    #[error("Initialization error: {0}")]
    Init(#[from] InitError),

    /// Selector construction or evaluation failed
    #[error("Selector error: {0}")]
    Selector(#[from] SelectorError),

    /// Database import failed
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors (wrapped anyhow)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors raised while initializing an enrichment stage.
#[derive(Error, Debug)]
pub enum InitError {
    /// No database filename was configured
    #[error("No database file set")]
    MissingDatabaseFile,

    /// The filename extension has no matching record scanner
    #[error("Unknown file extension: {filename}")]
    UnknownFileType { filename: String },

    /// The resolved database path could not be opened
    #[error("Failed to open database file {path}: {reason}")]
    FileOpen { path: String, reason: String },

    /// The database contents were rejected
    #[error("Failed to parse database file {filename}: {source}")]
    Parse {
        filename: String,
        #[source]
        source: ImportError,
    },

    /// The selector resolver rejected its setup
    #[error("Selector initialization failed: {0}")]
    ResolverInit(#[source] SelectorError),
}

impl InitError {
    /// Stable label for structured diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingDatabaseFile => "missing_database_file",
            Self::UnknownFileType { .. } => "unknown_file_type",
            Self::FileOpen { .. } => "file_open",
            Self::Parse { .. } => "parse",
            Self::ResolverInit(_) => "resolver_init",
        }
    }
}

/// Errors raised while importing records into a context database.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The record scanner rejected the input
    #[error(transparent)]
    Scan(#[from] ScannerError),

    /// The database was already loaded; imports never reload
    #[error("Database is already loaded")]
    AlreadyLoaded,
}

/// Errors produced by record scanners.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScannerError {
    /// A record was structurally invalid (wrong column count, bad encoding)
    #[error("Invalid record at line {line}: {reason}")]
    InvalidRecord { line: u64, reason: String },

    /// The CSV reader failed
    #[error("CSV error at line {line}: {reason}")]
    Csv { line: u64, reason: String },

    /// A JSON line could not be decoded
    #[error("JSON error at line {line}: {reason}")]
    Json { line: u64, reason: String },

    /// I/O error while reading the input
    #[error("I/O error: {0}")]
    Io(String),
}

impl ScannerError {
    /// Returns the 1-based line number the error refers to, if known.
    pub fn line(&self) -> Option<u64> {
        match self {
            Self::InvalidRecord { line, .. } | Self::Csv { line, .. } | Self::Json { line, .. } => {
                Some(*line)
            }
            Self::Io(_) => None,
        }
    }
}

/// Selector-related errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// A fixed selector was configured with an empty value
    #[error("Selector must not be empty")]
    Empty,

    /// Expression compilation failed
    #[error("Expression compilation failed: {0}")]
    Compilation(String),

    /// Expression evaluation failed
    #[error("Expression evaluation failed: {0}")]
    Evaluation(String),
}

/// Result type alias using CfError.
pub type Result<T> = std::result::Result<T, CfError>;
