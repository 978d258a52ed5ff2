//! CLI argument definitions for cf-enrich.

use cf_enrichment::ContextualDataConfig;
use cf_selector::SelectorConfig;
use cf_types::{DEFAULT_SYSCONFDIR, SYSCONFDIR_ENV};
use clap::Parser;
use std::path::PathBuf;

pub use cf_cli_common::LogLevel;

/// Enrich NDJSON events with contextual data.
///
/// Reads one JSON object per line, looks up the selector of each event in
/// the context database and adds the matching name/value pairs as fields.
///
/// ## Examples
///
/// Same context for every event:
///   cf-enrich -d hosts.csv -s web-01 < events.ndjson
///
/// Selector taken from the event, with a fallback:
///   cf-enrich -d hosts.csv -e 'record.host' --default-selector unknown -i events.ndjson
#[derive(Parser, Debug)]
#[command(name = "cf-enrich")]
#[command(version, about, long_about = None)]
pub struct Cli {
    // === Database ===
    /// Context database file (.csv, .ndjson or .jsonl), relative to --sysconfdir
    #[arg(short = 'd', long)]
    pub database: String,

    /// Directory relative database paths are resolved against
    #[arg(long, env = SYSCONFDIR_ENV, default_value = DEFAULT_SYSCONFDIR)]
    pub sysconfdir: PathBuf,

    /// Prefix prepended to every injected field name
    #[arg(short = 'p', long)]
    pub prefix: Option<String>,

    /// Match selectors case-insensitively
    #[arg(long)]
    pub ignore_case: bool,

    // === Selector ===
    /// Fixed selector used for every event
    #[arg(short = 's', long, conflicts_with = "selector_template")]
    pub selector: Option<String>,

    /// Rhai expression computing the selector from `record`
    #[arg(short = 'e', long)]
    pub selector_template: Option<String>,

    /// Selector used when the computed one has no records
    #[arg(long)]
    pub default_selector: Option<String>,

    // === Input / Processing ===
    /// Input file (defaults to stdin)
    #[arg(short = 'i', long)]
    pub input: Option<PathBuf>,

    /// Number of worker threads (must be >= 1)
    #[arg(short = 't', long, default_value_t = num_cpus(), value_parser = parse_positive_usize)]
    pub threads: usize,

    // === Logging ===
    /// Log level
    #[arg(short = 'l', long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

impl Cli {
    /// Builds the stage configuration from the arguments.
    pub fn stage_config(&self) -> ContextualDataConfig {
        let selector = match (&self.selector, &self.selector_template) {
            (Some(value), _) => Some(SelectorConfig::fixed(value.as_str())),
            (None, Some(expression)) => Some(SelectorConfig::template(expression.as_str())),
            (None, None) => None,
        };

        ContextualDataConfig {
            database: Some(self.database.clone()),
            prefix: self.prefix.clone(),
            default_selector: self.default_selector.clone(),
            selector,
            ignore_case: self.ignore_case,
        }
    }
}

fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn parse_positive_usize(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if value < 1 {
        return Err(format!("{} is not in 1..", value));
    }
    Ok(value)
}
