//! AddContextualData - the enrichment stage.

use crate::config::ContextualDataConfig;
use crate::stats::EnrichmentStats;
use cf_context_db::{ContextDatabase, MatchMode, ScannerType};
use cf_error::{ImportError, InitError, SelectorError};
use cf_selector::SelectorResolver;
use cf_traits::LogParser;
use cf_types::{InstallPaths, LogMessage, PathOptions};
use std::sync::Arc;
use tracing::{debug, error, trace, warn};

/// Merges contextual name/value pairs into passing messages.
///
/// For every message the stage computes a selector, falls back to the
/// default selector when the database has no records for it, and writes
/// each matching record into the message as `name = value`. Records are
/// applied in database order, so for repeated names the last one wins.
///
/// Clones share the loaded database and get their own resolver and
/// statistics. A clone starts uninitialized; initializing it skips the
/// load when the shared database is already populated.
pub struct AddContextualData {
    context_db: ContextDatabase,
    selector: Option<SelectorResolver>,
    filename: Option<String>,
    prefix: Option<String>,
    default_selector: Option<String>,
    ignore_case: bool,
    paths: InstallPaths,
    stats: Arc<EnrichmentStats>,
    initialized: bool,
}

impl AddContextualData {
    /// Creates an unconfigured stage.
    pub fn new(paths: InstallPaths) -> Self {
        Self {
            context_db: ContextDatabase::new(),
            selector: None,
            filename: None,
            prefix: None,
            default_selector: None,
            ignore_case: false,
            paths,
            stats: Arc::new(EnrichmentStats::new()),
            initialized: false,
        }
    }

    /// Builds a configured, uninitialized stage.
    pub fn from_config(config: &ContextualDataConfig, paths: InstallPaths) -> cf_error::Result<Self> {
        let mut stage = Self::new(paths);

        if let Some(database) = &config.database {
            stage.set_filename(database.as_str());
        }
        if let Some(prefix) = &config.prefix {
            stage.set_prefix(prefix.as_str());
        }
        if let Some(default_selector) = &config.default_selector {
            stage.set_default_selector(default_selector.as_str());
        }
        if let Some(selector) = &config.selector {
            stage.selector = Some(SelectorResolver::from_config(selector)?);
        }
        stage.set_ignore_case(config.ignore_case);

        Ok(stage)
    }

    pub fn set_filename(&mut self, filename: impl Into<String>) {
        self.filename = Some(filename.into());
    }

    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = Some(prefix.into());
    }

    pub fn set_default_selector(&mut self, selector: impl Into<String>) {
        self.default_selector = Some(selector.into());
    }

    /// Uses the same selector for every message.
    pub fn set_selector(&mut self, value: impl Into<String>) -> Result<(), SelectorError> {
        self.selector = Some(SelectorResolver::fixed(value)?);
        Ok(())
    }

    /// Computes the selector per message from a Rhai expression.
    pub fn set_selector_template(&mut self, expression: impl Into<String>) -> Result<(), SelectorError> {
        self.selector = Some(SelectorResolver::template(expression)?);
        Ok(())
    }

    /// Switches case-insensitive selector matching.
    ///
    /// The flag is applied when the shared database is first loaded, by
    /// whichever instance loads it. Once loaded, a conflicting value is
    /// ignored.
    pub fn set_ignore_case(&mut self, ignore_case: bool) {
        if self.context_db.is_loaded() && self.context_db.ignore_case() != ignore_case {
            warn!(ignore_case, "Context database already loaded, ignore_case unchanged");
            return;
        }
        self.ignore_case = ignore_case;
    }

    /// Loads the database if needed and prepares the selector.
    ///
    /// Any failure leaves the stage uninitialized.
    pub fn initialize(&mut self) -> Result<(), InitError> {
        let result = self.try_initialize();

        if let Err(e) = &result {
            error!(
                kind = e.kind(),
                filename = self.filename.as_deref().unwrap_or_default(),
                error = %e,
                "Failed to initialize contextual data stage"
            );
        }

        result
    }

    fn try_initialize(&mut self) -> Result<(), InitError> {
        self.initialized = false;

        let filename = self
            .filename
            .as_deref()
            .ok_or(InitError::MissingDatabaseFile)?;

        if !self.context_db.is_loaded() {
            let scanner_type =
                ScannerType::from_filename(filename).ok_or_else(|| InitError::UnknownFileType {
                    filename: filename.to_string(),
                })?;

            let mut scanner = scanner_type.create();
            scanner.set_name_prefix(self.prefix.clone());

            let path = self.paths.resolve(filename);
            let mode = MatchMode::from_ignore_case(self.ignore_case);
            match self.context_db.load_file(&path, scanner.as_ref(), mode) {
                Ok(_) => {}
                // Another clone published the shared table first.
                Err(InitError::Parse {
                    source: ImportError::AlreadyLoaded,
                    ..
                }) => debug!(filename, "Context database loaded concurrently"),
                Err(e) => return Err(e),
            }
        }

        if self.context_db.ignore_case() != self.ignore_case {
            warn!(
                filename,
                ignore_case = self.context_db.ignore_case(),
                "Shared context database was loaded with a different ignore_case"
            );
        }

        if let Some(selector) = self.selector.as_mut() {
            let selectors = self.context_db.ordered_selectors();
            let result = if self.context_db.ignore_case() {
                let folded: Vec<String> = selectors.iter().map(|s| s.to_lowercase()).collect();
                selector.initialize(&folded)
            } else {
                selector.initialize(selectors)
            };
            result.map_err(InitError::ResolverInit)?;
        }

        self.initialized = true;
        Ok(())
    }

    /// Enriches one message. Always returns `true`.
    pub fn process(&mut self, msg: &mut LogMessage, _path_options: &PathOptions) -> bool {
        self.stats.record_processed();

        let resolved = self.selector.as_mut().and_then(|s| s.resolve(msg));

        let key = match resolved.as_deref() {
            Some(key) if self.context_db.contains(key) => Some(key),
            unmatched => match self.default_selector.as_deref() {
                Some(default) => {
                    trace!(selector = ?unmatched, default, "Falling back to default selector");
                    self.stats.record_default_hit();
                    Some(default)
                }
                None => unmatched,
            },
        };

        let mut injected = 0u64;
        if let Some(key) = key.filter(|k| !k.is_empty()) {
            self.context_db.for_each_record(key, |record| {
                msg.set_value(record.name(), record.value().clone());
                injected += 1;
            });
        }

        if injected == 0 {
            trace!(selector = ?key, "No contextual data for message");
        }
        self.stats.record_outcome(injected);

        true
    }

    /// Returns a handle to the shared database.
    pub fn context_db(&self) -> &ContextDatabase {
        &self.context_db
    }

    /// Returns this instance's statistics.
    pub fn stats(&self) -> Arc<EnrichmentStats> {
        Arc::clone(&self.stats)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn default_selector(&self) -> Option<&str> {
        self.default_selector.as_deref()
    }

    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    pub fn selector(&self) -> Option<&SelectorResolver> {
        self.selector.as_ref()
    }
}

impl Clone for AddContextualData {
    fn clone(&self) -> Self {
        Self {
            context_db: self.context_db.clone(),
            selector: self.selector.clone(),
            filename: self.filename.clone(),
            prefix: self.prefix.clone(),
            default_selector: self.default_selector.clone(),
            ignore_case: self.ignore_case,
            paths: self.paths.clone(),
            stats: Arc::new(EnrichmentStats::new()),
            initialized: false,
        }
    }
}

impl std::fmt::Debug for AddContextualData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddContextualData")
            .field("filename", &self.filename)
            .field("prefix", &self.prefix)
            .field("default_selector", &self.default_selector)
            .field("selector", &self.selector.as_ref().map(|s| s.kind()))
            .field("ignore_case", &self.ignore_case)
            .field("initialized", &self.initialized)
            .field("context_db", &self.context_db)
            .finish()
    }
}

impl LogParser for AddContextualData {
    fn init(&mut self) -> cf_error::Result<()> {
        Ok(self.initialize()?)
    }

    fn process(&mut self, msg: &mut LogMessage, path_options: &PathOptions) -> bool {
        AddContextualData::process(self, msg, path_options)
    }

    fn clone_parser(&self) -> Box<dyn LogParser> {
        Box::new(self.clone())
    }

    fn name(&self) -> &str {
        "add-contextual-data"
    }
}
