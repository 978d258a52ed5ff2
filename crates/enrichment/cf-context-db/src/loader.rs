//! File loading for context databases.

use crate::{ContextDatabase, MatchMode};
use cf_error::InitError;
use cf_traits::RecordScanner;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info};

impl ContextDatabase {
    /// Loads the database from a file using the given scanner.
    ///
    /// The file is closed before returning, whether the import succeeded
    /// or not. A failed import leaves the database unloaded.
    pub fn load_file(
        &self,
        path: &Path,
        scanner: &dyn RecordScanner,
        mode: MatchMode,
    ) -> Result<usize, InitError> {
        let file = File::open(path).map_err(|e| InitError::FileOpen {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        debug!(
            path = %path.display(),
            scanner = scanner.name(),
            prefix = ?scanner.name_prefix(),
            mode = ?mode,
            "Loading context database"
        );

        let result = self.import(scanner.scan(Box::new(BufReader::new(file))), mode);

        let count = result.map_err(|source| InitError::Parse {
            filename: path.display().to_string(),
            source,
        })?;

        info!(
            path = %path.display(),
            records = count,
            selectors = self.selector_count(),
            ignore_case = self.ignore_case(),
            "Loaded context database"
        );

        Ok(count)
    }
}
