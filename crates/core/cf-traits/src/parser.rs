//! Parser trait for host pipelines.

use cf_error::Result;
use cf_types::{LogMessage, PathOptions};

/// Lifecycle contract between a host pipeline and a per-message stage.
///
/// A host configures a stage, calls [`init`](LogParser::init) once, then
/// drives [`process`](LogParser::process) for every message. For
/// concurrent use it calls [`clone_parser`](LogParser::clone_parser) once
/// per worker and initializes each clone. Releasing a stage is dropping it.
///
/// # Thread Safety
///
/// Parsers must be `Send` so clones can move into worker threads. A single
/// instance is never driven from two threads at once.
pub trait LogParser: Send {
    /// Prepares the stage for processing.
    ///
    /// On failure the host must not call `process` on this instance.
    fn init(&mut self) -> Result<()>;

    /// Processes one message in place.
    ///
    /// Returns `false` if the message should be dropped.
    fn process(&mut self, msg: &mut LogMessage, path_options: &PathOptions) -> bool;

    /// Creates an independent instance for use on another worker.
    fn clone_parser(&self) -> Box<dyn LogParser>;

    /// Returns the name of this parser for logging.
    fn name(&self) -> &str {
        "parser"
    }
}
