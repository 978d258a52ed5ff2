//! Installation paths used by stages that read configuration-adjacent data.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the system configuration directory.
pub const SYSCONFDIR_ENV: &str = "CF_SYSCONFDIR";

/// Default system configuration directory.
pub const DEFAULT_SYSCONFDIR: &str = "/etc/contextflow";

/// Installation directories.
///
/// Passed into stages explicitly instead of being looked up globally, so
/// tests can point them at a temporary directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallPaths {
    /// Directory that relative database paths are resolved against
    #[serde(default = "default_sysconfdir")]
    pub sysconfdir: PathBuf,
}

impl Default for InstallPaths {
    fn default() -> Self {
        Self {
            sysconfdir: default_sysconfdir(),
        }
    }
}

fn default_sysconfdir() -> PathBuf {
    PathBuf::from(DEFAULT_SYSCONFDIR)
}

impl InstallPaths {
    /// Creates install paths rooted at the given configuration directory.
    pub fn new(sysconfdir: impl Into<PathBuf>) -> Self {
        Self {
            sysconfdir: sysconfdir.into(),
        }
    }

    /// Reads the configuration directory from `CF_SYSCONFDIR`, falling back to the default.
    pub fn from_env() -> Self {
        std::env::var_os(SYSCONFDIR_ENV)
            .map(Self::new)
            .unwrap_or_default()
    }

    /// Resolves a configured filename.
    ///
    /// Absolute paths are returned verbatim; relative paths are joined to `sysconfdir`.
    pub fn resolve(&self, filename: impl AsRef<Path>) -> PathBuf {
        let filename = filename.as_ref();
        if filename.is_absolute() {
            filename.to_path_buf()
        } else {
            self.sysconfdir.join(filename)
        }
    }
}
