//! Error and warning types for configuration loading.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Fatal configuration errors. Any of these aborts the invocation before a
/// build is started.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot find entry directory '{}'", .0.display())]
    EntryDirNotFound(PathBuf),

    #[error("failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("invalid value for '{field}': {hint}")]
    InvalidValue { field: String, hint: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub(crate) fn parse(path: impl Into<PathBuf>, message: impl fmt::Display) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// Non-fatal findings recorded while loading configuration.
///
/// Warnings never change the outcome of a load; the offending data is either
/// dropped (unknown meta keys) or kept as-is (changelog).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// A key in `meta` outside the accepted set. The key was removed.
    UnknownMetaKey(String),
    /// `changelog` is set but `zlibrary` is not.
    ChangelogWithoutZLibrary,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownMetaKey(key) => write!(f, "Invalid meta key '{}' in config.json", key),
            Self::ChangelogWithoutZLibrary => {
                write!(f, "Changelogs are currently only supported for plugins using ZLibrary")
            }
        }
    }
}
