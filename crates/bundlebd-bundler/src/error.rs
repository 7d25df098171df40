//! Error types for planning, building and post-processing.

use std::path::PathBuf;

use bundlebd_config::ConfigError;
use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(
        code(bundlebd::config),
        help("Check bundlebd.config.json and the plugin's config.json")
    )]
    Config(#[from] ConfigError),

    /// A rule condition failed to compile.
    #[error("invalid rule pattern: {0}")]
    #[diagnostic(code(bundlebd::plan::pattern))]
    Pattern(#[from] regex::Error),

    /// The bundling toolchain ran and reported failure.
    #[error("{tool} exited with code {exit_code}")]
    #[diagnostic(code(bundlebd::toolchain::exit))]
    Toolchain {
        tool: String,
        exit_code: i32,
        #[help]
        stderr: String,
    },

    #[error("failed to spawn {tool}: {source}")]
    #[diagnostic(
        code(bundlebd::spawn_failed),
        help("Check that {tool} is installed in the project (npm install -D {tool})")
    )]
    SpawnFailed {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} timed out after {timeout_secs} seconds")]
    #[diagnostic(code(bundlebd::timeout))]
    Timeout { tool: String, timeout_secs: u64 },

    #[error("{tool} output too large: {actual_bytes} bytes (max: {max_bytes} bytes)")]
    #[diagnostic(code(bundlebd::output_too_large))]
    OutputTooLarge {
        tool: String,
        actual_bytes: usize,
        max_bytes: usize,
    },

    /// The formatter rejected the artifact or produced unusable output.
    #[error("failed to format output: {message}")]
    #[diagnostic(code(bundlebd::format))]
    Format { message: String },

    #[error("declaration emit failed with code {exit_code}")]
    #[diagnostic(code(bundlebd::declarations))]
    Declarations {
        exit_code: i32,
        #[help]
        stderr: String,
    },

    #[error("I/O error on {}: {source}", .path.display())]
    #[diagnostic(code(bundlebd::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file watcher error: {0}")]
    #[diagnostic(code(bundlebd::watch))]
    Watch(#[from] notify::Error),

    #[error("watch root does not exist: {}", .0.display())]
    #[diagnostic(code(bundlebd::watch::root))]
    WatchRootMissing(PathBuf),
}

impl Error {
    pub fn spawn_failed(tool: impl Into<String>, source: std::io::Error) -> Self {
        Self::SpawnFailed {
            tool: tool.into(),
            source,
        }
    }

    pub fn timeout(tool: impl Into<String>, timeout_secs: u64) -> Self {
        Self::Timeout {
            tool: tool.into(),
            timeout_secs,
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
