//! Error handling for the BundleBD CLI.
//!
//! Library errors convert into [`CliError`] via `#[from]`, commands return
//! [`Result`], and `main` turns the final error into a [`miette::Report`] with
//! [`cli_error_to_miette`].
//!
//! # Example
//!
//! ```rust,no_run
//! use bundlebd_cli::error::{Result, ResultExt};
//! use std::path::Path;
//!
//! fn read_manifest(path: &Path) -> Result<String> {
//!     std::fs::read_to_string(path)
//!         .with_path(path)
//!         .with_hint("Run the command from the project root or pass --cwd")
//! }
//! ```

use std::path::PathBuf;

use bundlebd_config::ConfigError;
use miette::Report;
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration errors, fatal before any build starts
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Planning, toolchain and post-processing errors
    #[error(transparent)]
    Build(#[from] bundlebd_bundler::Error),

    /// At least one target finished in the failed state
    #[error("{failed} of {total} target(s) failed to build")]
    TargetsFailed { failed: usize, total: usize },

    /// File or directory not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors rewrapped by [`ResultExt::with_hint`] or [`ResultExt::context`]
    #[error("{0}")]
    Custom(String),
}

pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Extension trait for adding context to `Result` types.
pub trait ResultExt<T> {
    /// Turn a not-found I/O error into [`CliError::FileNotFound`] for `path`.
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T>;

    /// Append a hint line to the error message.
    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T>;

    /// Prefix the error message.
    fn context(self, msg: impl std::fmt::Display) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T> {
        self.map_err(|e| match e.into() {
            CliError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                CliError::FileNotFound(path.as_ref().to_path_buf())
            }
            other => other,
        })
    }

    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{}\n\nHint: {}", err, hint))
        })
    }

    fn context(self, msg: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{}: {}", msg, err))
        })
    }
}

/// Convert a [`CliError`] into a miette report for the final error output.
///
/// Bundler and configuration errors keep their diagnostic code and help
/// text; everything else is reported by message.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Build(e) => Report::new(e),
        CliError::Config(e) => Report::new(bundlebd_bundler::Error::Config(e)),
        other => miette::miette!("{}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_converts() {
        let err: CliError = ConfigError::EntryDirNotFound(PathBuf::from("/p/src")).into();
        assert!(matches!(err, CliError::Config(_)));
        assert!(err.to_string().contains("cannot find entry directory"));
    }

    #[test]
    fn test_bundler_error_is_transparent() {
        let err: CliError = bundlebd_bundler::Error::Format {
            message: "unexpected token".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "failed to format output: unexpected token");
    }

    #[test]
    fn test_targets_failed_message() {
        let err = CliError::TargetsFailed {
            failed: 1,
            total: 2,
        };
        assert_eq!(err.to_string(), "1 of 2 target(s) failed to build");
    }

    #[test]
    fn test_result_ext_with_path() {
        let result: std::io::Result<()> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));

        let err = result.with_path("/test/package.json").unwrap_err();
        assert!(matches!(err, CliError::FileNotFound(_)));
    }

    #[test]
    fn test_result_ext_with_path_keeps_other_errors() {
        let result: std::io::Result<()> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));

        let err = result.with_path("/test/package.json").unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }

    #[test]
    fn test_result_ext_with_hint() {
        let result: std::result::Result<(), ConfigError> =
            Err(ConfigError::EntryDirNotFound(PathBuf::from("src")));

        let err = result.with_hint("Create the directory").unwrap_err();
        assert!(err.to_string().contains("Hint: Create the directory"));
    }

    #[test]
    fn test_result_ext_context() {
        let result: std::result::Result<(), CliError> = Err(CliError::TargetsFailed {
            failed: 1,
            total: 1,
        });

        let err = result.context("Failed to start").unwrap_err();
        assert_eq!(err.to_string(), "Failed to start: 1 of 1 target(s) failed to build");
    }

    #[test]
    fn test_miette_report_keeps_diagnostic_code() {
        let report = cli_error_to_miette(CliError::Config(ConfigError::EntryDirNotFound(
            PathBuf::from("src"),
        )));
        let code = report.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("bundlebd::config"));
    }
}
