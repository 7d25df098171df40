//! BundleBD CLI - build BetterDiscord plugins from a small JSON configuration.
//!
//! - [`cli`] - clap argument definitions
//! - [`commands`] - `bundle`, `plan` and `build`
//! - [`error`] - CLI error type and miette conversion
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - status lines on stderr

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result, ResultExt};
