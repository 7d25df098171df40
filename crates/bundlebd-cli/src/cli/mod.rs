//! Command-line interface definition for BundleBD.
//!
//! # Command Structure
//!
//! - `bundlebd bundle` - Bundle a BetterDiscord plugin from its configuration
//! - `bundlebd plan` - Print the derived build plan without building
//! - `bundlebd build` - Build the fixed `bin` and `lib` targets

mod commands;
pub mod enums;
mod validation;

use std::path::PathBuf;

use clap::Parser;

pub use commands::{BuildArgs, BundleArgs, Command, PlanArgs, PostProcessArgs};
pub use enums::FormatterChoice;
pub use validation::parse_plugin_name;

/// BundleBD - build BetterDiscord plugins from a small JSON configuration
#[derive(Parser, Debug)]
#[command(
    name = "bundlebd",
    version,
    about = "Build BetterDiscord plugins",
    long_about = "BundleBD reads bundlebd.config.json and the plugin's config.json,\n\
                  derives a complete build plan and drives esbuild, tsc and prettier\n\
                  to produce one formatted artifact per target."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all logging except errors
    ///
    /// Configuration warnings are hidden. Per-target status lines and the
    /// final error are still printed.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Project directory holding bundlebd.config.json and package.json
    ///
    /// Defaults to the current directory. Relative paths are resolved
    /// against the current directory.
    #[arg(long, global = true, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
