use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::cli::enums::FormatterChoice;
use crate::cli::validation::parse_plugin_name;

/// Available BundleBD subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Bundle a plugin
    ///
    /// Loads bundlebd.config.json and the plugin's config.json, derives the
    /// build plan and produces `<output>/<filename>`. With --development the
    /// plugin is rebuilt and re-formatted on every source change.
    Bundle(BundleArgs),

    /// Print the derived build plan as JSON
    ///
    /// Nothing is built. Useful to check what a configuration expands to.
    Plan(PlanArgs),

    /// Build the fixed `bin` and `lib` targets
    ///
    /// `src/bin/index.ts` becomes `bin.js` with every package dependency left
    /// external, `src/lib/index.ts` becomes `index.js` as an ES module with
    /// declarations and without line comments.
    Build(BuildArgs),
}

/// Arguments for the bundle command
#[derive(Args, Debug)]
pub struct BundleArgs {
    /// Plugin name, substituted for `[plugin]` in configured paths
    #[arg(short, long, value_parser = parse_plugin_name)]
    pub plugin: String,

    /// Development mode: watch sources and rebuild on change
    #[arg(short, long)]
    pub development: bool,

    /// Print one JSON object per target outcome on stdout
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub post: PostProcessArgs,
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Plugin name, substituted for `[plugin]` in configured paths
    #[arg(short, long, value_parser = parse_plugin_name)]
    pub plugin: String,

    /// Derive the plan as a development (watch) run
    #[arg(short, long)]
    pub development: bool,
}

/// Arguments for the build command
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Keep watching sources and rebuild every target on change
    #[arg(short, long)]
    pub watch: bool,

    /// Print one JSON object per target outcome on stdout
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub post: PostProcessArgs,
}

/// Post-processing options shared by commands that produce artifacts
#[derive(Args, Debug, Clone)]
pub struct PostProcessArgs {
    /// Formatter applied to every artifact
    #[arg(long, value_enum, default_value = "prettier")]
    pub formatter: FormatterChoice,

    /// tsconfig used when emitting declarations for the `lib` target
    #[arg(long, value_name = "FILE")]
    pub tsconfig: Option<PathBuf>,
}
