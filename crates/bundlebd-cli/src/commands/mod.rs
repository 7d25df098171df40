//! Command implementations for the BundleBD CLI.
//!
//! - [`bundle`] - Bundle one plugin, once or in watch mode
//! - [`plan`] - Print the derived build plan
//! - [`build`] - Build the fixed `bin` and `lib` targets
//!
//! Each command exposes an `execute` function taking its parsed arguments and
//! the resolved project directory.

pub mod build;
pub mod bundle;
pub mod plan;
pub mod utils;

pub use build::execute as build_execute;
pub use bundle::execute as bundle_execute;
pub use plan::execute as plan_execute;
