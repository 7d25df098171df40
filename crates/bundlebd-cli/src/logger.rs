//! Logging setup for the BundleBD CLI.
//!
//! The library crates emit `tracing` events (configuration warnings, toolchain
//! runs, rebuilds); this module installs the subscriber that prints them.
//!
//! ```rust,no_run
//! use bundlebd_cli::logger::init_logger;
//!
//! init_logger(false, false, false);
//! tracing::info!("Starting build");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "bundlebd_config=debug,bundlebd_bundler=debug,bundlebd_cli=debug";
const QUIET_FILTER: &str = "bundlebd_config=error,bundlebd_bundler=error,bundlebd_cli=error";
const DEFAULT_FILTER: &str = "bundlebd_config=info,bundlebd_bundler=info,bundlebd_cli=info";

/// Initialize the tracing subscriber. Call once, before any logging.
///
/// The level is picked in this order:
/// 1. `--verbose`: DEBUG for the bundlebd crates
/// 2. `--quiet`: ERROR only
/// 3. `RUST_LOG`, when set
/// 4. INFO for the bundlebd crates
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    tracing_subscriber::registry()
        .with(filter_for(verbose, quiet))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .with_ansi(!no_color)
                .compact(),
        )
        .init();
}

fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}
