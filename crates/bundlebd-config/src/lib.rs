//! Configuration loading for BundleBD.
//!
//! Two files drive a plugin build:
//!
//! - `bundlebd.config.json` in the working directory ([`BundleConfig`]) decides
//!   where sources live and where bundles are written.
//! - `config.json` inside the entry directory ([`PluginConfig`]) carries the
//!   plugin metadata, changelog and feature flags.
//!
//! Both files are optional. Defaults are merged under whatever the user wrote,
//! unknown metadata keys are dropped with a warning, and malformed JSON is a
//! fatal [`ConfigError`].
//!
//! [`ResolvedConfig`] ties the pieces together into the single configuration
//! object the deriver and orchestrator receive.

pub mod bundle;
pub mod error;
pub mod meta;
pub mod package;
pub mod plugin;
pub mod resolve;
pub mod template;

pub use bundle::{BUNDLE_CONFIG_FILE, BundleConfig, ENV_PREFIX, ReadmeOption};
pub use error::{ConfigError, ConfigWarning, Result};
pub use meta::{ACCEPTED_META_KEYS, PluginMeta, filter_keys};
pub use package::PackageManifest;
pub use plugin::{ChangelogEntry, PLUGIN_CONFIG_FILE, PluginConfig};
pub use resolve::ResolvedConfig;
pub use template::{RunParams, interpolate};
