//! Project-level bundling configuration (`bundlebd.config.json`).

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized},
};
use path_clean::PathClean;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::template::RunParams;

/// File name looked up in the working directory.
pub const BUNDLE_CONFIG_FILE: &str = "bundlebd.config.json";

/// Prefix of the environment variables that override single keys.
pub const ENV_PREFIX: &str = "BUNDLEBD_";

const ENV_KEYS: [&str; 3] = ["entry", "output", "filename"];

/// Where plugin sources live and where bundles are written.
///
/// `entry`, `output` and `filename` are templates; `[plugin]` is replaced
/// with the plugin name of the current run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleConfig {
    #[serde(default = "default_entry")]
    pub entry: String,

    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_filename")]
    pub filename: String,

    /// BetterDiscord installation path, carried for the surrounding tooling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bd_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readme: Option<ReadmeOption>,
}

/// `readme` accepts either a flag or a path to an explicit readme file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReadmeOption {
    Enabled(bool),
    Path(String),
}

fn default_entry() -> String {
    "src".to_string()
}

fn default_output() -> String {
    "dist".to_string()
}

fn default_filename() -> String {
    "[plugin].plugin.js".to_string()
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            entry: default_entry(),
            output: default_output(),
            filename: default_filename(),
            bd_path: None,
            readme: None,
        }
    }
}

impl BundleConfig {
    /// Load `bundlebd.config.json` from `cwd`, merged over the defaults.
    ///
    /// A missing file yields the defaults. Keys present in the file win over
    /// the defaults one by one, and `BUNDLEBD_ENTRY`, `BUNDLEBD_OUTPUT` and
    /// `BUNDLEBD_FILENAME` win over the file. Malformed JSON or a mistyped
    /// value is fatal.
    pub fn load(cwd: &Path) -> Result<Self> {
        Self::load_with_env(cwd, ENV_PREFIX)
    }

    fn load_with_env(cwd: &Path, env_prefix: &str) -> Result<Self> {
        let path = cwd.join(BUNDLE_CONFIG_FILE);
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        if path.is_file() {
            tracing::debug!(path = %path.display(), "loading bundle config");
            figment = figment.merge(Json::file(&path));
        }

        figment = figment.merge(Env::prefixed(env_prefix).only(&ENV_KEYS));

        figment
            .extract()
            .map_err(|e| ConfigError::parse(&path, e))
    }

    /// Absolute entry directory for this run.
    pub fn resolve_entry_dir(&self, cwd: &Path, params: &RunParams) -> PathBuf {
        cwd.join(params.interpolate(&self.entry)).clean()
    }

    /// Absolute output directory for this run.
    pub fn resolve_output_dir(&self, cwd: &Path, params: &RunParams) -> PathBuf {
        cwd.join(params.interpolate(&self.output)).clean()
    }

    /// Output file name for this run.
    pub fn resolve_filename(&self, params: &RunParams) -> String {
        params.interpolate(&self.filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = BundleConfig::load(dir.path()).unwrap();
        assert_eq!(config, BundleConfig::default());
        assert_eq!(config.filename, "[plugin].plugin.js");
    }

    #[test]
    fn user_keys_override_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(BUNDLE_CONFIG_FILE),
            r#"{ "entry": "plugins/[plugin]", "bdPath": "/bd", "readme": true }"#,
        )
        .unwrap();

        let config = BundleConfig::load(dir.path()).unwrap();
        assert_eq!(config.entry, "plugins/[plugin]");
        assert_eq!(config.output, "dist");
        assert_eq!(config.bd_path.as_deref(), Some("/bd"));
        assert_eq!(config.readme, Some(ReadmeOption::Enabled(true)));
    }

    #[test]
    fn readme_accepts_a_path() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(BUNDLE_CONFIG_FILE),
            r#"{ "readme": "docs/README.md" }"#,
        )
        .unwrap();

        let config = BundleConfig::load(dir.path()).unwrap();
        assert_eq!(
            config.readme,
            Some(ReadmeOption::Path("docs/README.md".to_string()))
        );
    }

    #[test]
    fn environment_overrides_the_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(BUNDLE_CONFIG_FILE),
            r#"{ "entry": "plugins/[plugin]", "output": "build" }"#,
        )
        .unwrap();

        // A prefix no other test reads, so setting it cannot leak.
        unsafe { std::env::set_var("BUNDLEBD_ENVTEST_OUTPUT", "out/[plugin]") };
        let config = BundleConfig::load_with_env(dir.path(), "BUNDLEBD_ENVTEST_").unwrap();
        unsafe { std::env::remove_var("BUNDLEBD_ENVTEST_OUTPUT") };

        assert_eq!(config.entry, "plugins/[plugin]");
        assert_eq!(config.output, "out/[plugin]");
        assert_eq!(config.filename, "[plugin].plugin.js");
    }

    #[test]
    fn malformed_json_is_fatal() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(BUNDLE_CONFIG_FILE), "{ entry: ").unwrap();

        let err = BundleConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn mistyped_value_is_fatal() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(BUNDLE_CONFIG_FILE), r#"{ "entry": ["src"] }"#).unwrap();

        assert!(BundleConfig::load(dir.path()).is_err());
    }

    #[test]
    fn resolves_templated_paths() {
        let config = BundleConfig {
            entry: "plugins/[plugin]".into(),
            ..Default::default()
        };
        let params = RunParams::new("Foo");
        let cwd = Path::new("/work");

        assert_eq!(
            config.resolve_entry_dir(cwd, &params),
            PathBuf::from("/work/plugins/Foo")
        );
        assert_eq!(config.resolve_output_dir(cwd, &params), PathBuf::from("/work/dist"));
        assert_eq!(config.resolve_filename(&params), "Foo.plugin.js");
    }
}
