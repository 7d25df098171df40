//! Per-plugin configuration (`config.json` inside the entry directory).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, ConfigWarning, Result};
use crate::meta::{ACCEPTED_META_KEYS, PluginMeta, filter_keys};

/// File name looked up in the entry directory.
pub const PLUGIN_CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogEntry {
    pub title: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub items: Vec<String>,
}

/// Metadata, changelog and feature flags for one plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginConfig {
    pub meta: PluginMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changelog: Option<Vec<ChangelogEntry>>,
    /// Entry file relative to the entry directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,
    /// Build against ZLibrary: assign-to-global output and library externals.
    #[serde(default)]
    pub zlibrary: bool,
}

/// Everything but `meta`, which is merged and filtered by hand.
#[derive(Debug, Default, Deserialize)]
struct RawPluginConfig {
    #[serde(default)]
    changelog: Option<Vec<ChangelogEntry>>,
    #[serde(default)]
    entry: Option<String>,
    #[serde(default)]
    zlibrary: bool,
}

impl PluginConfig {
    /// Configuration used when the entry directory has no `config.json`.
    pub fn defaults_for(plugin_name: &str) -> Self {
        Self {
            meta: PluginMeta::defaults_for(plugin_name),
            changelog: None,
            entry: None,
            zlibrary: false,
        }
    }

    /// Load `config.json` from `entry_dir`.
    ///
    /// User `meta` keys are merged onto the defaults, then keys outside
    /// [`ACCEPTED_META_KEYS`] are removed. Removed keys and a changelog without
    /// `zlibrary` are reported as warnings and logged; neither fails the load.
    pub fn load(entry_dir: &Path, plugin_name: &str) -> Result<(Self, Vec<ConfigWarning>)> {
        if !entry_dir.is_dir() {
            return Err(ConfigError::EntryDirNotFound(entry_dir.to_path_buf()));
        }

        let path = entry_dir.join(PLUGIN_CONFIG_FILE);
        if !path.is_file() {
            tracing::debug!(dir = %entry_dir.display(), "no config.json, using default meta");
            return Ok((Self::defaults_for(plugin_name), Vec::new()));
        }

        let content = fs::read_to_string(&path)?;
        let value: Value =
            serde_json::from_str(&content).map_err(|e| ConfigError::parse(&path, e))?;
        Self::from_value(value, plugin_name).map_err(|err| match err {
            ConfigError::Parse { message, .. } => ConfigError::parse(&path, message),
            other => other,
        })
    }

    /// Build a config from already parsed JSON.
    pub fn from_value(value: Value, plugin_name: &str) -> Result<(Self, Vec<ConfigWarning>)> {
        let Value::Object(mut root) = value else {
            return Err(ConfigError::parse(PLUGIN_CONFIG_FILE, "expected a JSON object"));
        };

        let mut meta = PluginMeta::default_map(plugin_name);
        match root.remove("meta") {
            None | Some(Value::Null) => {}
            Some(Value::Object(user)) => meta.extend(user),
            Some(_) => {
                return Err(ConfigError::InvalidValue {
                    field: "meta".to_string(),
                    hint: "meta must be an object".to_string(),
                });
            }
        }

        let mut warnings = Vec::new();
        let (meta, dropped) = filter_keys(&meta, ACCEPTED_META_KEYS);
        for key in dropped {
            tracing::warn!("Invalid meta key '{}' in config.json", key);
            warnings.push(ConfigWarning::UnknownMetaKey(key));
        }

        let meta: PluginMeta = serde_json::from_value(Value::Object(meta))
            .map_err(|e| ConfigError::parse(PLUGIN_CONFIG_FILE, e))?;
        let raw: RawPluginConfig = serde_json::from_value(Value::Object(root))
            .map_err(|e| ConfigError::parse(PLUGIN_CONFIG_FILE, e))?;

        if raw.changelog.is_some() && !raw.zlibrary {
            let warning = ConfigWarning::ChangelogWithoutZLibrary;
            tracing::warn!("{}", warning);
            warnings.push(warning);
        }

        let config = Self {
            meta,
            changelog: raw.changelog,
            entry: raw.entry,
            zlibrary: raw.zlibrary,
        };
        Ok((config, warnings))
    }
}
