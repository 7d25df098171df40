//! The startup configuration object handed to the plan deriver.

use std::path::{Path, PathBuf};

use crate::bundle::BundleConfig;
use crate::error::{ConfigWarning, Result};
use crate::plugin::PluginConfig;
use crate::template::RunParams;

/// Both configuration files plus the run parameters, loaded once per
/// invocation and read-only afterwards.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub cwd: PathBuf,
    pub params: RunParams,
    pub bundle: BundleConfig,
    pub plugin: PluginConfig,
    /// Interpolated, absolute entry directory. Guaranteed to exist at load time.
    pub entry_dir: PathBuf,
    pub warnings: Vec<ConfigWarning>,
}

impl ResolvedConfig {
    /// Load `bundlebd.config.json` from `cwd`, resolve the entry directory and
    /// load the plugin's `config.json` from it.
    pub fn load(cwd: &Path, params: RunParams) -> Result<Self> {
        let bundle = BundleConfig::load(cwd)?;
        let entry_dir = bundle.resolve_entry_dir(cwd, &params);
        let (plugin, warnings) = PluginConfig::load(&entry_dir, &params.plugin)?;

        tracing::debug!(
            plugin = %params.plugin,
            entry_dir = %entry_dir.display(),
            warnings = warnings.len(),
            "resolved configuration"
        );

        Ok(Self {
            cwd: cwd.to_path_buf(),
            params,
            bundle,
            plugin,
            entry_dir,
            warnings,
        })
    }

    pub fn output_dir(&self) -> PathBuf {
        self.bundle.resolve_output_dir(&self.cwd, &self.params)
    }

    pub fn output_filename(&self) -> String {
        self.bundle.resolve_filename(&self.params)
    }

    /// Final entry point: the configured entry file inside the entry
    /// directory, or the directory itself.
    pub fn entry_point(&self) -> PathBuf {
        match &self.plugin.entry {
            Some(entry) => self.entry_dir.join(entry),
            None => self.entry_dir.clone(),
        }
    }
}
