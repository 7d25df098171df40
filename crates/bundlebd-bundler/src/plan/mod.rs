//! Expansion of a resolved configuration into a complete build plan.
//!
//! [`derive_plan`] is the only entry point. It either returns a plan with every
//! field populated or an error; there is no partially derived state.

pub mod externals;
pub mod output;
pub mod rules;

use std::path::PathBuf;

use bundlebd_config::{ConfigError, ResolvedConfig};
use indexmap::IndexMap;
use serde::Serialize;

use crate::error::Result;
use crate::target::{BuildTarget, Format, Loader, Platform};

pub use externals::{externals, host_expression, provided_bindings};
pub use output::{ASSIGN_GLOBAL, LibraryConvention, OptimizerPolicy, OutputSpec};
pub use rules::{AssetType, Condition, CssModules, LoaderStep, ModuleRule, Pattern, Syntax};

/// Extensions tried, in order, when resolving extensionless imports.
pub const RESOLVE_EXTENSIONS: &[&str] = &[".js", ".jsx", ".ts", ".tsx"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Production,
}

/// Everything the toolchain needs to bundle one plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedBuildPlan {
    /// Plugin the plan was derived for.
    pub name: String,
    pub mode: Mode,
    pub watch: bool,
    pub platform: Platform,
    pub entry: PathBuf,
    pub output: OutputSpec,
    pub resolve_extensions: Vec<String>,
    pub rules: Vec<ModuleRule>,
    pub externals: IndexMap<String, String>,
    pub provide: IndexMap<String, String>,
    pub optimizer: OptimizerPolicy,
}

/// Derive the build plan for one invocation.
///
/// Fails when the entry directory is missing; callers normally hit that
/// earlier in [`ResolvedConfig::load`], this guards plans built from a config
/// whose directory disappeared since.
pub fn derive_plan(config: &ResolvedConfig) -> Result<DerivedBuildPlan> {
    if !config.entry_dir.is_dir() {
        return Err(ConfigError::EntryDirNotFound(config.entry_dir.clone()).into());
    }

    let plugin = &config.plugin;
    let plan = DerivedBuildPlan {
        name: config.params.plugin.clone(),
        mode: Mode::Production,
        watch: config.params.development,
        platform: Platform::Node,
        entry: config.entry_point(),
        output: OutputSpec {
            path: config.output_dir(),
            filename: config.output_filename(),
            library: LibraryConvention::for_zlibrary(plugin.zlibrary),
        },
        resolve_extensions: RESOLVE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        rules: rules::module_rules(&plugin.meta.name)?,
        externals: externals(plugin.zlibrary),
        provide: provided_bindings(),
        optimizer: OptimizerPolicy::default(),
    };

    tracing::debug!(
        plugin = %plan.name,
        entry = %plan.entry.display(),
        output = %plan.output.file().display(),
        rules = plan.rules.len(),
        "derived build plan"
    );

    Ok(plan)
}

impl DerivedBuildPlan {
    /// Rules applying to `resource`, in evaluation order.
    pub fn matching_rules(
        &self,
        resource: &str,
        query: Option<&str>,
        issuer: Option<&str>,
    ) -> Vec<&ModuleRule> {
        self.rules
            .iter()
            .filter(|rule| rule.matches(resource, query, issuer))
            .collect()
    }

    /// Entry file handed to the toolchain. A directory entry resolves to its
    /// `index` file with the first matching resolve extension; when none
    /// exists the directory is passed through and the toolchain reports it.
    pub fn entry_file(&self) -> PathBuf {
        if !self.entry.is_dir() {
            return self.entry.clone();
        }
        self.resolve_extensions
            .iter()
            .map(|ext| self.entry.join(format!("index{}", ext)))
            .find(|candidate| candidate.is_file())
            .unwrap_or_else(|| self.entry.clone())
    }

    /// Lower the plan into a toolchain target.
    ///
    /// The assign convention becomes an IIFE assigned to its global. The
    /// CommonJS convention becomes a `cjs` bundle whose footer replaces
    /// `module.exports` with the configured export. Each external is aliased
    /// to a module exporting its host expression, and each provided binding
    /// is injected.
    pub fn to_target(&self) -> BuildTarget {
        let mut target = BuildTarget::new(&self.name, self.entry_file(), self.output.file());
        target.platform = self.platform;
        target.aliases = self
            .externals
            .iter()
            .map(|(module, external)| (module.clone(), host_expression(external).to_string()))
            .collect();
        target.inject = self.provide.clone();
        target.es_target = Some(rules::ES_TARGET.to_string());
        target.strip_legal_comments = !self.optimizer.comments;
        target.loaders = self.asset_loaders();

        match &self.output.library {
            LibraryConvention::Assign { name } => {
                target.format = Some(Format::Iife);
                target.global_name = Some(name.clone());
            }
            LibraryConvention::CommonJs2 { export } => {
                target.format = Some(Format::Cjs);
                target.footer = Some(format!("module.exports = module.exports.{};", export));
            }
        }

        target
    }

    /// Toolchain loaders for file types with an asset rule. SVG component
    /// imports have no toolchain loader and fall back to inlining.
    fn asset_loaders(&self) -> IndexMap<String, Loader> {
        let probes: &[(&str, &str)] = &[
            (".txt", "file.txt"),
            (".png", "file.png"),
            (".jpg", "file.jpg"),
            (".jpeg", "file.jpeg"),
            (".svg", "file.svg"),
        ];

        let mut loaders = IndexMap::new();
        for (ext, probe) in probes {
            let asset = self
                .rules
                .iter()
                .filter(|rule| rule.test.is_match(probe))
                .find_map(ModuleRule::asset_type);
            if let Some(asset) = asset {
                let loader = match asset {
                    AssetType::Source => Loader::Text,
                    AssetType::Inline => Loader::DataUrl,
                };
                loaders.insert(ext.to_string(), loader);
            }
        }
        loaders
    }
}
