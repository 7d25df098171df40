//! Build targets handed to the toolchain.
//!
//! A [`BuildTarget`] is the declarative description of one bundle: entry,
//! output file, output shape and the post-processing steps the library-style
//! target needs. Two targets are fixed (`bin` and `lib`, see
//! [`builtin_targets`]); plugin bundles get theirs from
//! [`DerivedBuildPlan::to_target`](crate::plan::DerivedBuildPlan::to_target).

use std::path::{Path, PathBuf};

use bundlebd_config::PackageManifest;
use indexmap::IndexMap;
use path_clean::PathClean;
use serde::Serialize;

/// Runtime the bundle executes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Node,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Node => "node",
        }
    }
}

/// Module format of the emitted bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Iife,
    Cjs,
    Esm,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Iife => "iife",
            Self::Cjs => "cjs",
            Self::Esm => "esm",
        }
    }
}

/// How the toolchain loads a non-code file type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Loader {
    /// File contents as a string.
    Text,
    /// File contents inlined as a data URL.
    DataUrl,
}

impl Loader {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::DataUrl => "dataurl",
        }
    }
}

/// Extra behavior attached to a target, applied around the toolchain run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetPlugin {
    /// Leave every bare or package-relative import to the consumer.
    ExternalizePackages,
    /// Run the declaration emitter after a clean build.
    EmitDeclarations,
    /// Remove `//` line comments from the artifact.
    StripComments,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildTarget {
    pub name: String,
    pub entry_points: Vec<PathBuf>,
    pub output_file: PathBuf,
    pub bundle: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub external: Vec<String>,
    /// Module name to the host expression a generated module exports in its place.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub aliases: IndexMap<String, String>,
    /// Free identifier to the module whose default export it is bound to.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub inject: IndexMap<String, String>,
    pub platform: Platform,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,
    /// Global the bundle is assigned to when `format` is `Iife`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    /// Syntax level the toolchain lowers to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub es_target: Option<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub loaders: IndexMap<String, Loader>,
    /// Drop license and other preserved comments from the output.
    pub strip_legal_comments: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<TargetPlugin>,
}

impl BuildTarget {
    /// A bundling node target with everything else unset.
    pub fn new(
        name: impl Into<String>,
        entry: impl Into<PathBuf>,
        output_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            entry_points: vec![entry.into()],
            output_file: output_file.into(),
            bundle: true,
            external: Vec::new(),
            aliases: IndexMap::new(),
            inject: IndexMap::new(),
            platform: Platform::Node,
            format: None,
            global_name: None,
            banner: None,
            footer: None,
            es_target: None,
            loaders: IndexMap::new(),
            strip_legal_comments: false,
            plugins: Vec::new(),
        }
    }

    pub fn has_plugin(&self, plugin: TargetPlugin) -> bool {
        self.plugins.contains(&plugin)
    }

    /// Whether an import of `specifier` is left out of the bundle.
    pub fn is_external(&self, specifier: &str) -> bool {
        self.external.iter().any(|name| name == specifier)
            || (self.has_plugin(TargetPlugin::ExternalizePackages) && is_bare_specifier(specifier))
    }

    /// Directory whose changes should trigger a rebuild.
    ///
    /// This is the top-level directory of the first entry point relative to
    /// `cwd` (`src` for `src/lib/index.ts`), so output files written next to
    /// the project root never retrigger the build. Entries outside `cwd` fall
    /// back to the entry's parent directory.
    pub fn watch_root(&self, cwd: &Path) -> PathBuf {
        let Some(entry) = self.entry_points.first() else {
            return cwd.to_path_buf();
        };
        let absolute = if entry.is_absolute() {
            entry.clean()
        } else {
            cwd.join(entry).clean()
        };

        if let Ok(rel) = absolute.strip_prefix(cwd) {
            let mut components = rel.components();
            if let (Some(first), Some(_)) = (components.next(), components.next()) {
                return cwd.join(first);
            }
        }

        if absolute.is_dir() {
            return absolute;
        }
        absolute
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| cwd.to_path_buf())
    }
}

/// Whether an import specifier names a package rather than a relative file.
///
/// Equivalent to `^[^./]|^\.[^./]|^\.\.[^/]`: anything not starting with `.`
/// or `/`, plus dotted names that are not `./` or `../` paths (`.bin`, `..foo`).
pub fn is_bare_specifier(specifier: &str) -> bool {
    let mut chars = specifier.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(first), _, _) if first != '.' && first != '/' => true,
        (Some('.'), Some(second), _) if second != '.' && second != '/' => true,
        (Some('.'), Some('.'), Some(third)) => third != '/',
        _ => false,
    }
}

/// The fixed `bin` and `lib` targets, with paths relative to the project root.
pub fn builtin_targets(manifest: &PackageManifest) -> Vec<BuildTarget> {
    let mut bin = BuildTarget::new("bin", "src/bin/index.ts", "bin.js");
    bin.external = manifest.dependency_names();
    bin.banner = Some("#!/usr/bin/env node\n".to_string());

    let mut lib = BuildTarget::new("lib", "src/lib/index.ts", "index.js");
    lib.format = Some(Format::Esm);
    lib.plugins = vec![
        TargetPlugin::ExternalizePackages,
        TargetPlugin::EmitDeclarations,
        TargetPlugin::StripComments,
    ];

    vec![bin, lib]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_specifiers() {
        assert!(is_bare_specifier("react"));
        assert!(is_bare_specifier("@zlibrary/plugin"));
        assert!(is_bare_specifier(".bin"));
        assert!(is_bare_specifier("..foo"));

        assert!(!is_bare_specifier("./local"));
        assert!(!is_bare_specifier("../parent"));
        assert!(!is_bare_specifier("/abs/path"));
        assert!(!is_bare_specifier(""));
    }

    #[test]
    fn every_target_runs_on_node() {
        let targets = builtin_targets(&PackageManifest::default());
        assert!(targets.iter().all(|t| t.platform == Platform::Node));
        assert_eq!(serde_json::to_value(Platform::default()).unwrap(), "node");
    }

    #[test]
    fn builtin_targets_shape() {
        let mut manifest = PackageManifest::default();
        manifest.dependencies.insert("webpack".into(), "^5".into());

        let targets = builtin_targets(&manifest);
        let names: Vec<_> = targets.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["bin", "lib"]);

        let bin = &targets[0];
        assert_eq!(bin.output_file, PathBuf::from("bin.js"));
        assert_eq!(bin.external, vec!["webpack".to_string()]);
        assert_eq!(bin.banner.as_deref(), Some("#!/usr/bin/env node\n"));
        assert!(bin.plugins.is_empty());

        let lib = &targets[1];
        assert_eq!(lib.format, Some(Format::Esm));
        assert!(lib.has_plugin(TargetPlugin::StripComments));
        assert!(lib.has_plugin(TargetPlugin::EmitDeclarations));
        assert!(lib.has_plugin(TargetPlugin::ExternalizePackages));
    }

    #[test]
    fn externals_of_library_target() {
        let targets = builtin_targets(&PackageManifest::default());
        let lib = &targets[1];
        assert!(lib.is_external("chalk"));
        assert!(!lib.is_external("./util"));

        let bin = &targets[0];
        assert!(!bin.is_external("chalk"));
    }

    #[test]
    fn watch_root_is_top_level_source_dir() {
        let target = BuildTarget::new("lib", "src/lib/index.ts", "index.js");
        assert_eq!(
            target.watch_root(Path::new("/project")),
            PathBuf::from("/project/src")
        );
    }

    #[test]
    fn watch_root_ignores_dot_segments() {
        let target = BuildTarget::new("bin", "./src/bin/../bin/index.ts", "bin.js");
        assert_eq!(
            target.watch_root(Path::new("/project")),
            PathBuf::from("/project/src")
        );
    }
}
