//! esbuild CLI integration.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use path_clean::PathClean;
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::time::{Duration, timeout};

use super::{BuildReport, RebuildReceiver, Toolchain};
use crate::error::{Error, Result};
use crate::target::{BuildTarget, TargetPlugin};
use crate::watch::{DEFAULT_DEBOUNCE_MS, DEFAULT_IGNORE, SourceWatcher};

/// Default timeout for one esbuild run (60 seconds)
const DEFAULT_TIMEOUT_SECS: u64 = 60;

const TOOL: &str = "esbuild";

/// Generated alias and inject modules, relative to the project root. One
/// subdirectory per target.
pub const SHIM_DIR: &str = "node_modules/.cache/bundlebd";

/// Runs the project's `esbuild` binary, one process per build.
#[derive(Debug, Clone)]
pub struct EsbuildToolchain {
    program: String,
    prefix_args: Vec<String>,
    cwd: PathBuf,
    timeout_secs: u64,
    debounce_ms: u64,
}

impl EsbuildToolchain {
    /// esbuild from the project's dependencies, run through `npx`.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: "npx".to_string(),
            prefix_args: vec!["--no-install".to_string(), TOOL.to_string()],
            cwd: cwd.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }

    /// Use an explicit esbuild executable instead of `npx esbuild`.
    pub fn with_binary(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self.prefix_args.clear();
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_debounce(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Directory holding `target`'s generated modules.
    pub fn shim_dir(&self, target: &BuildTarget) -> PathBuf {
        self.cwd.join(SHIM_DIR).join(&target.name)
    }

    /// Command-line arguments for one build of `target`, with generated
    /// modules under `shim_dir`.
    pub fn arguments(target: &BuildTarget, shim_dir: &Path) -> Vec<String> {
        let mut args: Vec<String> = target
            .entry_points
            .iter()
            .map(|entry| entry.display().to_string())
            .collect();

        if target.bundle {
            args.push("--bundle".to_string());
        }
        args.push(format!("--outfile={}", target.output_file.display()));
        args.push(format!("--platform={}", target.platform.as_str()));

        if let Some(format) = target.format {
            args.push(format!("--format={}", format.as_str()));
        }
        if let Some(global_name) = &target.global_name {
            args.push(format!("--global-name={}", global_name));
        }
        if let Some(banner) = &target.banner {
            args.push(format!("--banner:js={}", banner));
        }
        if let Some(footer) = &target.footer {
            args.push(format!("--footer:js={}", footer));
        }
        if let Some(es_target) = &target.es_target {
            args.push(format!("--target={}", es_target));
        }
        for (ext, loader) in &target.loaders {
            args.push(format!("--loader:{}={}", ext, loader.as_str()));
        }
        for name in &target.external {
            args.push(format!("--external:{}", name));
        }
        for module in target.aliases.keys() {
            let shim = alias_shim(shim_dir, module);
            args.push(format!("--alias:{}={}", module, shim.display()));
        }
        for binding in target.inject.keys() {
            args.push(format!("--inject:{}", inject_shim(shim_dir, binding).display()));
        }
        if target.has_plugin(TargetPlugin::ExternalizePackages) {
            args.push("--packages=external".to_string());
        }
        if target.strip_legal_comments {
            args.push("--legal-comments=none".to_string());
        }
        args.push("--log-level=warning".to_string());

        args
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.clean()
        } else {
            self.cwd.join(path).clean()
        }
    }
}

/// Generated modules for `target`: path under `dir` and contents.
pub fn shim_modules(target: &BuildTarget, dir: &Path) -> Vec<(PathBuf, String)> {
    let aliases = target.aliases.iter().map(|(module, expression)| {
        (
            alias_shim(dir, module),
            format!("module.exports = {};\n", expression),
        )
    });
    let injects = target.inject.iter().map(|(binding, module)| {
        (
            inject_shim(dir, binding),
            format!("import {binding} from \"{module}\";\nexport {{ {binding} }};\n"),
        )
    });
    aliases.chain(injects).collect()
}

async fn write_shims(target: &BuildTarget, dir: &Path) -> Result<()> {
    let shims = shim_modules(target, dir);
    if shims.is_empty() {
        return Ok(());
    }
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| Error::io(dir, e))?;
    for (path, contents) in shims {
        tokio::fs::write(&path, contents)
            .await
            .map_err(|e| Error::io(&path, e))?;
    }
    Ok(())
}

fn alias_shim(dir: &Path, module: &str) -> PathBuf {
    dir.join(format!("external-{}.js", shim_stem(module)))
}

fn inject_shim(dir: &Path, binding: &str) -> PathBuf {
    dir.join(format!("provide-{}.js", shim_stem(binding)))
}

/// `@zlibrary/plugin` becomes `zlibrary__plugin`.
fn shim_stem(name: &str) -> String {
    name.trim_start_matches('@').replace(['/', '\\'], "__")
}

/// Split esbuild's stderr into error and warning messages.
fn parse_diagnostics(stderr: &str) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for line in stderr.lines() {
        let line = line.trim();
        if let Some((_, message)) = line.split_once("[ERROR]") {
            errors.push(message.trim().to_string());
        } else if let Some((_, message)) = line.split_once("[WARNING]") {
            warnings.push(message.trim().to_string());
        }
    }

    (errors, warnings)
}

#[async_trait]
impl Toolchain for EsbuildToolchain {
    async fn build(&self, target: &BuildTarget) -> Result<BuildReport> {
        let shim_dir = self.shim_dir(target);
        write_shims(target, &shim_dir).await?;

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.prefix_args)
            .args(Self::arguments(target, &shim_dir))
            .current_dir(&self.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::debug!(target = %target.name, program = %self.program, "running esbuild");

        let child = cmd.spawn().map_err(|e| Error::spawn_failed(TOOL, e))?;
        let output = timeout(
            Duration::from_secs(self.timeout_secs),
            child.wait_with_output(),
        )
        .await
        .map_err(|_| Error::timeout(TOOL, self.timeout_secs))?
        .map_err(|e| Error::spawn_failed(TOOL, e))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        let (errors, warnings) = parse_diagnostics(&stderr);

        // A failing exit without diagnostics means esbuild itself broke.
        if !output.status.success() && errors.is_empty() {
            return Err(Error::Toolchain {
                tool: TOOL.to_string(),
                exit_code: output.status.code().unwrap_or(-1),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(BuildReport { errors, warnings })
    }

    async fn watch(&self, target: &BuildTarget) -> Result<RebuildReceiver> {
        let root = target.watch_root(&self.cwd);
        let mut ignore: Vec<String> = DEFAULT_IGNORE.iter().map(|p| p.to_string()).collect();
        if let Ok(rel) = self.absolute(&target.output_file).strip_prefix(&root) {
            ignore.push(rel.to_string_lossy().into_owned());
        }

        let (watcher, mut changes) = SourceWatcher::new(root, ignore, self.debounce_ms)?;
        let (tx, rx) = mpsc::channel(16);
        let toolchain = self.clone();
        let target = target.clone();

        tokio::spawn(async move {
            let _watcher = watcher;
            while let Some(change) = changes.recv().await {
                tracing::debug!(target = %target.name, path = %change.path().display(), "source changed");
                // One rebuild covers every change queued while the last one ran.
                while changes.try_recv().is_ok() {}

                let report = match toolchain.build(&target).await {
                    Ok(report) => report,
                    Err(err) => BuildReport::failed(err.to_string()),
                };
                if tx.send(report).await.is_err() {
                    break;
                }
            }
        });

        Ok(rx)
    }
}
