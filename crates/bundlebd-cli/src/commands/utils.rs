//! Shared plumbing for the commands that run targets.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use bundlebd_bundler::{
    BuildTarget, EsbuildToolchain, Formatter, FormatterKind, Orchestrator, PostProcessor,
    TargetOutcome, TscEmitter,
};
use tokio::signal;
use tokio::sync::mpsc;

use crate::cli::PostProcessArgs;
use crate::error::{CliError, Result, ResultExt};
use crate::ui;

/// Resolve a path relative to a working directory.
pub fn resolve_path(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Project directory for this invocation: `--cwd` (relative to the current
/// directory) or the current directory itself.
///
/// # Errors
///
/// Returns `CliError::FileNotFound` if the directory doesn't exist.
pub fn resolve_cwd(cwd: Option<&Path>) -> Result<PathBuf> {
    let current = std::env::current_dir().context("Cannot read the current directory")?;
    let dir = match cwd {
        Some(path) => resolve_path(path, &current),
        None => current,
    };

    if !dir.is_dir() {
        return Err(CliError::FileNotFound(dir));
    }
    Ok(dir)
}

/// Orchestrator wired to esbuild, tsc and the selected formatter.
pub fn orchestrator(cwd: &Path, args: &PostProcessArgs) -> Result<Orchestrator> {
    let mut declarations = TscEmitter::new(cwd);
    if let Some(tsconfig) = &args.tsconfig {
        let tsconfig = resolve_path(tsconfig, cwd);
        let metadata = std::fs::metadata(&tsconfig).with_path(&tsconfig)?;
        if !metadata.is_file() {
            return Err(CliError::FileNotFound(tsconfig));
        }
        declarations = declarations.with_project(tsconfig);
    }

    let formatter = FormatterKind::from(args.formatter).build(cwd);
    tracing::debug!(formatter = formatter.name(), "post-processing configured");

    let post = PostProcessor::new(cwd, formatter, Arc::new(declarations))
        .context("Cannot set up post-processing")?;
    Ok(Orchestrator::new(
        Arc::new(EsbuildToolchain::new(cwd)),
        Arc::new(post),
    ))
}

fn emit(outcome: &TargetOutcome, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(outcome)?);
    } else {
        ui::print_outcome(outcome);
    }
    Ok(())
}

/// Build every target once and report the outcomes.
///
/// # Errors
///
/// Returns `CliError::TargetsFailed` when any target failed; the other
/// targets are still built and reported.
pub async fn run_once(
    orchestrator: Orchestrator,
    targets: Vec<BuildTarget>,
    json: bool,
) -> Result<()> {
    let total = targets.len();
    let started = Instant::now();

    let outcomes = orchestrator.run(targets).await;
    for outcome in &outcomes {
        emit(outcome, json)?;
    }

    let failed = outcomes.iter().filter(|o| !o.is_built()).count();
    if failed > 0 {
        return Err(CliError::TargetsFailed { failed, total });
    }

    if !json {
        ui::info(&format!(
            "Finished {} target(s) in {}",
            total,
            ui::format_duration(started.elapsed())
        ));
    }
    Ok(())
}

/// Build every target, then report each rebuild until Ctrl+C or until every
/// watcher has stopped.
pub async fn run_watch(
    orchestrator: Orchestrator,
    targets: Vec<BuildTarget>,
    json: bool,
) -> Result<()> {
    let (tx, mut outcomes) = mpsc::channel(32);
    let watch = tokio::spawn(async move { orchestrator.watch(targets, tx).await });

    if !json {
        ui::info("Watching for changes. Press Ctrl+C to stop");
    }

    loop {
        tokio::select! {
            outcome = outcomes.recv() => match outcome {
                Some(outcome) => emit(&outcome, json)?,
                None => {
                    ui::warning("All watchers stopped");
                    break;
                }
            },

            _ = signal::ctrl_c() => {
                ui::info("Stopping watch mode");
                break;
            }
        }
    }

    watch.abort();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_path_keeps_absolute() {
        let cwd = Path::new("/project");
        assert_eq!(resolve_path(Path::new("/etc/x"), cwd), PathBuf::from("/etc/x"));
        assert_eq!(
            resolve_path(Path::new("tsconfig.json"), cwd),
            PathBuf::from("/project/tsconfig.json")
        );
    }

    #[test]
    fn test_resolve_cwd_absolute() {
        let dir = TempDir::new().unwrap();
        assert_eq!(resolve_cwd(Some(dir.path())).unwrap(), dir.path());
    }

    #[test]
    fn test_resolve_cwd_missing() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let err = resolve_cwd(Some(&missing)).unwrap_err();
        assert!(matches!(err, CliError::FileNotFound(path) if path == missing));
    }

    #[test]
    fn test_orchestrator_rejects_missing_tsconfig() {
        let dir = TempDir::new().unwrap();
        let args = PostProcessArgs {
            formatter: crate::cli::FormatterChoice::Layout,
            tsconfig: Some(PathBuf::from("tsconfig.build.json")),
        };
        let missing = dir.path().join("tsconfig.build.json");
        assert!(matches!(
            orchestrator(dir.path(), &args),
            Err(CliError::FileNotFound(path)) if path == missing
        ));
    }

    #[test]
    fn test_orchestrator_rejects_tsconfig_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("tsconfig.json")).unwrap();
        let args = PostProcessArgs {
            formatter: crate::cli::FormatterChoice::Layout,
            tsconfig: Some(PathBuf::from("tsconfig.json")),
        };
        assert!(matches!(
            orchestrator(dir.path(), &args),
            Err(CliError::FileNotFound(_))
        ));
    }
}
