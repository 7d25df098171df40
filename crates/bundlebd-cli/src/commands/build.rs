//! Build command implementation.

use std::path::Path;

use bundlebd_bundler::builtin_targets;
use bundlebd_config::PackageManifest;

use crate::cli::BuildArgs;
use crate::commands::utils;
use crate::error::{Result, ResultExt};

const MANIFEST_HINT: &str =
    "package.json must be a JSON object whose `dependencies` map names to version strings";

/// Execute the build command for the fixed `bin` and `lib` targets.
///
/// The `bin` target leaves every dependency from `package.json` external; a
/// project without `package.json` gets no externals. The targets build
/// concurrently and a failure in one never stops the other.
pub async fn execute(args: BuildArgs, cwd: &Path) -> Result<()> {
    let manifest = PackageManifest::load(cwd).with_hint(MANIFEST_HINT)?;
    let targets = builtin_targets(&manifest);

    tracing::debug!(
        targets = targets.len(),
        externals = manifest.dependencies.len(),
        "building fixed targets"
    );

    let orchestrator = utils::orchestrator(cwd, &args.post)?;
    if args.watch {
        utils::run_watch(orchestrator, targets, args.json).await
    } else {
        utils::run_once(orchestrator, targets, args.json).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{FormatterChoice, PostProcessArgs};
    use tempfile::TempDir;

    #[tokio::test]
    async fn unreadable_manifest_error_carries_hint() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("package.json"), "[1, 2]").unwrap();
        let args = BuildArgs {
            watch: false,
            json: false,
            post: PostProcessArgs {
                formatter: FormatterChoice::Layout,
                tsconfig: None,
            },
        };

        let err = execute(args, dir.path()).await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("package.json"), "{message}");
        assert!(message.contains(&format!("Hint: {MANIFEST_HINT}")), "{message}");
    }
}
