//! Bundle command implementation.

use std::path::Path;

use bundlebd_bundler::derive_plan;
use bundlebd_config::{ResolvedConfig, RunParams};

use crate::cli::BundleArgs;
use crate::commands::utils;
use crate::error::Result;

/// Execute the bundle command.
///
/// Configuration errors abort before anything is built. With `--development`
/// the plugin is rebuilt on every source change until Ctrl+C.
pub async fn execute(args: BundleArgs, cwd: &Path) -> Result<()> {
    let params = RunParams::new(&args.plugin).with_development(args.development);
    let config = ResolvedConfig::load(cwd, params)?;
    let plan = derive_plan(&config)?;

    tracing::info!(
        plugin = %plan.name,
        output = %plan.output.file().display(),
        zlibrary = config.plugin.zlibrary,
        "bundling plugin"
    );

    let orchestrator = utils::orchestrator(cwd, &args.post)?;
    let targets = vec![plan.to_target()];

    if plan.watch {
        utils::run_watch(orchestrator, targets, args.json).await
    } else {
        utils::run_once(orchestrator, targets, args.json).await
    }
}
