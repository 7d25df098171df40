//! Plan command implementation.

use std::path::Path;

use bundlebd_bundler::derive_plan;
use bundlebd_config::{ResolvedConfig, RunParams};

use crate::cli::PlanArgs;
use crate::error::Result;

/// Execute the plan command: print the derived plan as pretty JSON on stdout.
pub async fn execute(args: PlanArgs, cwd: &Path) -> Result<()> {
    let params = RunParams::new(&args.plugin).with_development(args.development);
    let config = ResolvedConfig::load(cwd, params)?;
    let plan = derive_plan(&config)?;

    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
