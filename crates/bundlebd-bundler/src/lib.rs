//! Build planning and orchestration for BundleBD.
//!
//! The flow for one invocation:
//!
//! 1. [`derive_plan`] expands a [`ResolvedConfig`](bundlebd_config::ResolvedConfig)
//!    into a [`DerivedBuildPlan`]: entry, output shape, module rules,
//!    externals and optimizer policy.
//! 2. The plan is lowered to a [`BuildTarget`] (or the fixed targets from
//!    [`builtin_targets`] are used).
//! 3. The [`Orchestrator`] runs targets through a [`Toolchain`] and hands every
//!    successful build to the [`PostProcessor`].
//!
//! ```no_run
//! use std::sync::Arc;
//! use bundlebd_bundler::{
//!     EsbuildToolchain, FormatterKind, Orchestrator, PostProcessor, TscEmitter, derive_plan,
//! };
//! use bundlebd_config::{ResolvedConfig, RunParams};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let cwd = std::env::current_dir()?;
//! let config = ResolvedConfig::load(&cwd, RunParams::new("MyPlugin"))?;
//! let plan = derive_plan(&config)?;
//!
//! let post = PostProcessor::new(
//!     &cwd,
//!     FormatterKind::Prettier.build(&cwd),
//!     Arc::new(TscEmitter::new(&cwd)),
//! )?;
//! let orchestrator = Orchestrator::new(Arc::new(EsbuildToolchain::new(&cwd)), Arc::new(post));
//! for outcome in orchestrator.run(vec![plan.to_target()]).await {
//!     println!("{}", outcome);
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod orchestrator;
pub mod plan;
pub mod postprocess;
pub mod target;
pub mod toolchain;
pub mod watch;

pub use error::{Error, Result};
pub use orchestrator::{BuildCycle, Orchestrator, OutcomeStatus, TargetOutcome};
pub use plan::{DerivedBuildPlan, derive_plan};
pub use postprocess::{
    CommentStripper, DeclarationEmitter, FormatOptions, Formatter, FormatterKind,
    LayoutFormatter, PostProcessor, PrettierFormatter, TscEmitter,
};
pub use target::{BuildTarget, Format, Loader, Platform, TargetPlugin, builtin_targets, is_bare_specifier};
pub use toolchain::{BuildReport, EsbuildToolchain, RebuildReceiver, Toolchain};
