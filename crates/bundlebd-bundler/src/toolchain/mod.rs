//! The bundling toolchain boundary.
//!
//! The orchestrator never bundles anything itself. It hands a [`BuildTarget`]
//! to a [`Toolchain`] and gets a [`BuildReport`] back, once per build and once
//! per rebuild in watch mode.

mod esbuild;

pub use esbuild::EsbuildToolchain;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::Result;
use crate::target::BuildTarget;

/// Result of one toolchain run that got as far as compiling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl BuildReport {
    pub fn success() -> Self {
        Self::default()
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            errors: vec![error.into()],
            warnings: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Receiver of rebuild reports for one watched target. Closed when the
/// toolchain stops watching.
pub type RebuildReceiver = mpsc::Receiver<BuildReport>;

#[async_trait]
pub trait Toolchain: Send + Sync {
    /// Build `target` once.
    ///
    /// `Err` means the toolchain could not run at all; compile errors come
    /// back as a report with [`BuildReport::has_errors`] set.
    async fn build(&self, target: &BuildTarget) -> Result<BuildReport>;

    /// Start watching `target`'s sources. Each completed rebuild is sent on
    /// the returned channel. The initial build is not part of the stream.
    async fn watch(&self, target: &BuildTarget) -> Result<RebuildReceiver>;
}
