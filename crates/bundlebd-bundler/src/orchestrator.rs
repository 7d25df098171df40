//! Multi-target build orchestration.
//!
//! [`Orchestrator::run`] builds every target once, concurrently, and reports
//! one [`TargetOutcome`] per target in the order the targets were given.
//! [`Orchestrator::watch`] does the same initial build and then stays
//! subscribed to each target's rebuild channel, post-processing and reporting
//! every rebuild until the toolchain stops watching.
//!
//! Targets never share state. A failure in one target (toolchain error,
//! missing artifact, formatter failure) is reported for that target only.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::postprocess::PostProcessor;
use crate::target::BuildTarget;
use crate::toolchain::{BuildReport, Toolchain};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum OutcomeStatus {
    Built,
    Failed { reason: String },
}

/// Which build of a target an outcome belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildCycle {
    Initial,
    /// 1-based rebuild counter.
    Rebuild(u64),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetOutcome {
    pub target: String,
    #[serde(flatten)]
    pub status: OutcomeStatus,
    pub cycle: BuildCycle,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl TargetOutcome {
    pub fn built(target: impl Into<String>, cycle: BuildCycle, warnings: Vec<String>) -> Self {
        Self {
            target: target.into(),
            status: OutcomeStatus::Built,
            cycle,
            warnings,
        }
    }

    pub fn failed(target: impl Into<String>, cycle: BuildCycle, reason: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            status: OutcomeStatus::Failed {
                reason: reason.into(),
            },
            cycle,
            warnings: Vec::new(),
        }
    }

    pub fn is_built(&self) -> bool {
        self.status == OutcomeStatus::Built
    }
}

impl fmt::Display for TargetOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            OutcomeStatus::Built => write!(f, "Built {}", self.target),
            OutcomeStatus::Failed { .. } => write!(f, "Failed to build {}", self.target),
        }
    }
}

#[derive(Clone)]
pub struct Orchestrator {
    toolchain: Arc<dyn Toolchain>,
    post: Arc<PostProcessor>,
}

impl Orchestrator {
    pub fn new(toolchain: Arc<dyn Toolchain>, post: Arc<PostProcessor>) -> Self {
        Self { toolchain, post }
    }

    /// Build every target once. Outcomes come back in target order.
    pub async fn run(&self, targets: Vec<BuildTarget>) -> Vec<TargetOutcome> {
        let names: Vec<String> = targets.iter().map(|t| t.name.clone()).collect();
        let mut set = JoinSet::new();

        for (index, target) in targets.into_iter().enumerate() {
            let this = self.clone();
            set.spawn(async move { (index, this.build_once(&target).await) });
        }

        let mut outcomes: Vec<Option<TargetOutcome>> = vec![None; names.len()];
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((index, outcome)) => outcomes[index] = Some(outcome),
                Err(err) => tracing::error!("build task aborted: {}", err),
            }
        }

        outcomes
            .into_iter()
            .zip(names)
            .map(|(outcome, name)| {
                outcome.unwrap_or_else(|| {
                    TargetOutcome::failed(name, BuildCycle::Initial, "build task aborted")
                })
            })
            .collect()
    }

    /// Build every target, then post-process and report each rebuild the
    /// toolchain signals. Outcomes go to `sink` as they happen; rebuilds of
    /// one target are handled strictly one after another.
    ///
    /// Returns once every target's rebuild channel has closed, or the sink has.
    pub async fn watch(&self, targets: Vec<BuildTarget>, sink: mpsc::Sender<TargetOutcome>) {
        let mut set = JoinSet::new();

        for target in targets {
            let this = self.clone();
            let sink = sink.clone();
            set.spawn(async move { this.watch_target(target, sink).await });
        }
        drop(sink);

        while let Some(joined) = set.join_next().await {
            if let Err(err) = joined {
                tracing::error!("watch task aborted: {}", err);
            }
        }
    }

    async fn watch_target(&self, target: BuildTarget, sink: mpsc::Sender<TargetOutcome>) {
        // Subscribe before the initial build so changes made during it are not lost.
        let rebuilds = self.toolchain.watch(&target).await;

        let initial = self.build_once(&target).await;
        if sink.send(initial).await.is_err() {
            return;
        }

        let mut rebuilds = match rebuilds {
            Ok(rx) => rx,
            Err(err) => {
                let outcome = TargetOutcome::failed(
                    &target.name,
                    BuildCycle::Rebuild(0),
                    format!("cannot watch: {}", err),
                );
                let _ = sink.send(outcome).await;
                return;
            }
        };

        let mut cycle = 0;
        while let Some(report) = rebuilds.recv().await {
            cycle += 1;
            let outcome = self
                .finish(&target, BuildCycle::Rebuild(cycle), report)
                .await;
            if sink.send(outcome).await.is_err() {
                return;
            }
        }

        tracing::debug!(target = %target.name, "rebuild channel closed");
    }

    async fn build_once(&self, target: &BuildTarget) -> TargetOutcome {
        match self.toolchain.build(target).await {
            Ok(report) => self.finish(target, BuildCycle::Initial, report).await,
            Err(err) => {
                tracing::error!(target = %target.name, "toolchain failed: {}", err);
                TargetOutcome::failed(&target.name, BuildCycle::Initial, err.to_string())
            }
        }
    }

    /// Post-process a finished toolchain run, or report its errors.
    async fn finish(
        &self,
        target: &BuildTarget,
        cycle: BuildCycle,
        report: BuildReport,
    ) -> TargetOutcome {
        if report.has_errors() {
            for error in &report.errors {
                tracing::error!(target = %target.name, "{}", error);
            }
            return TargetOutcome::failed(&target.name, cycle, report.errors.join("\n"));
        }

        match self.post.run(target, &report).await {
            Ok(mut warnings) => {
                let mut all = report.warnings;
                all.append(&mut warnings);
                TargetOutcome::built(&target.name, cycle, all)
            }
            Err(err) => {
                tracing::error!(target = %target.name, "post-processing failed: {}", err);
                TargetOutcome::failed(&target.name, cycle, err.to_string())
            }
        }
    }
}
