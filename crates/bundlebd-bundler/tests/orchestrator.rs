//! Orchestrator behavior against a mock toolchain.

mod helpers;

use bundlebd_bundler::{
    BuildCycle, BuildReport, BuildTarget, Orchestrator, OutcomeStatus, TargetPlugin,
};
use helpers::{CountingFormatter, MockToolchain, artifact, post_processor};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::mpsc;

fn targets() -> Vec<BuildTarget> {
    let bin = BuildTarget::new("bin", "src/bin/index.ts", "bin.js");
    let mut lib = BuildTarget::new("lib", "src/lib/index.ts", "index.js");
    lib.plugins = vec![TargetPlugin::EmitDeclarations, TargetPlugin::StripComments];
    vec![bin, lib]
}

#[tokio::test]
async fn one_failed_target_does_not_block_the_other() {
    let dir = TempDir::new().unwrap();
    let formatter = Arc::new(CountingFormatter::default());
    let toolchain = Arc::new(MockToolchain::new(dir.path()).failing("bin"));
    let orchestrator = Orchestrator::new(toolchain, post_processor(dir.path(), formatter.clone()));

    let outcomes = orchestrator.run(targets()).await;

    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].target, "bin");
    assert!(matches!(outcomes[0].status, OutcomeStatus::Failed { .. }));
    assert_eq!(outcomes[0].to_string(), "Failed to build bin");

    assert_eq!(outcomes[1].target, "lib");
    assert!(outcomes[1].is_built());
    assert_eq!(outcomes[1].to_string(), "Built lib");

    // Only the successful target is post-processed.
    assert_eq!(formatter.calls(), 1);
    assert!(!dir.path().join("bin.js").exists());
    let lib = std::fs::read_to_string(dir.path().join("index.js")).unwrap();
    assert_eq!(lib, "console.log(\"lib\", 0);\n");
}

#[tokio::test]
async fn outcomes_follow_target_order() {
    let dir = TempDir::new().unwrap();
    let formatter = Arc::new(CountingFormatter::default());
    let toolchain = Arc::new(MockToolchain::new(dir.path()));
    let orchestrator = Orchestrator::new(toolchain, post_processor(dir.path(), formatter));

    let mut reversed = targets();
    reversed.reverse();
    let names: Vec<_> = orchestrator
        .run(reversed)
        .await
        .into_iter()
        .map(|o| o.target)
        .collect();
    assert_eq!(names, vec!["lib", "bin"]);
}

#[tokio::test]
async fn each_rebuild_signal_is_post_processed_once() {
    let dir = TempDir::new().unwrap();
    let formatter = Arc::new(CountingFormatter::default());
    let toolchain = MockToolchain::new(dir.path());
    let rebuilds = toolchain.rebuild_channel("lib");
    let orchestrator = Orchestrator::new(
        Arc::new(toolchain),
        post_processor(dir.path(), formatter.clone()),
    );

    let lib = targets().remove(1);
    let (sink, mut outcomes) = mpsc::channel(16);
    let watching = tokio::spawn(async move { orchestrator.watch(vec![lib], sink).await });

    let read_lib = || std::fs::read_to_string(dir.path().join("index.js")).unwrap();
    let mut received = vec![outcomes.recv().await.unwrap()];
    assert_eq!(read_lib(), "console.log(\"lib\", 0);\n");

    // One signal at a time, so each cycle's artifact is on disk when it is processed.
    for cycle in 1..=2 {
        rebuilds.send(BuildReport::success()).await.unwrap();
        received.push(outcomes.recv().await.unwrap());
        assert_eq!(read_lib(), format!("console.log(\"lib\", {cycle});\n"));
    }
    drop(rebuilds);
    assert!(outcomes.recv().await.is_none());
    watching.await.unwrap();

    let cycles: Vec<_> = received.iter().map(|o| o.cycle).collect();
    assert_eq!(
        cycles,
        vec![
            BuildCycle::Initial,
            BuildCycle::Rebuild(1),
            BuildCycle::Rebuild(2)
        ]
    );
    assert!(received.iter().all(|o| o.is_built()));

    // Initial build plus exactly one run per rebuild signal, each on that
    // cycle's stripped artifact.
    let expected: Vec<String> = (0..=2)
        .map(|cycle| artifact("lib", cycle).replacen("// lib\n", "", 1))
        .collect();
    assert_eq!(formatter.inputs(), expected);
}

#[tokio::test]
async fn failed_rebuild_is_reported_and_skips_post_processing() {
    let dir = TempDir::new().unwrap();
    let formatter = Arc::new(CountingFormatter::default());
    let toolchain = MockToolchain::new(dir.path());
    let rebuilds = toolchain.rebuild_channel("bin");
    let orchestrator = Orchestrator::new(
        Arc::new(toolchain),
        post_processor(dir.path(), formatter.clone()),
    );

    rebuilds
        .send(BuildReport::failed("Expected \";\" but found \"}\""))
        .await
        .unwrap();
    drop(rebuilds);

    let bin = targets().remove(0);
    let (sink, mut outcomes) = mpsc::channel(16);
    orchestrator.watch(vec![bin], sink).await;

    let initial = outcomes.recv().await.unwrap();
    assert!(initial.is_built());

    let rebuild = outcomes.recv().await.unwrap();
    assert_eq!(rebuild.cycle, BuildCycle::Rebuild(1));
    assert_eq!(rebuild.to_string(), "Failed to build bin");
    assert!(outcomes.recv().await.is_none());

    assert_eq!(formatter.calls(), 1);
}
