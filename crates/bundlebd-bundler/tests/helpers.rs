//! Shared test doubles for the orchestrator tests.
//!
//! The mock toolchain writes a small artifact per target and cycle instead of
//! running a bundler, and hands out rebuild channels the test drives by hand.

#![allow(dead_code)]

use async_trait::async_trait;
use bundlebd_bundler::{
    BuildReport, BuildTarget, DeclarationEmitter, FormatOptions, Formatter, LayoutFormatter,
    PostProcessor, RebuildReceiver, Result, Toolchain,
};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

pub struct MockToolchain {
    cwd: PathBuf,
    failing: HashSet<String>,
    rebuilds: Mutex<HashMap<String, RebuildReceiver>>,
}

impl MockToolchain {
    pub fn new(cwd: &Path) -> Self {
        Self {
            cwd: cwd.to_path_buf(),
            failing: HashSet::new(),
            rebuilds: Mutex::new(HashMap::new()),
        }
    }

    /// Make every build of `target` report a compile error.
    pub fn failing(mut self, target: &str) -> Self {
        self.failing.insert(target.to_string());
        self
    }

    /// Rebuild channel for `target`. Reports sent on the returned sender are
    /// delivered as rebuilds; dropping it ends the watch.
    pub fn rebuild_channel(&self, target: &str) -> mpsc::Sender<BuildReport> {
        let (tx, rx) = mpsc::channel(16);
        self.rebuilds
            .lock()
            .unwrap()
            .insert(target.to_string(), rx);
        tx
    }
}

#[async_trait]
impl Toolchain for MockToolchain {
    async fn build(&self, target: &BuildTarget) -> Result<BuildReport> {
        if self.failing.contains(&target.name) {
            return Ok(BuildReport::failed(format!("Could not resolve entry for {}", target.name)));
        }
        let path = self.cwd.join(&target.output_file);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, artifact(&target.name, 0)).unwrap();
        Ok(BuildReport::success())
    }

    /// Rewrites the artifact for every successful rebuild before relaying
    /// its report, like a bundler in watch mode.
    async fn watch(&self, target: &BuildTarget) -> Result<RebuildReceiver> {
        let Some(mut driven) = self.rebuilds.lock().unwrap().remove(&target.name) else {
            return Ok(mpsc::channel(1).1);
        };
        let (tx, rx) = mpsc::channel(16);
        let path = self.cwd.join(&target.output_file);
        let name = target.name.clone();
        tokio::spawn(async move {
            let mut cycle = 0;
            while let Some(report) = driven.recv().await {
                cycle += 1;
                if !report.has_errors() {
                    std::fs::write(&path, artifact(&name, cycle)).unwrap();
                }
                if tx.send(report).await.is_err() {
                    break;
                }
            }
        });
        Ok(rx)
    }
}

/// Raw bundler output for `target` at build `cycle` (0 is the initial build).
pub fn artifact(target: &str, cycle: usize) -> String {
    format!("// {target}\nconsole.log(\"{target}\", {cycle});   \n")
}

/// Layout formatter that records every source it is handed.
#[derive(Default)]
pub struct CountingFormatter {
    pub calls: AtomicUsize,
    inputs: Mutex<Vec<String>>,
}

impl CountingFormatter {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }
}

#[async_trait]
impl Formatter for CountingFormatter {
    fn name(&self) -> &'static str {
        "counting"
    }

    async fn format(&self, source: &str, options: &FormatOptions) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inputs.lock().unwrap().push(source.to_string());
        LayoutFormatter.format(source, options).await
    }
}

pub struct NoDeclarations;

#[async_trait]
impl DeclarationEmitter for NoDeclarations {
    async fn emit(&self) -> Result<()> {
        Ok(())
    }
}

pub fn post_processor(cwd: &Path, formatter: Arc<CountingFormatter>) -> Arc<PostProcessor> {
    Arc::new(PostProcessor::new(cwd, formatter, Arc::new(NoDeclarations)).unwrap())
}
