//! Debounced source watcher driving rebuilds in watch mode.
//!
//! Watches a target's source root recursively and forwards relevant changes
//! through a channel, skipping `node_modules`, hidden entries and anything
//! matching the configured ignore patterns.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::error::{Error, Result};

/// Debounce window used when the caller has no opinion.
pub const DEFAULT_DEBOUNCE_MS: u64 = 100;

/// Directory names that never trigger a rebuild.
pub const DEFAULT_IGNORE: &[&str] = &["node_modules", "dist"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceChange {
    Modified(PathBuf),
    Created(PathBuf),
    Removed(PathBuf),
}

impl SourceChange {
    pub fn path(&self) -> &Path {
        match self {
            Self::Modified(p) | Self::Created(p) | Self::Removed(p) => p,
        }
    }
}

/// Live watcher. Dropping it stops the notifications and closes the channel.
pub struct SourceWatcher {
    _watcher: RecommendedWatcher,
}

impl SourceWatcher {
    /// Watch `root` recursively.
    ///
    /// Patterns starting with `*` match file suffixes (`*.log`); any other
    /// pattern matches a path prefix or directory name relative to `root`.
    pub fn new(
        root: PathBuf,
        ignore_patterns: Vec<String>,
        debounce_ms: u64,
    ) -> Result<(Self, mpsc::Receiver<SourceChange>)> {
        if !root.exists() {
            return Err(Error::WatchRootMissing(root));
        }

        let (tx, rx) = mpsc::channel(100);
        let debounce = Duration::from_millis(debounce_ms);
        let mut last_event: Option<(PathBuf, Instant)> = None;
        let watch_root = root.clone();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let event = match res {
                Ok(event) => event,
                Err(err) => {
                    tracing::warn!("watch error: {}", err);
                    return;
                }
            };

            for path in &event.paths {
                if should_ignore(path, &watch_root, &ignore_patterns) {
                    continue;
                }

                let now = Instant::now();
                if let Some((last_path, last_time)) = &last_event {
                    if last_path == path && now.duration_since(*last_time) < debounce {
                        continue;
                    }
                }
                last_event = Some((path.clone(), now));

                let change = match event.kind {
                    notify::EventKind::Create(_) => SourceChange::Created(path.clone()),
                    notify::EventKind::Modify(_) => SourceChange::Modified(path.clone()),
                    notify::EventKind::Remove(_) => SourceChange::Removed(path.clone()),
                    _ => continue,
                };

                // Receiver gone means the watch loop ended.
                if tx.blocking_send(change).is_err() {
                    return;
                }
            }
        })?;

        watcher.watch(&root, RecursiveMode::Recursive)?;
        tracing::debug!(root = %root.display(), "watching sources");

        Ok((Self { _watcher: watcher }, rx))
    }
}

fn should_ignore(path: &Path, root: &Path, ignore_patterns: &[String]) -> bool {
    let Ok(rel_path) = path.strip_prefix(root) else {
        return true;
    };
    let path_str = rel_path.to_string_lossy();

    for pattern in ignore_patterns {
        if let Some(suffix) = pattern.strip_prefix('*') {
            if path_str.ends_with(suffix) {
                return true;
            }
        } else if path_str.starts_with(pattern.as_str())
            || path_str.contains(&format!("/{}", pattern))
        {
            return true;
        }
    }

    rel_path.components().any(|component| {
        component
            .as_os_str()
            .to_str()
            .is_some_and(|name| name.starts_with('.') && name != "." && name != "..")
    })
}
