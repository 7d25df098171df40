//! Type declaration emission for the library target.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::{Duration, timeout};

use crate::error::{Error, Result};

/// Default timeout for one compiler run (120 seconds)
const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[async_trait]
pub trait DeclarationEmitter: Send + Sync {
    async fn emit(&self) -> Result<()>;
}

/// Emits declarations with the project's TypeScript compiler.
#[derive(Debug, Clone)]
pub struct TscEmitter {
    program: String,
    prefix_args: Vec<String>,
    cwd: PathBuf,
    project: Option<PathBuf>,
    timeout_secs: u64,
}

impl TscEmitter {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: "npx".to_string(),
            prefix_args: vec!["--no-install".to_string(), "tsc".to_string()],
            cwd: cwd.into(),
            project: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Use an explicit compiler executable instead of `npx tsc`.
    pub fn with_binary(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self.prefix_args.clear();
        self
    }

    /// Compile a specific tsconfig instead of the one in `cwd`.
    pub fn with_project(mut self, project: impl Into<PathBuf>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

#[async_trait]
impl DeclarationEmitter for TscEmitter {
    async fn emit(&self) -> Result<()> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.prefix_args);
        if let Some(project) = &self.project {
            cmd.arg("-p").arg(project);
        }
        cmd.current_dir(&self.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|e| Error::spawn_failed("tsc", e))?;
        let output = timeout(
            Duration::from_secs(self.timeout_secs),
            child.wait_with_output(),
        )
        .await
        .map_err(|_| Error::timeout("tsc", self.timeout_secs))?
        .map_err(|e| Error::spawn_failed("tsc", e))?;

        if !output.status.success() {
            // tsc reports diagnostics on stdout
            let mut diagnostics = String::from_utf8_lossy(&output.stdout).trim().to_string();
            let stderr = String::from_utf8_lossy(&output.stderr);
            if !stderr.trim().is_empty() {
                if !diagnostics.is_empty() {
                    diagnostics.push('\n');
                }
                diagnostics.push_str(stderr.trim());
            }
            return Err(Error::Declarations {
                exit_code: output.status.code().unwrap_or(-1),
                stderr: diagnostics,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_compiler_is_a_spawn_failure() {
        let emitter = TscEmitter::new(std::env::temp_dir()).with_binary("bundlebd-no-such-tsc");
        let err = emitter.emit().await.unwrap_err();
        assert!(matches!(err, Error::SpawnFailed { ref tool, .. } if tool == "tsc"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_compiler_reports_its_exit_code() {
        let emitter = TscEmitter::new(std::env::temp_dir()).with_binary("false");
        let err = emitter.emit().await.unwrap_err();
        assert!(matches!(err, Error::Declarations { exit_code: 1, .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn successful_compiler_emits() {
        let emitter = TscEmitter::new(std::env::temp_dir()).with_binary("true");
        emitter.emit().await.unwrap();
    }
}
