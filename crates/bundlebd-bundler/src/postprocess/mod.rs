//! Steps applied to an artifact after every successful build or rebuild.
//!
//! In order: strip line comments (targets with
//! [`TargetPlugin::StripComments`]), emit declarations (targets with
//! [`TargetPlugin::EmitDeclarations`], skipped when the build reported
//! errors), then format and write back. Only the format step can fail the
//! target; a failed declaration emit becomes a warning.

mod comments;
mod declarations;
mod format;

pub use comments::{CommentStripper, LINE_COMMENT_PATTERN};
pub use declarations::{DeclarationEmitter, TscEmitter};
pub use format::{
    EndOfLine, FormatOptions, Formatter, FormatterKind, IndentStyle, LayoutFormatter,
    PrettierFormatter,
};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::target::{BuildTarget, TargetPlugin};
use crate::toolchain::BuildReport;

pub struct PostProcessor {
    cwd: PathBuf,
    formatter: Arc<dyn Formatter>,
    declarations: Arc<dyn DeclarationEmitter>,
    stripper: CommentStripper,
    options: FormatOptions,
}

impl PostProcessor {
    pub fn new(
        cwd: impl Into<PathBuf>,
        formatter: Arc<dyn Formatter>,
        declarations: Arc<dyn DeclarationEmitter>,
    ) -> Result<Self> {
        Ok(Self {
            cwd: cwd.into(),
            formatter,
            declarations,
            stripper: CommentStripper::new()?,
            options: FormatOptions::default(),
        })
    }

    pub fn format_options(&self) -> &FormatOptions {
        &self.options
    }

    /// Run every applicable step on `target`'s artifact.
    ///
    /// Returns the warnings collected along the way.
    pub async fn run(&self, target: &BuildTarget, report: &BuildReport) -> Result<Vec<String>> {
        let path = self.artifact_path(&target.output_file);
        let mut warnings = Vec::new();

        if target.has_plugin(TargetPlugin::StripComments) && !report.has_errors() {
            let content = read(&path).await?;
            write(&path, &self.stripper.strip(&content)).await?;
        }

        if target.has_plugin(TargetPlugin::EmitDeclarations) && !report.has_errors() {
            if let Err(err) = self.declarations.emit().await {
                tracing::warn!(target = %target.name, "declaration emit failed: {}", err);
                warnings.push(format!("Failed to emit declarations for {}: {}", target.name, err));
            }
        }

        let content = read(&path).await?;
        let formatted = self.formatter.format(&content, &self.options).await?;
        write(&path, &formatted).await?;

        tracing::debug!(
            target = %target.name,
            formatter = self.formatter.name(),
            path = %path.display(),
            "post-processed artifact"
        );

        Ok(warnings)
    }

    fn artifact_path(&self, output_file: &Path) -> PathBuf {
        if output_file.is_absolute() {
            output_file.to_path_buf()
        } else {
            self.cwd.join(output_file)
        }
    }
}

async fn read(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::io(path, e))
}

async fn write(path: &Path, content: &str) -> Result<()> {
    tokio::fs::write(path, content)
        .await
        .map_err(|e| Error::io(path, e))
}
