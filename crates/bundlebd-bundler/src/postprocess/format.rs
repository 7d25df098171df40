//! Output formatting.
//!
//! Every artifact is reformatted with one fixed option set before it is
//! written back. Two formatters implement [`Formatter`]: [`PrettierFormatter`]
//! runs the project's prettier, [`LayoutFormatter`] reprints the
//! artifact in process with oxc for machines without node tooling.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use oxc_allocator::Allocator;
use oxc_ast::ast::Program;
use oxc_codegen::{Codegen, CodegenOptions, IndentChar};
use oxc_parser::Parser;
use oxc_span::SourceType;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::{Duration, timeout};

use crate::error::{Error, Result};

/// Maximum accepted formatter output (50 MB)
const MAX_OUTPUT_SIZE: usize = 50 * 1024 * 1024;

/// Default timeout for one formatter run (30 seconds)
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentStyle {
    Tabs,
    Spaces,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndOfLine {
    Lf,
    Crlf,
}

impl EndOfLine {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Crlf => "\r\n",
        }
    }
}

/// Formatting options applied to every artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    pub print_width: usize,
    /// Width of one indentation level, in columns
    pub tab_width: usize,
    pub indent: IndentStyle,
    pub semicolons: bool,
    pub trailing_commas: bool,
    pub end_of_line: EndOfLine,
    pub parser: String,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            print_width: 200,
            tab_width: 4,
            indent: IndentStyle::Tabs,
            semicolons: true,
            trailing_commas: false,
            end_of_line: EndOfLine::Lf,
            parser: "babel".to_string(),
        }
    }
}

impl FormatOptions {
    /// Options as prettier command-line flags.
    pub fn prettier_args(&self) -> Vec<String> {
        let mut args = vec![
            "--print-width".to_string(),
            self.print_width.to_string(),
            "--tab-width".to_string(),
            self.tab_width.to_string(),
        ];
        if self.indent == IndentStyle::Tabs {
            args.push("--use-tabs".to_string());
        }
        if !self.semicolons {
            args.push("--no-semi".to_string());
        }
        args.push("--trailing-comma".to_string());
        args.push(if self.trailing_commas { "all" } else { "none" }.to_string());
        args.push("--end-of-line".to_string());
        args.push(
            match self.end_of_line {
                EndOfLine::Lf => "lf",
                EndOfLine::Crlf => "crlf",
            }
            .to_string(),
        );
        args.push("--parser".to_string());
        args.push(self.parser.clone());
        args
    }
}

#[async_trait]
pub trait Formatter: Send + Sync {
    fn name(&self) -> &'static str;

    async fn format(&self, source: &str, options: &FormatOptions) -> Result<String>;
}

/// Which formatter a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatterKind {
    #[default]
    Prettier,
    Layout,
}

impl FormatterKind {
    pub fn build(self, cwd: impl Into<PathBuf>) -> Arc<dyn Formatter> {
        match self {
            Self::Prettier => Arc::new(PrettierFormatter::new(cwd)),
            Self::Layout => Arc::new(LayoutFormatter),
        }
    }
}

/// Formats through the project's prettier over stdin/stdout.
#[derive(Debug, Clone)]
pub struct PrettierFormatter {
    program: String,
    prefix_args: Vec<String>,
    cwd: PathBuf,
    timeout_secs: u64,
}

impl PrettierFormatter {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: "npx".to_string(),
            prefix_args: vec!["--no-install".to_string(), "prettier".to_string()],
            cwd: cwd.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Use an explicit prettier executable instead of `npx prettier`.
    pub fn with_binary(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self.prefix_args.clear();
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

#[async_trait]
impl Formatter for PrettierFormatter {
    fn name(&self) -> &'static str {
        "prettier"
    }

    async fn format(&self, source: &str, options: &FormatOptions) -> Result<String> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.prefix_args)
            .args(options.prettier_args())
            .current_dir(&self.cwd)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| Error::spawn_failed("prettier", e))?;

        let mut stdin = child.stdin.take().ok_or_else(|| {
            Error::spawn_failed(
                "prettier",
                std::io::Error::new(std::io::ErrorKind::BrokenPipe, "failed to capture stdin"),
            )
        })?;
        stdin
            .write_all(source.as_bytes())
            .await
            .map_err(|e| Error::spawn_failed("prettier", e))?;
        drop(stdin);

        let output = timeout(
            Duration::from_secs(self.timeout_secs),
            child.wait_with_output(),
        )
        .await
        .map_err(|_| Error::timeout("prettier", self.timeout_secs))?
        .map_err(|e| Error::spawn_failed("prettier", e))?;

        if !output.status.success() {
            return Err(Error::Format {
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        if output.stdout.len() > MAX_OUTPUT_SIZE {
            return Err(Error::OutputTooLarge {
                tool: "prettier".to_string(),
                actual_bytes: output.stdout.len(),
                max_bytes: MAX_OUTPUT_SIZE,
            });
        }

        String::from_utf8(output.stdout).map_err(|e| Error::Format {
            message: e.to_string(),
        })
    }
}

/// In-process formatter: parses the artifact with oxc and prints it back
/// with oxc's code generator.
///
/// Output comes from the syntax tree, so string and template literal
/// contents, array holes and comments survive. Indentation follows
/// [`FormatOptions::indent`]; trailing commas are never printed and lines
/// are not wrapped at [`FormatOptions::print_width`]. Source that neither a
/// module nor a script parse accepts is a [`Error::Format`]. With
/// [`EndOfLine::Crlf`] every line break is converted, including those inside
/// template literals, as prettier does.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutFormatter;

impl LayoutFormatter {
    pub fn format_source(source: &str, options: &FormatOptions) -> Result<String> {
        let allocator = Allocator::default();
        let program = parse_program(&allocator, source)?;

        // One tab per level, like prettier's useTabs.
        let (indent_char, indent_width) = match options.indent {
            IndentStyle::Tabs => (IndentChar::Tab, 1),
            IndentStyle::Spaces => (IndentChar::Space, options.tab_width.max(1)),
        };
        let codegen_options = CodegenOptions {
            indent_char,
            indent_width,
            ..CodegenOptions::default()
        };
        let code = Codegen::new()
            .with_options(codegen_options)
            .build(&program)
            .code;

        Ok(match options.end_of_line {
            EndOfLine::Lf => code,
            EndOfLine::Crlf => code.replace('\n', EndOfLine::Crlf.as_str()),
        })
    }
}

#[async_trait]
impl Formatter for LayoutFormatter {
    fn name(&self) -> &'static str {
        "layout"
    }

    async fn format(&self, source: &str, options: &FormatOptions) -> Result<String> {
        Self::format_source(source, options)
    }
}

/// Parse as an ES module first, then as a sloppy-mode script.
fn parse_program<'a>(allocator: &'a Allocator, source: &'a str) -> Result<Program<'a>> {
    let mut first_failure = None;
    for source_type in [SourceType::mjs(), SourceType::cjs()] {
        let parsed = Parser::new(allocator, source, source_type).parse();
        if parsed.errors.is_empty() && !parsed.panicked {
            return Ok(parsed.program);
        }
        first_failure.get_or_insert_with(|| {
            parsed
                .errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ")
        });
    }
    Err(Error::Format {
        message: first_failure.unwrap_or_default(),
    })
}
