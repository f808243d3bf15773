//! # Inspection Tool
//!
//! The section and symbol reports come from an external object-file
//! inspection tool (`objdump` or a cross-toolchain variant such as
//! `arm-none-eabi-objdump`). This module is the seam between that collaborator
//! and the parsers: the parsers only ever see a [`ToolOutput`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use objtab_core::tool::{InspectionTool, Objdump};
//!
//! let objdump = Objdump::new("arm-none-eabi-objdump");
//! let output = objdump.section_headers(Path::new("firmware.elf"))?;
//! println!("{}", output.into_report("arm-none-eabi-objdump")?);
//! # Ok::<(), objtab_core::error::ObjtabError>(())
//! ```

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tracing::debug;

use crate::error::{ObjtabError, ObjtabResult};

/// Captured result of one tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput
{
    /// Standard output, lossily decoded.
    pub stdout: String,
    /// Standard error, lossily decoded.
    pub stderr: String,
    /// Exit code, `None` if the process was terminated by a signal.
    pub exit_code: Option<i32>,
    /// Whether the process reported success.
    pub success: bool,
}

impl ToolOutput
{
    /// Wrap a report that was captured elsewhere and is known to be good.
    pub fn captured(stdout: impl Into<String>) -> Self
    {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            exit_code: Some(0),
            success: true,
        }
    }

    /// Wrap a failed invocation.
    pub fn failed(exit_code: Option<i32>, stderr: impl Into<String>) -> Self
    {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            exit_code,
            success: false,
        }
    }

    /// Borrow the report text, failing if the tool did not succeed.
    ///
    /// ## Errors
    ///
    /// `ToolInvocationFailed` with the exit status and the first line of
    /// standard error.
    pub fn report(&self, tool: &str) -> ObjtabResult<&str>
    {
        if self.success {
            return Ok(&self.stdout);
        }

        let status = match self.exit_code {
            Some(code) => format!("exited with status {code}"),
            None => "terminated by signal".to_string(),
        };
        let detail = match self.stderr.lines().map(str::trim).find(|line| !line.is_empty()) {
            Some(line) => format!("{status}: {line}"),
            None => status,
        };
        Err(ObjtabError::ToolInvocationFailed {
            tool: tool.to_string(),
            detail,
        })
    }

    /// Owned variant of [`ToolOutput::report`].
    ///
    /// ## Errors
    ///
    /// Same as [`ToolOutput::report`].
    pub fn into_report(self, tool: &str) -> ObjtabResult<String>
    {
        self.report(tool)?;
        Ok(self.stdout)
    }
}

impl From<Output> for ToolOutput
{
    fn from(output: Output) -> Self
    {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
            success: output.status.success(),
        }
    }
}

/// Source of the two textual reports a table is built from.
pub trait InspectionTool
{
    /// Human readable tool name, used in error messages.
    fn name(&self) -> &str;

    /// Section-header report for `executable`.
    ///
    /// ## Errors
    ///
    /// `ToolInvocationFailed` if the tool could not be started.
    fn section_headers(&self, executable: &Path) -> ObjtabResult<ToolOutput>;

    /// Demangled symbol-table report for `executable`.
    ///
    /// ## Errors
    ///
    /// `ToolInvocationFailed` if the tool could not be started.
    fn symbol_table(&self, executable: &Path) -> ObjtabResult<ToolOutput>;
}

/// Runs a binutils-compatible `objdump`.
#[derive(Debug, Clone)]
pub struct Objdump
{
    program: PathBuf,
    display_name: String,
}

impl Objdump
{
    /// Use the given program name or path.
    pub fn new(program: impl Into<PathBuf>) -> Self
    {
        let program = program.into();
        let display_name = program.display().to_string();
        Self { program, display_name }
    }

    fn run(&self, args: &[&str], executable: &Path) -> ObjtabResult<ToolOutput>
    {
        debug!(tool = %self.display_name, ?args, executable = %executable.display(), "running inspection tool");
        Command::new(&self.program)
            .args(args)
            .arg(executable)
            .output()
            .map(ToolOutput::from)
            .map_err(|err| ObjtabError::ToolInvocationFailed {
                tool: self.display_name.clone(),
                detail: err.to_string(),
            })
    }
}

impl Default for Objdump
{
    fn default() -> Self
    {
        Self::new("objdump")
    }
}

impl InspectionTool for Objdump
{
    fn name(&self) -> &str
    {
        &self.display_name
    }

    fn section_headers(&self, executable: &Path) -> ObjtabResult<ToolOutput>
    {
        self.run(&["--section-headers"], executable)
    }

    fn symbol_table(&self, executable: &Path) -> ObjtabResult<ToolOutput>
    {
        self.run(&["--syms", "--demangle"], executable)
    }
}

/// Reports captured ahead of time (saved tool output, test fixtures).
///
/// The executable path passed to the trait methods is ignored.
#[derive(Debug, Clone)]
pub struct CapturedReports
{
    sections: ToolOutput,
    symbols: ToolOutput,
}

impl CapturedReports
{
    /// Wrap two successful reports.
    pub fn new(sections: impl Into<String>, symbols: impl Into<String>) -> Self
    {
        Self {
            sections: ToolOutput::captured(sections),
            symbols: ToolOutput::captured(symbols),
        }
    }

    /// Wrap two arbitrary outputs, including failed ones.
    pub fn from_outputs(sections: ToolOutput, symbols: ToolOutput) -> Self
    {
        Self { sections, symbols }
    }

    /// Read both reports from disk.
    ///
    /// ## Errors
    ///
    /// `Io` if either file cannot be read.
    pub fn from_files(sections: &Path, symbols: &Path) -> ObjtabResult<Self>
    {
        Ok(Self::new(std::fs::read_to_string(sections)?, std::fs::read_to_string(symbols)?))
    }
}

impl InspectionTool for CapturedReports
{
    fn name(&self) -> &str
    {
        "captured report"
    }

    fn section_headers(&self, _executable: &Path) -> ObjtabResult<ToolOutput>
    {
        Ok(self.sections.clone())
    }

    fn symbol_table(&self, _executable: &Path) -> ObjtabResult<ToolOutput>
    {
        Ok(self.symbols.clone())
    }
}
