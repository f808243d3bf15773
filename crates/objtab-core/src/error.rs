//! # Error Types
//!
//! General error handling for table construction and relocation.
//!
//! We use `thiserror` to automatically generate `Error` trait implementations
//! and nice error messages.

use thiserror::Error;

/// Main error type for symbol table operations
///
/// None of these are recoverable inside this crate. Parsing and relocation are
/// deterministic functions of their inputs, so the caller (usually a debug
/// session) decides whether to abort or report a diagnostic.
///
/// ## Error Categories
///
/// 1. **Collaborator errors**: ToolInvocationFailed, Io
/// 2. **Data errors**: UnresolvedSection
/// 3. **Usage errors**: PrerequisiteViolation, RelocationCountMismatch, InvalidArgument
#[derive(Error, Debug)]
pub enum ObjtabError
{
    /// The external inspection tool could not run or exited with failure
    ///
    /// This happens when:
    /// - The tool binary is missing from `PATH`
    /// - The executable is not a format the tool understands
    /// - The tool was killed by a signal (no exit code)
    #[error("Failed to run {tool}: {detail}")]
    ToolInvocationFailed
    {
        /// Name or path of the tool that was invoked
        tool: String,
        /// Underlying cause (spawn error, exit status, stderr excerpt)
        detail: String,
    },

    /// A decoded symbol names a section absent from the section table
    #[error("Symbol '{symbol}' references unknown section '{section}'")]
    UnresolvedSection
    {
        /// Name of the offending symbol
        symbol: String,
        /// Section token as it appeared in the report
        section: String,
    },

    /// Operations were invoked out of order
    ///
    /// The symbol report can only be decoded once the section table exists,
    /// because every symbol address is stored relative to its section.
    #[error("Prerequisite violated: {0}")]
    PrerequisiteViolation(String),

    /// A relocated snapshot was requested with the wrong number of addresses
    ///
    /// `expected` is the number of runtime-allocatable, non-empty sections.
    #[error("Relocation count mismatch: expected {expected} addresses, got {actual}")]
    RelocationCountMismatch
    {
        /// Number of qualifying sections in the table
        expected: usize,
        /// Number of addresses supplied
        actual: usize,
    },

    /// Invalid argument passed to a table operation
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// I/O error (reading captured reports, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for `Result<T, ObjtabError>`
///
/// ```rust
/// use objtab_core::error::ObjtabResult;
/// fn foo() -> ObjtabResult<()>
/// {
///     Ok(())
/// }
/// ```
pub type ObjtabResult<T> = std::result::Result<T, ObjtabError>;
