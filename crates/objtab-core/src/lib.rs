//! # objtab-core
//!
//! Section tables, symbol decoding and runtime relocation for Objtab.
//!
//! This crate turns the two textual reports of an object-file inspection tool
//! (section headers and the demangled symbol table) into a queryable
//! [`SymbolTable`], and keeps every symbol's runtime address in step with the
//! load addresses a debugger learns while the target runs:
//! - [`sections`]: section-header report parser
//! - [`symbols`]: symbol report decoder, compile-unit tracking and LTO scope fix
//! - [`relocation`]: per-section and uniform-offset relocation, stub snapshots
//! - [`lookup`]: address and name queries
//! - [`tool`]: the seam to the external tool (`objdump` or captured output)
//!
//! Everything is synchronous and single-threaded. A table is built once per
//! debug session and only mutated by relocation.

pub mod error;
pub mod lookup;
pub mod prelude;
pub mod relocation;
pub mod sections;
pub mod symbols;
pub mod table;
pub mod tool;
pub mod types;

// Re-export commonly used types
pub use error::{ObjtabError, ObjtabResult};
pub use lookup::SymbolIndex;
pub use relocation::RelocationDirective;
pub use table::SymbolTable;
pub use types::{Address, Section, SectionId, Symbol, SymbolOwner, SymbolScope, SymbolType};
