//! Common module for library exports

pub use crate::error::{ObjtabError, ObjtabResult};
pub use crate::lookup::SymbolIndex;
pub use crate::relocation::RelocationDirective;
pub use crate::table::SymbolTable;
pub use crate::tool::{CapturedReports, InspectionTool, Objdump, ToolOutput};
pub use crate::types::{Address, Section, SectionFlags, SectionId, Symbol, SymbolOwner, SymbolScope, SymbolType};
