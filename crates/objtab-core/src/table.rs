//! # Symbol Table
//!
//! Owns the sections and symbols of one executable for the lifetime of a
//! debug session.
//!
//! Construction is two passes in a fixed order: the section-header report
//! first, then the symbol report (every symbol address is stored relative to
//! its section's load address, so sections must exist first). After that the
//! table only changes through relocation, see [`crate::relocation`].
//!
//! ## Usage
//!
//! ```rust
//! use objtab_core::tool::ToolOutput;
//! use objtab_core::SymbolTable;
//!
//! let sections = "  0 .text  00000100  00001000  00001000  00001000  2**2\n        CONTENTS, ALLOC, LOAD, CODE\n";
//! let symbols = "00001050 g     F .text\t00000020 foo\n";
//!
//! let mut table = SymbolTable::new();
//! table.load_sections(&ToolOutput::captured(sections), "objdump")?;
//! table.load_symbols(&ToolOutput::captured(symbols), "objdump")?;
//! assert_eq!(table.symbols()[0].address.value(), 0x50);
//! # Ok::<(), objtab_core::error::ObjtabError>(())
//! ```

use std::path::Path;

use tracing::info;

use crate::error::{ObjtabError, ObjtabResult};
use crate::lookup::SymbolIndex;
use crate::sections::parse_section_headers;
use crate::symbols::decode_symbols;
use crate::tool::{InspectionTool, ToolOutput};
use crate::types::{Address, Section, SectionId, Symbol, SymbolOwner, ABSOLUTE_SECTION};

/// Sections and symbols of one executable.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable
{
    pub(crate) sections: Vec<Section>,
    pub(crate) symbols: Vec<Symbol>,
    sections_loaded: bool,
}

impl SymbolTable
{
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Run both report passes through `tool` for `executable`.
    ///
    /// ## Errors
    ///
    /// `ToolInvocationFailed` if either invocation fails, `UnresolvedSection`
    /// if a symbol names a section missing from the header report.
    pub fn load(tool: &dyn InspectionTool, executable: &Path) -> ObjtabResult<Self>
    {
        let mut table = Self::new();
        table.load_sections(&tool.section_headers(executable)?, tool.name())?;
        table.load_symbols(&tool.symbol_table(executable)?, tool.name())?;
        info!(
            executable = %executable.display(),
            sections = table.sections.len(),
            symbols = table.symbols.len(),
            "loaded symbol table"
        );
        Ok(table)
    }

    /// Replace the section table from a section-header report.
    ///
    /// Any previously decoded symbols are discarded since their section ids
    /// refer to the old table.
    ///
    /// ## Errors
    ///
    /// `ToolInvocationFailed` if `output` records a failed invocation.
    pub fn load_sections(&mut self, output: &ToolOutput, tool: &str) -> ObjtabResult<()>
    {
        let report = output.report(tool)?;
        self.sections = parse_section_headers(report);
        self.symbols.clear();
        self.sections_loaded = true;
        Ok(())
    }

    /// Decode the symbol report against the loaded sections.
    ///
    /// ## Errors
    ///
    /// - `PrerequisiteViolation` if [`SymbolTable::load_sections`] has not run
    /// - `ToolInvocationFailed` if `output` records a failed invocation
    /// - `UnresolvedSection` if a symbol names an unknown section
    pub fn load_symbols(&mut self, output: &ToolOutput, tool: &str) -> ObjtabResult<()>
    {
        if !self.sections_loaded {
            return Err(ObjtabError::PrerequisiteViolation(
                "section headers must be loaded before symbols".to_string(),
            ));
        }
        let report = output.report(tool)?;
        self.symbols = decode_symbols(report, &self.sections)?;
        Ok(())
    }

    /// Whether the section pass has run.
    pub fn sections_loaded(&self) -> bool
    {
        self.sections_loaded
    }

    /// Sections in report order.
    pub fn sections(&self) -> &[Section]
    {
        &self.sections
    }

    /// Symbols in report order.
    pub fn symbols(&self) -> &[Symbol]
    {
        &self.symbols
    }

    /// Section by id.
    pub fn section(&self, id: SectionId) -> Option<&Section>
    {
        self.sections.get(id.index())
    }

    /// Section by exact name.
    pub fn section_by_name(&self, name: &str) -> Option<&Section>
    {
        self.sections.iter().find(|section| section.name == name)
    }

    /// Section whose range contains `address`, at link time or at its
    /// current runtime base.
    pub fn section_containing(&self, address: Address, relocated: bool) -> Option<&Section>
    {
        self.sections.iter().find(|section| section.contains(address, relocated))
    }

    /// Owning section name of `symbol`, `*ABS*` for absolute symbols.
    pub fn section_name<'a>(&'a self, symbol: &Symbol) -> &'a str
    {
        match symbol.owner {
            SymbolOwner::Section(id) => self.section(id).map_or(ABSOLUTE_SECTION, |section| section.name.as_str()),
            SymbolOwner::Absolute => ABSOLUTE_SECTION,
        }
    }

    /// Address as printed in the symbol report (section-relative address
    /// plus the section's link-time load address).
    pub fn link_address(&self, symbol: &Symbol) -> Address
    {
        let lma = symbol
            .section_id()
            .and_then(|id| self.section(id))
            .map_or(Address::ZERO, |section| section.lma);
        symbol.address + lma
    }

    /// Read-only query view over the current symbols.
    pub fn index(&self) -> SymbolIndex<'_>
    {
        SymbolIndex::new(&self.symbols)
    }
}
