//! # Relocation
//!
//! Assigns runtime bases to sections once the debugger learns where the
//! target actually loaded them, and propagates those bases to symbols.
//!
//! Two directive shapes are accepted, matching what a remote debug stub can
//! report:
//!
//! - explicit `(section name, runtime address)` pairs
//! - one load offset applied to every allocatable, non-empty section
//!
//! Every pass builds fresh section and symbol arrays and swaps them in, so
//! `Symbol::base` always equals its section's `address` after the call and no
//! half-updated state is ever visible. Applying the same directive twice is
//! the same as applying it once.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::error::{ObjtabError, ObjtabResult};
use crate::table::SymbolTable;
use crate::types::{Address, Section, Symbol, SymbolOwner};

/// Runtime placement reported by the debug transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelocationDirective
{
    /// Absolute runtime address per named section. Sections not listed keep
    /// their current base.
    SectionAddresses(Vec<(String, Address)>),
    /// Offset added to the link-time VMA of every relocatable section.
    Offset(u64),
}

impl SymbolTable
{
    /// Apply a directive of either shape.
    pub fn apply_relocation(&mut self, directive: &RelocationDirective)
    {
        match directive {
            RelocationDirective::SectionAddresses(addresses) => self.relocate_sections(addresses),
            RelocationDirective::Offset(offset) => self.relocate_by_offset(*offset),
        }
    }

    /// Set the runtime address of each named section, then recompute every
    /// symbol base.
    ///
    /// Names that are not in the table are logged and ignored.
    pub fn relocate_sections<S: AsRef<str>>(&mut self, addresses: &[(S, Address)])
    {
        let positions: HashMap<&str, usize> = self
            .sections
            .iter()
            .enumerate()
            .map(|(index, section)| (section.name.as_str(), index))
            .collect();

        let mut next = self.sections.clone();
        let mut updated = 0usize;
        for (name, address) in addresses {
            let name = name.as_ref();
            match positions.get(name) {
                Some(&index) => {
                    next[index].address = *address;
                    updated += 1;
                }
                None => warn!(section = name, %address, "relocation names a section missing from the table"),
            }
        }

        self.commit(next);
        info!(sections = updated, requested = addresses.len(), "relocated by section address");
    }

    /// Move every relocatable section to `vma + offset`, then recompute every
    /// symbol base. Non-allocatable and empty sections are untouched.
    pub fn relocate_by_offset(&mut self, offset: u64)
    {
        let next = self
            .sections
            .iter()
            .map(|section| {
                let mut section = section.clone();
                if section.is_relocatable() {
                    section.address = section.vma + offset;
                }
                section
            })
            .collect();

        self.commit(next);
        info!(offset = format_args!("{offset:#x}"), "relocated by load offset");
    }

    /// Section snapshot for a stub-supplied address list.
    ///
    /// `runtime` holds one address per relocatable section, in table order.
    /// Those sections take the supplied address; every other section reports
    /// its link-time VMA. The table itself is not modified.
    ///
    /// ## Errors
    ///
    /// `RelocationCountMismatch` if `runtime.len()` differs from the number of
    /// relocatable sections.
    pub fn relocated_snapshot(&self, runtime: &[Address]) -> ObjtabResult<Vec<Section>>
    {
        let expected = self.sections.iter().filter(|section| section.is_relocatable()).count();
        if runtime.len() != expected {
            return Err(ObjtabError::RelocationCountMismatch {
                expected,
                actual: runtime.len(),
            });
        }

        let mut supplied = runtime.iter();
        let snapshot = self
            .sections
            .iter()
            .map(|section| {
                let mut section = section.clone();
                section.address = if section.is_relocatable() {
                    supplied.next().copied().unwrap_or(section.vma)
                } else {
                    section.vma
                };
                section
            })
            .collect();
        Ok(snapshot)
    }

    /// Swap in `sections` together with symbols rebased onto them.
    fn commit(&mut self, sections: Vec<Section>)
    {
        let symbols: Vec<Symbol> = self
            .symbols
            .iter()
            .map(|symbol| {
                let mut symbol = symbol.clone();
                if let SymbolOwner::Section(id) = symbol.owner {
                    if let Some(section) = sections.get(id.index()) {
                        symbol.base = section.address;
                    }
                }
                symbol
            })
            .collect();

        debug!(sections = sections.len(), symbols = symbols.len(), "committing relocation");
        self.sections = sections;
        self.symbols = symbols;
    }
}
