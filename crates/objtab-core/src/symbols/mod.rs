//! # Symbol Decoder
//!
//! Turns the symbol-table report (`objdump --syms --demangle`) into
//! [`Symbol`] records.
//!
//! The report does not say which compile unit a symbol came from directly.
//! Instead, each unit's symbols follow a `df` (debug + file) marker line naming
//! the source file, so the decoder carries a [`DecodeContext`] through the
//! scan and attaches that file to every `Local` symbol after it.
//!
//! ## LTO
//!
//! With link-time optimization, symbols the optimizer produced are emitted
//! under a synthetic `ld-temp.o` unit (or before any marker at all). Their
//! `Local` scope no longer identifies a real file, so they are promoted to
//! `Global` and found through global lookups instead.

mod demangle;
pub mod record;

use tracing::{debug, trace};

use self::demangle::{normalize_name, strip_hidden};
pub use self::record::{parse_record, RecordLine, SymbolRecord};
use crate::error::{ObjtabError, ObjtabResult};
use crate::types::{Address, Section, SectionId, Symbol, SymbolOwner, SymbolScope, ABSOLUTE_SECTION};

/// Compile unit name the linker uses for LTO output.
pub const LTO_COMPILE_UNIT: &str = "ld-temp.o";

/// Running state of a symbol report scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeContext
{
    current_file: Option<String>,
}

impl DecodeContext
{
    /// Compile unit in effect, if a non-empty marker has been seen.
    pub fn current_file(&self) -> Option<&str>
    {
        self.current_file.as_deref()
    }

    /// Context after observing `record`.
    ///
    /// Compile-unit markers replace the current file; an empty marker name
    /// clears it. Every other record leaves the context unchanged.
    #[must_use]
    pub fn advance(self, record: &SymbolRecord<'_>) -> Self
    {
        if !record.is_compile_unit_marker() {
            return self;
        }
        let file = record.name.trim();
        Self {
            current_file: (!file.is_empty()).then(|| file.to_string()),
        }
    }

    /// Whether `Local` symbols seen now have no trustworthy compile unit.
    pub fn is_lto_artifact(&self) -> bool
    {
        self.current_file.as_deref().is_none_or(|file| file == LTO_COMPILE_UNIT)
    }
}

/// Decode one record under `context` (already advanced past this record).
///
/// ## Errors
///
/// `UnresolvedSection` if the section token is neither `*ABS*` nor a name in
/// `sections`.
pub fn decode_record(record: &SymbolRecord<'_>, context: &DecodeContext, sections: &[Section]) -> ObjtabResult<Symbol>
{
    let (name, hidden) = strip_hidden(record.name.trim());
    let name = normalize_name(name);

    let scope = if record.scope == SymbolScope::Local && context.is_lto_artifact() {
        SymbolScope::Global
    } else {
        record.scope
    };

    let (owner, lma) = if record.section == ABSOLUTE_SECTION {
        (SymbolOwner::Absolute, Address::ZERO)
    } else {
        let (index, section) = sections
            .iter()
            .enumerate()
            .find(|(_, section)| section.name == record.section)
            .ok_or_else(|| ObjtabError::UnresolvedSection {
                symbol: name.clone(),
                section: record.section.to_string(),
            })?;
        (SymbolOwner::Section(SectionId::from_raw(index)), section.lma)
    };

    let file = if scope == SymbolScope::Local {
        context.current_file().map(str::to_string)
    } else {
        None
    };

    Ok(Symbol {
        name,
        kind: record.kind,
        scope,
        owner,
        address: Address::new(record.address) - lma,
        base: Address::ZERO,
        size: record.size,
        file,
        hidden,
        lines: Vec::new(),
    })
}

/// Decode the whole symbol report against an already-parsed section table.
///
/// Lines that are not symbol records are skipped.
///
/// ## Errors
///
/// `UnresolvedSection` for the first symbol naming an unknown section.
pub fn decode_symbols(report: &str, sections: &[Section]) -> ObjtabResult<Vec<Symbol>>
{
    let mut context = DecodeContext::default();
    let mut symbols = Vec::new();

    for line in report.lines() {
        let RecordLine::Record(record) = parse_record(line) else {
            trace!(line, "skipping non-record line");
            continue;
        };
        context = context.advance(&record);
        symbols.push(decode_record(&record, &context, sections)?);
    }

    debug!(count = symbols.len(), "decoded symbol table");
    Ok(symbols)
}
