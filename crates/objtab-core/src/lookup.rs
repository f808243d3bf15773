//! # Lookup
//!
//! Read-only queries over decoded symbols: mapping a program counter back to
//! its function, finding functions and variables by name, and the filtered
//! views the profiler and variable panes use.
//!
//! All scans are linear and in table order. Where function ranges overlap,
//! the first symbol in the report wins; the report is not sorted by address
//! and the smallest enclosing range is not searched for.

use crate::types::{Address, Symbol, SymbolScope, SymbolType};

/// Names starting with this are compiler/runtime reserved and never treated
/// as user constants.
pub const RESERVED_PREFIX: &str = "__";

/// Query view borrowed from a [`crate::SymbolTable`] (or any symbol slice).
#[derive(Debug, Clone, Copy)]
pub struct SymbolIndex<'a>
{
    symbols: &'a [Symbol],
}

impl<'a> SymbolIndex<'a>
{
    /// View over `symbols`.
    #[must_use]
    pub fn new(symbols: &'a [Symbol]) -> Self
    {
        Self { symbols }
    }

    /// First function whose range contains `address`.
    ///
    /// With `relocated`, ranges start at `address + base`; otherwise at the
    /// stored section-relative address.
    pub fn function_at_address(&self, address: Address, relocated: bool) -> Option<&'a Symbol>
    {
        self.functions().find(|symbol| symbol.contains(address, relocated))
    }

    /// All function symbols.
    pub fn functions(&self) -> impl Iterator<Item = &'a Symbol> + 'a
    {
        self.symbols.iter().filter(|symbol| symbol.kind == SymbolType::Function)
    }

    /// Data objects with global scope.
    pub fn global_variables(&self) -> impl Iterator<Item = &'a Symbol> + 'a
    {
        self.symbols
            .iter()
            .filter(|symbol| symbol.kind == SymbolType::Object && symbol.scope == SymbolScope::Global)
    }

    /// Untyped, sizeless symbols that already have a runtime base: labels the
    /// linker script defines (`_estack`, `__bss_start__`, ...).
    pub fn symbolic_variables(&self) -> impl Iterator<Item = &'a Symbol> + 'a
    {
        self.symbols.iter().filter(|symbol| {
            symbol.kind == SymbolType::Normal && symbol.size == 0 && !symbol.base.is_zero()
        })
    }

    /// Untyped, sizeless local symbols still at a zero base: constants the
    /// compiler folded without a runtime location.
    pub fn local_constants(&self) -> impl Iterator<Item = &'a Symbol> + 'a
    {
        self.symbols.iter().filter(|symbol| {
            symbol.kind == SymbolType::Normal
                && symbol.size == 0
                && symbol.scope == SymbolScope::Local
                && !symbol.name.starts_with(RESERVED_PREFIX)
                && symbol.base.is_zero()
        })
    }

    /// File-local data objects declared in compile unit `file`.
    pub fn static_variables<'f>(&self, file: &'f str) -> impl Iterator<Item = &'a Symbol> + 'f
    where
        'a: 'f,
    {
        self.symbols.iter().filter(move |symbol| {
            symbol.kind == SymbolType::Object && symbol.scope == SymbolScope::Local && symbol.file.as_deref() == Some(file)
        })
    }

    /// Function called `name`.
    ///
    /// When `file` is given, a `Local` function from that compile unit is
    /// preferred. Otherwise (or on a miss) the first non-`Local` function of
    /// that name is returned.
    pub fn function_by_name(&self, name: &str, file: Option<&str>) -> Option<&'a Symbol>
    {
        if let Some(file) = file {
            let local = self.functions().find(|symbol| {
                symbol.scope == SymbolScope::Local && symbol.name == name && symbol.file.as_deref() == Some(file)
            });
            if local.is_some() {
                return local;
            }
        }

        self.functions()
            .find(|symbol| symbol.scope != SymbolScope::Local && symbol.name == name)
    }

    /// First symbol of any kind called `name`.
    pub fn symbol_by_name(&self, name: &str) -> Option<&'a Symbol>
    {
        self.symbols.iter().find(|symbol| symbol.name == name)
    }
}
