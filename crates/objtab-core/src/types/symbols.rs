//! Symbol types.

use std::fmt;

use super::{Address, SectionId};

/// Section token the inspection tool prints for sectionless symbols.
pub const ABSOLUTE_SECTION: &str = "*ABS*";

/// Kind of entity a symbol names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolType
{
    /// Code (`F`).
    Function,
    /// Source file marker (`f`).
    File,
    /// Data object (`O`).
    Object,
    /// Anything else, including labels and linker-defined symbols.
    Normal,
}

impl fmt::Display for SymbolType
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        let label = match self {
            SymbolType::Function => "function",
            SymbolType::File => "file",
            SymbolType::Object => "object",
            SymbolType::Normal => "normal",
        };
        f.pad(label)
    }
}

/// Visibility of a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolScope
{
    /// Private to its compile unit (`l`).
    Local,
    /// Visible to the whole link (`g`).
    Global,
    /// Neither flag set.
    Neither,
    /// Both local and global (`!`), typically weak/overridable.
    Both,
}

impl fmt::Display for SymbolScope
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        let label = match self {
            SymbolScope::Local => "local",
            SymbolScope::Global => "global",
            SymbolScope::Neither => "neither",
            SymbolScope::Both => "both",
        };
        f.pad(label)
    }
}

/// What a symbol's address is relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolOwner
{
    /// Lives in the section with this id.
    Section(SectionId),
    /// Absolute value, no owning section.
    Absolute,
}

/// A decoded symbol-table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol
{
    /// Demangled name, without any `.hidden` prefix.
    pub name: String,
    /// Symbol kind.
    pub kind: SymbolType,
    /// Visibility after the LTO correction.
    pub scope: SymbolScope,
    /// Owning section.
    pub owner: SymbolOwner,
    /// Address relative to the owning section's link-time load address.
    /// For absolute symbols this is the raw value.
    pub address: Address,
    /// Runtime base copied from the owning section by the last relocation.
    pub base: Address,
    /// Size in bytes.
    pub size: u64,
    /// Compile unit that declared the symbol; only kept for `Local` scope.
    pub file: Option<String>,
    /// Hidden visibility.
    pub hidden: bool,
    /// Source lines, filled by a later line-mapping pass.
    pub lines: Vec<u32>,
}

impl Symbol
{
    /// Address to compare against a program counter.
    ///
    /// With `relocated` the runtime base is added; otherwise the stored
    /// section-relative address is returned untouched.
    #[must_use]
    pub fn effective_address(&self, relocated: bool) -> Address
    {
        if relocated {
            self.address + self.base
        } else {
            self.address
        }
    }

    /// Whether `address` lies in `[effective, effective + size)`.
    #[must_use]
    pub fn contains(&self, address: Address, relocated: bool) -> bool
    {
        let start = self.effective_address(relocated);
        address >= start && address.value() - start.value() < self.size
    }

    /// Whether the symbol has no owning section.
    #[must_use]
    pub fn is_absolute(&self) -> bool
    {
        self.owner == SymbolOwner::Absolute
    }

    /// Owning section id, if any.
    #[must_use]
    pub fn section_id(&self) -> Option<SectionId>
    {
        match self.owner {
            SymbolOwner::Section(id) => Some(id),
            SymbolOwner::Absolute => None,
        }
    }
}
