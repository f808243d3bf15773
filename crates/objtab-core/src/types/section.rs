//! Section records.

use std::fmt;

use smallvec::SmallVec;

use super::Address;

/// Flag token marking a section that occupies memory at runtime.
pub const ALLOC_FLAG: &str = "ALLOC";

/// Index of a section inside its owning table.
///
/// Symbols refer to their section through this id rather than by name, so a
/// relocation pass can join symbols to sections without string comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SectionId(usize);

impl SectionId
{
    /// Create an id from a table position.
    #[must_use]
    pub const fn from_raw(index: usize) -> Self
    {
        Self(index)
    }

    /// Position in the section table.
    #[must_use]
    pub const fn index(self) -> usize
    {
        self.0
    }
}

/// Attribute tokens from the second line of a section header group
/// (`CONTENTS, ALLOC, LOAD, READONLY, CODE`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionFlags(SmallVec<[String; 6]>);

impl SectionFlags
{
    /// Split a comma separated flag line into tokens.
    pub fn parse(line: &str) -> Self
    {
        Self(
            line.split(',')
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(str::to_owned)
                .collect(),
        )
    }

    /// Whether the given token is present (exact match).
    pub fn contains(&self, token: &str) -> bool
    {
        self.0.iter().any(|flag| flag == token)
    }

    /// Iterate over the tokens in report order.
    pub fn iter(&self) -> impl Iterator<Item = &str>
    {
        self.0.iter().map(String::as_str)
    }

    /// Number of tokens.
    pub fn len(&self) -> usize
    {
        self.0.len()
    }

    /// Whether no tokens were reported.
    pub fn is_empty(&self) -> bool
    {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for SectionFlags
{
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self
    {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for SectionFlags
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}", self.0.join(", "))
    }
}

/// A named region of the executable.
///
/// Everything except `address` is a fact from the static link. `address` is
/// the current runtime base: zero until the first relocation pass writes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section
{
    /// Section name, unique within a table.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Virtual memory address at link time.
    pub vma: Address,
    /// Load memory address at link time.
    pub lma: Address,
    /// Offset of the section contents in the file.
    pub file_offset: u64,
    /// Alignment in bytes (already expanded from the `2**n` form).
    pub align: u64,
    /// Attribute tokens.
    pub flags: SectionFlags,
    /// Current runtime base.
    pub address: Address,
}

impl Section
{
    /// Create a section with an unknown runtime base.
    #[must_use]
    pub fn new(name: impl Into<String>, size: u64, vma: Address, lma: Address, file_offset: u64, align: u64) -> Self
    {
        Self {
            name: name.into(),
            size,
            vma,
            lma,
            file_offset,
            align,
            flags: SectionFlags::default(),
            address: Address::ZERO,
        }
    }

    /// Builder-style flag assignment.
    #[must_use]
    pub fn with_flags(mut self, flags: SectionFlags) -> Self
    {
        self.flags = flags;
        self
    }

    /// Whether the section carries the `ALLOC` attribute.
    pub fn is_allocatable(&self) -> bool
    {
        self.flags.contains(ALLOC_FLAG)
    }

    /// Allocatable and non-empty: the sections a remote stub reports runtime
    /// addresses for, and the ones a uniform offset moves.
    pub fn is_relocatable(&self) -> bool
    {
        self.is_allocatable() && self.size != 0
    }

    /// Whether `address` falls inside this section at link time or, when
    /// `relocated`, at its current runtime base.
    ///
    /// A section no relocation pass has placed (runtime base still zero) never
    /// matches a runtime address.
    pub fn contains(&self, address: Address, relocated: bool) -> bool
    {
        if relocated && self.address.is_zero() {
            return false;
        }
        let start = if relocated { self.address } else { self.vma };
        address >= start && address.value() - start.value() < self.size
    }
}
