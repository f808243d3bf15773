//! Tokenizer for a single symbol-table report line.
//!
//! ```text
//! 08000250 g     F .text	00000048 main
//! 00000000 l    df *ABS*	00000000 startup.c
//! 20000004 l     O .bss	00000004 .hidden counter
//! ```
//!
//! Layout: the address (8 or 16 hex digits), one space, seven single-column
//! flags, one space, the section token, whitespace, the size, one whitespace
//! character, and a free-text name running to the end of the line.

use crate::types::{SymbolScope, SymbolType};

/// Flag columns between the address and the section token.
const FLAG_COLUMNS: usize = 7;

/// Fields of one symbol line, borrowed from the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolRecord<'a>
{
    /// Raw address as printed.
    pub address: u64,
    /// Scope column.
    pub scope: SymbolScope,
    /// `w` column.
    pub weak: bool,
    /// `C` column.
    pub constructor: bool,
    /// `W` column.
    pub warning: bool,
    /// `I`/`i` column.
    pub indirect: bool,
    /// `d` in the debug/dynamic column.
    pub debug: bool,
    /// `D` in the debug/dynamic column.
    pub dynamic: bool,
    /// Type column.
    pub kind: SymbolType,
    /// Section token (`.text`, `*ABS*`, ...).
    pub section: &'a str,
    /// Size in bytes.
    pub size: u64,
    /// Everything after the size, untrimmed.
    pub name: &'a str,
}

impl SymbolRecord<'_>
{
    /// `d` + `f`: the line opens a new compile unit.
    pub fn is_compile_unit_marker(&self) -> bool
    {
        self.debug && self.kind == SymbolType::File
    }
}

/// Result of tokenizing one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordLine<'a>
{
    /// A symbol line.
    Record(SymbolRecord<'a>),
    /// Banner, `SYMBOL TABLE:` title, blank line, or anything else.
    NotARecord,
}

/// Tokenize one line of the symbol report.
pub fn parse_record(line: &str) -> RecordLine<'_>
{
    parse_fields(line.trim_end_matches('\r')).map_or(RecordLine::NotARecord, RecordLine::Record)
}

fn parse_fields(line: &str) -> Option<SymbolRecord<'_>>
{
    let (address, rest) = line.split_once(' ')?;
    if !matches!(address.len(), 8 | 16) {
        return None;
    }
    let address = parse_hex(address)?;

    let flags = rest.as_bytes().get(..=FLAG_COLUMNS)?;
    if flags[FLAG_COLUMNS] != b' ' {
        return None;
    }

    let scope = match flags[0] {
        b'l' => SymbolScope::Local,
        b'g' => SymbolScope::Global,
        b' ' => SymbolScope::Neither,
        b'!' => SymbolScope::Both,
        _ => return None,
    };
    let weak = column(flags[1], b"w")?;
    let constructor = column(flags[2], b"C")?;
    let warning = column(flags[3], b"W")?;
    let indirect = column(flags[4], b"Ii")?;
    let (debug, dynamic) = match flags[5] {
        b'd' => (true, false),
        b'D' => (false, true),
        b' ' => (false, false),
        _ => return None,
    };
    let kind = match flags[6] {
        b'F' => SymbolType::Function,
        b'f' => SymbolType::File,
        b'O' => SymbolType::Object,
        b' ' => SymbolType::Normal,
        _ => return None,
    };

    // The flag columns are ASCII, so this index is a char boundary.
    let tail = &rest[FLAG_COLUMNS + 1..];
    let (section, tail) = tail.split_once(char::is_whitespace)?;
    if section.is_empty() {
        return None;
    }

    let tail = tail.trim_start();
    let (size, name) = match tail.split_once(char::is_whitespace) {
        Some((size, name)) => (size, name),
        None => (tail, ""),
    };
    let size = parse_hex(size)?;

    Some(SymbolRecord {
        address,
        scope,
        weak,
        constructor,
        warning,
        indirect,
        debug,
        dynamic,
        kind,
        section,
        size,
        name,
    })
}

/// A flag column holds either a blank or one of `set`.
fn column(byte: u8, set: &[u8]) -> Option<bool>
{
    if byte == b' ' {
        Some(false)
    } else if set.contains(&byte) {
        Some(true)
    } else {
        None
    }
}

fn parse_hex(token: &str) -> Option<u64>
{
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u64::from_str_radix(token, 16).ok()
}
