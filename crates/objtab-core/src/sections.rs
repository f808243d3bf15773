//! # Section Table
//!
//! Parser for the section-header report (`objdump --section-headers`).
//!
//! The report is a sequence of two-line groups:
//!
//! ```text
//! Idx Name          Size      VMA       LMA       File off  Algn
//!   0 .isr_vector   00000188  08000000  08000000  00010000  2**2
//!                   CONTENTS, ALLOC, LOAD, READONLY, DATA
//!   1 .text         00003a5c  08000188  08000188  00010188  2**3
//!                   CONTENTS, ALLOC, LOAD, READONLY, CODE
//! ```
//!
//! The first line of a group carries the index, name, size, VMA, LMA, file
//! offset and `2**n` alignment; the second lists attribute flags. Anything
//! that is not a header line (banners, column titles, blank lines) is skipped.

use std::collections::HashSet;

use tracing::{debug, trace, warn};

use crate::types::{Address, Section, SectionFlags};

/// Result of looking at a single report line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderLine
{
    /// First line of a header group (flags not yet known).
    Header(Section),
    /// Banner, column titles, blank line or a stray flag line.
    NotARecord,
}

/// Classify one line of the section-header report.
///
/// Trailing carriage returns are ignored.
pub fn classify_header_line(line: &str) -> HeaderLine
{
    let line = line.trim_end_matches('\r');
    let mut fields = line.split_whitespace();

    let (Some(index), Some(name), Some(size), Some(vma), Some(lma), Some(file_offset), Some(align)) = (
        fields.next(),
        fields.next(),
        fields.next(),
        fields.next(),
        fields.next(),
        fields.next(),
        fields.next(),
    ) else {
        return HeaderLine::NotARecord;
    };

    if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return HeaderLine::NotARecord;
    }

    let (Some(size), Some(vma), Some(lma), Some(file_offset), Some(align)) = (
        parse_hex(size),
        parse_hex(vma),
        parse_hex(lma),
        parse_hex(file_offset),
        parse_alignment(align),
    ) else {
        return HeaderLine::NotARecord;
    };

    HeaderLine::Header(Section::new(name, size, Address::new(vma), Address::new(lma), file_offset, align))
}

/// Parse the whole section-header report into table order.
///
/// A section name that repeats an earlier one is dropped so names stay
/// unique; the first occurrence wins.
pub fn parse_section_headers(report: &str) -> Vec<Section>
{
    let mut sections = Vec::new();
    let mut seen = HashSet::new();
    let mut lines = report.lines().peekable();

    while let Some(line) = lines.next() {
        let HeaderLine::Header(section) = classify_header_line(line) else {
            trace!(line, "skipping non-header line");
            continue;
        };

        // The flag line belongs to this header unless the report ends or the
        // next group starts immediately.
        let flags = match lines.peek() {
            Some(next) if classify_header_line(next) == HeaderLine::NotARecord => {
                let flags = SectionFlags::parse(next.trim_end_matches('\r'));
                lines.next();
                flags
            }
            _ => SectionFlags::default(),
        };

        if !seen.insert(section.name.clone()) {
            warn!(section = %section.name, "duplicate section name in header report, keeping the first");
            continue;
        }
        sections.push(section.with_flags(flags));
    }

    debug!(count = sections.len(), "parsed section headers");
    sections
}

fn parse_hex(token: &str) -> Option<u64>
{
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u64::from_str_radix(token, 16).ok()
}

fn parse_alignment(token: &str) -> Option<u64>
{
    let exponent = token.strip_prefix("2**")?.parse::<u32>().ok()?;
    1u64.checked_shl(exponent)
}
