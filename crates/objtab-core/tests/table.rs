//! Tests for table construction

use std::path::Path;

use objtab_core::error::ObjtabError;
use objtab_core::tool::{CapturedReports, InspectionTool, Objdump, ToolOutput};
use objtab_core::SymbolTable;

const SECTIONS: &str = include_str!("fixtures/sections.txt");
const SYMBOLS: &str = include_str!("fixtures/symbols.txt");

#[test]
fn test_load_runs_both_passes()
{
    let table = SymbolTable::load(&CapturedReports::new(SECTIONS, SYMBOLS), Path::new("firmware.elf")).unwrap();
    assert!(table.sections_loaded());
    assert_eq!(table.sections().len(), 8);
    assert_eq!(table.symbols().len(), 22);
}

#[test]
fn test_symbols_before_sections_is_rejected()
{
    let mut table = SymbolTable::new();
    let err = table.load_symbols(&ToolOutput::captured(SYMBOLS), "objdump").unwrap_err();
    assert!(matches!(err, ObjtabError::PrerequisiteViolation(_)));
    assert!(table.symbols().is_empty());
}

#[test]
fn test_empty_section_report_still_satisfies_prerequisite()
{
    let mut table = SymbolTable::new();
    table.load_sections(&ToolOutput::captured(""), "objdump").unwrap();
    table
        .load_symbols(&ToolOutput::captured("00000010 g       *ABS*\t00000000 LIMIT\n"), "objdump")
        .unwrap();
    assert_eq!(table.symbols().len(), 1);
}

#[test]
fn test_failed_section_report()
{
    let reports = CapturedReports::from_outputs(
        ToolOutput::failed(Some(1), "objdump: firmware.elf: file format not recognized\n"),
        ToolOutput::captured(SYMBOLS),
    );
    let err = SymbolTable::load(&reports, Path::new("firmware.elf")).unwrap_err();
    match err {
        ObjtabError::ToolInvocationFailed { detail, .. } => {
            assert!(detail.contains("status 1"));
            assert!(detail.contains("file format not recognized"));
        }
        other => panic!("Expected ToolInvocationFailed, got {other:?}"),
    }
}

#[test]
fn test_failed_symbol_report()
{
    let reports = CapturedReports::from_outputs(ToolOutput::captured(SECTIONS), ToolOutput::failed(None, ""));
    let err = SymbolTable::load(&reports, Path::new("firmware.elf")).unwrap_err();
    assert!(err.to_string().contains("terminated by signal"));
}

#[test]
fn test_unresolved_section_fails_construction()
{
    let reports = CapturedReports::new(SECTIONS, "08004000 g     F .ramfunc\t00000010 fast_copy\n");
    let err = SymbolTable::load(&reports, Path::new("firmware.elf")).unwrap_err();
    assert!(matches!(err, ObjtabError::UnresolvedSection { ref symbol, .. } if symbol == "fast_copy"));
}

#[test]
fn test_reloading_sections_discards_symbols()
{
    let mut table = SymbolTable::load(&CapturedReports::new(SECTIONS, SYMBOLS), Path::new("firmware.elf")).unwrap();
    table.load_sections(&ToolOutput::captured(SECTIONS), "objdump").unwrap();
    assert!(table.symbols().is_empty());
}

#[test]
fn test_section_name_uses_absolute_sentinel()
{
    let table = SymbolTable::load(&CapturedReports::new(SECTIONS, SYMBOLS), Path::new("firmware.elf")).unwrap();
    let index = table.index();
    assert_eq!(table.section_name(index.symbol_by_name("_estack").unwrap()), "*ABS*");
    assert_eq!(table.section_name(index.symbol_by_name("main").unwrap()), ".text");
}

#[test]
fn test_missing_tool_binary()
{
    let objdump = Objdump::new("/nonexistent/objtab-test-objdump");
    let err = objdump.section_headers(Path::new("firmware.elf")).unwrap_err();
    match err {
        ObjtabError::ToolInvocationFailed { tool, .. } => assert_eq!(tool, "/nonexistent/objtab-test-objdump"),
        other => panic!("Expected ToolInvocationFailed, got {other:?}"),
    }
}
