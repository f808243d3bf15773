//! Tests for the symbol report decoder

use objtab_core::error::ObjtabError;
use objtab_core::sections::parse_section_headers;
use objtab_core::symbols::{decode_symbols, parse_record, DecodeContext, RecordLine};
use objtab_core::types::{Address, Section, SectionFlags, SectionId, SymbolOwner, SymbolScope, SymbolType};

const SECTIONS: &str = include_str!("fixtures/sections.txt");
const SYMBOLS: &str = include_str!("fixtures/symbols.txt");

fn text_section() -> Vec<Section>
{
    vec![Section::new(".text", 0x100, Address::new(0x1000), Address::new(0x1000), 0x1000, 4)
        .with_flags(SectionFlags::parse("CONTENTS, ALLOC, LOAD, CODE"))]
}

#[test]
fn test_decodes_every_record_line()
{
    let sections = parse_section_headers(SECTIONS);
    let symbols = decode_symbols(SYMBOLS, &sections).unwrap();
    assert_eq!(symbols.len(), 22);
}

#[test]
fn test_every_section_reference_resolves()
{
    let sections = parse_section_headers(SECTIONS);
    let symbols = decode_symbols(SYMBOLS, &sections).unwrap();
    for symbol in &symbols {
        match symbol.owner {
            SymbolOwner::Section(id) => assert!(id.index() < sections.len(), "{} dangles", symbol.name),
            SymbolOwner::Absolute => {}
        }
    }
}

#[test]
fn test_function_address_is_section_relative()
{
    let symbols = decode_symbols("00001050 g     F .text\t00000020 foo\n", &text_section()).unwrap();
    assert_eq!(symbols.len(), 1);
    let foo = &symbols[0];
    assert_eq!(foo.name, "foo");
    assert_eq!(foo.kind, SymbolType::Function);
    assert_eq!(foo.scope, SymbolScope::Global);
    assert_eq!(foo.owner, SymbolOwner::Section(SectionId::from_raw(0)));
    assert_eq!(foo.address, Address::new(0x50));
    assert_eq!(foo.base, Address::ZERO);
    assert_eq!(foo.size, 0x20);
    assert_eq!(foo.file, None);
    assert!(!foo.hidden);
}

#[test]
fn test_absolute_symbol_keeps_raw_address()
{
    let sections = parse_section_headers(SECTIONS);
    let symbols = decode_symbols(SYMBOLS, &sections).unwrap();
    let estack = symbols.iter().find(|s| s.name == "_estack").unwrap();
    assert!(estack.is_absolute());
    assert_eq!(estack.address, Address::new(0x2000_8000));
}

#[test]
fn test_local_symbols_record_compile_unit()
{
    let sections = parse_section_headers(SECTIONS);
    let symbols = decode_symbols(SYMBOLS, &sections).unwrap();

    let counters: Vec<_> = symbols.iter().filter(|s| s.name == "counter").collect();
    assert_eq!(counters.len(), 2);
    assert_eq!(counters[0].file.as_deref(), Some("main.c"));
    assert_eq!(counters[1].file.as_deref(), Some("util.c"));
    assert_eq!(counters[0].scope, SymbolScope::Local);

    let marker = symbols.iter().find(|s| s.name == "main.c").unwrap();
    assert_eq!(marker.kind, SymbolType::File);
    assert_eq!(marker.file.as_deref(), Some("main.c"));
}

#[test]
fn test_global_symbols_have_no_file()
{
    let sections = parse_section_headers(SECTIONS);
    let symbols = decode_symbols(SYMBOLS, &sections).unwrap();
    let main = symbols.iter().find(|s| s.name == "main").unwrap();
    assert_eq!(main.scope, SymbolScope::Global);
    assert_eq!(main.file, None);
}

#[test]
fn test_lto_locals_are_promoted_to_global()
{
    let sections = parse_section_headers(SECTIONS);
    let symbols = decode_symbols(SYMBOLS, &sections).unwrap();

    let lto = symbols.iter().find(|s| s.name == "lto_helper.constprop.0").unwrap();
    assert_eq!(lto.scope, SymbolScope::Global);
    assert_eq!(lto.file, None);

    // An empty compile-unit marker leaves no usable file either.
    let orphan = symbols.iter().find(|s| s.name == "orphan").unwrap();
    assert_eq!(orphan.scope, SymbolScope::Global);

    // Section markers before the first compile unit.
    let isr = symbols.iter().find(|s| s.name == ".isr_vector").unwrap();
    assert_eq!(isr.scope, SymbolScope::Global);
}

#[test]
fn test_hidden_prefix_is_stripped()
{
    let sections = parse_section_headers(SECTIONS);
    let symbols = decode_symbols(SYMBOLS, &sections).unwrap();
    let flag = symbols.iter().find(|s| s.name == "hidden_flag").unwrap();
    assert!(flag.hidden);
    assert_eq!(flag.kind, SymbolType::Object);
}

#[test]
fn test_weak_symbol_scope_column_is_blank()
{
    let sections = parse_section_headers(SECTIONS);
    let symbols = decode_symbols(SYMBOLS, &sections).unwrap();
    let handler = symbols.iter().find(|s| s.name == "Default_Handler").unwrap();
    assert_eq!(handler.scope, SymbolScope::Neither);
    assert_eq!(handler.address, Address::ZERO);
}

#[test]
fn test_unknown_section_is_fatal()
{
    let err = decode_symbols("00002000 g     F .text.boot\t00000010 reset\n", &text_section()).unwrap_err();
    match err {
        ObjtabError::UnresolvedSection { symbol, section } => {
            assert_eq!(symbol, "reset");
            assert_eq!(section, ".text.boot");
        }
        other => panic!("Expected UnresolvedSection, got {other:?}"),
    }
}

#[test]
fn test_name_keeps_embedded_whitespace()
{
    let symbols = decode_symbols(
        "00001010 g     F .text\t00000008 operator new(unsigned int, void*)\n",
        &text_section(),
    )
    .unwrap();
    assert_eq!(symbols[0].name, "operator new(unsigned int, void*)");
}

#[test]
fn test_rust_v0_names_are_demangled()
{
    let symbols = decode_symbols("00001010 g     F .text\t00000008 _RNvCsbmNqQUJIY6D_7mycrate4main\n", &text_section()).unwrap();
    assert_eq!(symbols[0].name, "mycrate::main");
}

#[test]
fn test_record_flags()
{
    let RecordLine::Record(record) = parse_record("00000000 l    df *ABS*\t00000000 main.c\r") else {
        panic!("Expected a record");
    };
    assert!(record.debug);
    assert!(!record.dynamic);
    assert!(record.is_compile_unit_marker());
    assert_eq!(record.section, "*ABS*");
    assert_eq!(record.name.trim(), "main.c");

    let RecordLine::Record(weak) = parse_record("08000188  w    F .text\t00000002 Default_Handler") else {
        panic!("Expected a record");
    };
    assert!(weak.weak);
    assert_eq!(weak.scope, SymbolScope::Neither);
    assert!(!weak.is_compile_unit_marker());

    let RecordLine::Record(both) = parse_record("08000300 !     F .text\t00000010 reset_hook") else {
        panic!("Expected a record");
    };
    assert_eq!(both.scope, SymbolScope::Both);
    assert_eq!(both.kind, SymbolType::Function);
    assert!(!both.weak);
}

#[test]
fn test_sixty_four_bit_record()
{
    let RecordLine::Record(record) =
        parse_record("0000000000401126 g     F .text\t000000000000001b              main")
    else {
        panic!("Expected a record");
    };
    assert_eq!(record.address, 0x40_1126);
    assert_eq!(record.size, 0x1b);
    assert_eq!(record.name.trim(), "main");
}

#[test]
fn test_non_record_lines()
{
    for line in ["", "SYMBOL TABLE:", "firmware.elf:     file format elf32-littlearm", "0800 g F .text 10 x"] {
        assert_eq!(parse_record(line), RecordLine::NotARecord, "{line:?}");
    }
    assert_eq!(parse_record("08000200 x     F .text\t00000040 main"), RecordLine::NotARecord);
}

#[test]
fn test_decode_context_tracks_markers()
{
    let RecordLine::Record(unit) = parse_record("00000000 l    df *ABS*\t00000000 a.c") else {
        panic!("Expected a record");
    };
    let RecordLine::Record(function) = parse_record("00001010 l     F .text\t00000008 f") else {
        panic!("Expected a record");
    };

    let context = DecodeContext::default();
    assert!(context.is_lto_artifact());
    let context = context.advance(&unit);
    assert_eq!(context.current_file(), Some("a.c"));
    assert!(!context.is_lto_artifact());
    let context = context.advance(&function);
    assert_eq!(context.current_file(), Some("a.c"));
}
