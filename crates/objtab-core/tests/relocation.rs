//! Tests for runtime relocation

use objtab_core::error::ObjtabError;
use objtab_core::tool::CapturedReports;
use objtab_core::types::{Address, SymbolOwner};
use objtab_core::{RelocationDirective, SymbolTable};

const SECTIONS: &str = include_str!("fixtures/sections.txt");
const SYMBOLS: &str = include_str!("fixtures/symbols.txt");

fn firmware() -> SymbolTable
{
    let reports = CapturedReports::new(SECTIONS, SYMBOLS);
    SymbolTable::load(&reports, "firmware.elf".as_ref()).unwrap()
}

fn assert_bases_follow_sections(table: &SymbolTable)
{
    for symbol in table.symbols() {
        if let SymbolOwner::Section(id) = symbol.owner {
            let section = table.section(id).unwrap();
            assert_eq!(symbol.base, section.address, "{} out of step with {}", symbol.name, section.name);
            assert_eq!(symbol.effective_address(true), symbol.address + section.address);
        }
    }
}

#[test]
fn test_offset_moves_relocatable_sections_only()
{
    let mut table = firmware();
    table.relocate_by_offset(0x1000);

    assert_eq!(table.section_by_name(".text").unwrap().address, Address::new(0x0800_1188));
    assert_eq!(table.section_by_name(".bss").unwrap().address, Address::new(0x2000_1010));
    // Zero-sized and non-allocatable sections keep their base.
    assert_eq!(table.section_by_name("._user_heap_stack").unwrap().address, Address::ZERO);
    assert_eq!(table.section_by_name(".debug_info").unwrap().address, Address::ZERO);
    assert_bases_follow_sections(&table);
}

#[test]
fn test_offset_relocation_preserves_link_layout()
{
    let mut table = firmware();
    table.relocate_by_offset(0x1000);
    let main = table.index().symbol_by_name("main").unwrap();
    assert_eq!(main.effective_address(true), Address::new(0x0800_1200));
    assert_eq!(table.link_address(main), Address::new(0x0800_0200));
}

#[test]
fn test_section_addresses_update_named_sections()
{
    let mut table = firmware();
    table.relocate_by_offset(0x100);
    table.relocate_sections(&[(".text", Address::new(0x9000_0000))]);

    assert_eq!(table.section_by_name(".text").unwrap().address, Address::new(0x9000_0000));
    // Unmentioned sections keep what the previous pass gave them.
    assert_eq!(table.section_by_name(".data").unwrap().address, Address::new(0x2000_0100));
    assert_bases_follow_sections(&table);
}

#[test]
fn test_unknown_section_names_are_ignored()
{
    let mut table = firmware();
    table.relocate_sections(&[(".nonexistent", Address::new(0x4000))]);
    assert!(table.sections().iter().all(|s| s.address == Address::ZERO));
}

#[test]
fn test_relocation_is_idempotent()
{
    let directive = RelocationDirective::SectionAddresses(vec![
        (".text".to_string(), Address::new(0x1000_0000)),
        (".data".to_string(), Address::new(0x2000_0000)),
    ]);

    let mut once = firmware();
    once.apply_relocation(&directive);

    let mut twice = firmware();
    twice.apply_relocation(&directive);
    twice.apply_relocation(&directive);

    assert_eq!(once.sections(), twice.sections());
    assert_eq!(once.symbols(), twice.symbols());
}

#[test]
fn test_absolute_symbols_keep_zero_base()
{
    let mut table = firmware();
    table.apply_relocation(&RelocationDirective::Offset(0x4000));
    let estack = table.index().symbol_by_name("_estack").unwrap();
    assert_eq!(estack.base, Address::ZERO);
    assert_eq!(estack.effective_address(true), Address::new(0x2000_8000));
}

#[test]
fn test_offset_relocated_function_lookup()
{
    let reports = CapturedReports::new(
        "  0 .text  00000100  00001000  00001000  00001000  2**2\n                  CONTENTS, ALLOC, LOAD, CODE\n",
        "00001050 g     F .text\t00000020 foo\n",
    );
    let mut table = SymbolTable::load(&reports, "a.out".as_ref()).unwrap();
    table.relocate_by_offset(0x8000);

    assert_eq!(table.section_by_name(".text").unwrap().address, Address::new(0x9000));
    let foo = &table.symbols()[0];
    assert_eq!(foo.base, Address::new(0x9000));
    assert_eq!(
        table.index().function_at_address(Address::new(0x9050), true).map(|s| s.name.as_str()),
        Some("foo")
    );
}

#[test]
fn test_snapshot_overrides_relocatable_sections()
{
    let table = firmware();
    let runtime: Vec<Address> = (1..=5).map(|i| Address::new(i * 0x1_0000)).collect();
    let snapshot = table.relocated_snapshot(&runtime).unwrap();

    assert_eq!(snapshot.len(), table.sections().len());
    let overridden: Vec<Address> = snapshot.iter().filter(|s| s.is_relocatable()).map(|s| s.address).collect();
    assert_eq!(overridden, runtime);
    let heap = snapshot.iter().find(|s| s.name == "._user_heap_stack").unwrap();
    assert_eq!(heap.address, heap.vma);
    let attributes = snapshot.iter().find(|s| s.name == ".ARM.attributes").unwrap();
    assert_eq!(attributes.address, attributes.vma);

    // The table is untouched.
    assert!(table.sections().iter().all(|s| s.address == Address::ZERO));
}

#[test]
fn test_snapshot_count_mismatch()
{
    let table = firmware();
    let err = table.relocated_snapshot(&[Address::new(0x1000)]).unwrap_err();
    match err {
        ObjtabError::RelocationCountMismatch { expected, actual } => {
            assert_eq!(expected, 5);
            assert_eq!(actual, 1);
        }
        other => panic!("Expected RelocationCountMismatch, got {other:?}"),
    }
    assert!(table.relocated_snapshot(&[Address::ZERO; 6]).is_err());
}
