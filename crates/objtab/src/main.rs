use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use objtab_core::tool::{CapturedReports, InspectionTool, Objdump};
use objtab_core::types::{Address, Section, Symbol};
use objtab_core::{ObjtabError, ObjtabResult, SymbolTable};
use objtab_utils::{debug, info, init_logging, init_logging_to_dir};

/// Inspect executable section tables and symbols, before and after runtime relocation.
#[derive(Parser, Debug)]
#[command(name = "objtab")]
#[command(version)]
#[command(about = "Inspect executable section tables and symbols, before and after runtime relocation", long_about = None)]
struct Cli
{
    #[command(flatten)]
    source: Source,

    #[command(flatten)]
    relocation: Relocation,

    /// Write logs to a dated file in this directory instead of stderr
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Where the two reports come from.
#[derive(Args, Debug)]
struct Source
{
    /// Executable to inspect (not needed when both reports are given)
    #[arg(long, short = 'e', global = true)]
    executable: Option<PathBuf>,

    /// Inspection tool to run
    #[arg(long, env = "OBJTAB_OBJDUMP", default_value = "objdump", global = true)]
    objdump: PathBuf,

    /// Captured `objdump --section-headers` output
    #[arg(long, requires = "symbols_report", global = true)]
    sections_report: Option<PathBuf>,

    /// Captured `objdump --syms --demangle` output
    #[arg(long, requires = "sections_report", global = true)]
    symbols_report: Option<PathBuf>,
}

/// Runtime placement to apply before answering.
#[derive(Args, Debug)]
struct Relocation
{
    /// Load offset applied to every allocatable, non-empty section
    #[arg(long, value_parser = parse_address, global = true)]
    offset: Option<Address>,

    /// Runtime address of one section, as NAME=ADDR (repeatable)
    #[arg(long = "section-address", value_parser = parse_section_address, global = true)]
    section_addresses: Vec<(String, Address)>,
}

#[derive(Subcommand, Debug)]
enum Commands
{
    /// List sections with link-time and runtime addresses
    Sections,
    /// List symbols, optionally filtered
    Symbols
    {
        /// Only functions
        #[arg(long, conflicts_with_all = ["globals", "labels", "constants"])]
        functions: bool,
        /// Only global data objects
        #[arg(long, conflicts_with_all = ["labels", "constants"])]
        globals: bool,
        /// Only sizeless labels with a runtime base
        #[arg(long, conflicts_with = "constants")]
        labels: bool,
        /// Only local sizeless constants
        #[arg(long)]
        constants: bool,
    },
    /// Find the function containing an address
    Lookup
    {
        /// Address (hex format: 0x1000 or decimal)
        #[arg(value_parser = parse_address)]
        address: Address,
        /// Treat the address as a runtime address
        #[arg(long, default_value_t = false)]
        relocated: bool,
    },
    /// Find a function by name
    Function
    {
        /// Function name
        name: String,
        /// Prefer the file-local function from this compile unit
        #[arg(long)]
        file: Option<String>,
    },
    /// List file-local variables of a compile unit
    Statics
    {
        /// Compile unit path as recorded in the symbol table
        file: String,
    },
    /// Print the section layout for addresses reported by a debug stub
    Snapshot
    {
        /// One runtime address per allocatable, non-empty section, in table order
        #[arg(value_parser = parse_address, required = true)]
        addresses: Vec<Address>,
    },
}

fn main()
{
    let cli = Cli::parse();

    let logging = match &cli.log_dir {
        Some(dir) => init_logging_to_dir(dir, None).map(|_| ()),
        None => init_logging(),
    };
    if let Err(e) = logging {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    if let Err(e) = run_command(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run_command(cli: Cli) -> ObjtabResult<()>
{
    let mut table = load_table(&cli.source)?;
    relocate(&mut table, &cli.relocation);

    match cli.command {
        Commands::Sections => {
            print_sections(table.sections());
        }
        Commands::Symbols {
            functions,
            globals,
            labels,
            constants,
        } => {
            let index = table.index();
            let symbols: Vec<&Symbol> = if functions {
                index.functions().collect()
            } else if globals {
                index.global_variables().collect()
            } else if labels {
                index.symbolic_variables().collect()
            } else if constants {
                index.local_constants().collect()
            } else {
                table.symbols().iter().collect()
            };
            for symbol in symbols {
                print_symbol(&table, symbol);
            }
        }
        Commands::Lookup { address, relocated } => {
            info!(%address, relocated, "looking up function");
            let symbol = table
                .index()
                .function_at_address(address, relocated)
                .ok_or_else(|| ObjtabError::InvalidArgument(format!("no function contains {address}")))?;
            print_symbol(&table, symbol);
        }
        Commands::Function { name, file } => {
            let symbol = table
                .index()
                .function_by_name(&name, file.as_deref())
                .ok_or_else(|| ObjtabError::InvalidArgument(format!("no function named '{name}'")))?;
            print_symbol(&table, symbol);
        }
        Commands::Statics { file } => {
            for symbol in table.index().static_variables(&file) {
                print_symbol(&table, symbol);
            }
        }
        Commands::Snapshot { addresses } => {
            print_sections(&table.relocated_snapshot(&addresses)?);
        }
    }
    Ok(())
}

fn load_table(source: &Source) -> ObjtabResult<SymbolTable>
{
    let tool: Box<dyn InspectionTool> = match (&source.sections_report, &source.symbols_report) {
        (Some(sections), Some(symbols)) => Box::new(CapturedReports::from_files(sections, symbols)?),
        _ => Box::new(Objdump::new(&source.objdump)),
    };

    let executable = match (&source.executable, &source.sections_report) {
        (Some(path), _) => path.clone(),
        (None, Some(_)) => PathBuf::from("<captured>"),
        (None, None) => {
            return Err(ObjtabError::InvalidArgument(
                "an executable is required unless both reports are supplied".to_string(),
            ))
        }
    };

    debug!(tool = tool.name(), executable = %executable.display(), "loading symbol table");
    SymbolTable::load(tool.as_ref(), &executable)
}

fn relocate(table: &mut SymbolTable, relocation: &Relocation)
{
    if let Some(offset) = relocation.offset {
        table.relocate_by_offset(offset.value());
    }
    if !relocation.section_addresses.is_empty() {
        table.relocate_sections(&relocation.section_addresses);
    }
}

fn print_sections(sections: &[Section])
{
    println!(
        "{:<4} {:<24} {:>10} {:>18} {:>18} {:>18}  Flags",
        "Idx", "Name", "Size", "VMA", "LMA", "Runtime"
    );
    for (index, section) in sections.iter().enumerate() {
        println!(
            "{:<4} {:<24} {:>#10x} {:>18} {:>18} {:>18}  {}",
            index, section.name, section.size, section.vma, section.lma, section.address, section.flags
        );
    }
}

fn print_symbol(table: &SymbolTable, symbol: &Symbol)
{
    let hidden = if symbol.hidden { " (hidden)" } else { "" };
    let file = symbol.file.as_deref().map(|f| format!(" [{f}]")).unwrap_or_default();
    println!(
        "{} {} {:<8} {:<7} {:<16} {:#8x} {}{}{}",
        table.link_address(symbol),
        symbol.effective_address(true),
        symbol.kind,
        symbol.scope,
        table.section_name(symbol),
        symbol.size,
        symbol.name,
        hidden,
        file
    );
}

fn parse_address(value: &str) -> Result<Address, String>
{
    value.parse::<Address>().map_err(|err| err.to_string())
}

fn parse_section_address(value: &str) -> Result<(String, Address), String>
{
    let (name, address) = value
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=ADDR, got '{value}'"))?;
    if name.is_empty() {
        return Err(format!("missing section name in '{value}'"));
    }
    Ok((name.to_string(), parse_address(address)?))
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_parse_section_address()
    {
        assert_eq!(
            parse_section_address(".text=0x8000").unwrap(),
            (".text".to_string(), Address::new(0x8000))
        );
        assert!(parse_section_address(".text").is_err());
        assert!(parse_section_address("=0x8000").is_err());
        assert!(parse_section_address(".text=zz").is_err());
    }

    #[test]
    fn test_cli_accepts_relocation_flags()
    {
        let cli = Cli::try_parse_from([
            "objtab",
            "--sections-report",
            "s.txt",
            "--symbols-report",
            "y.txt",
            "--offset",
            "0x1000",
            "--section-address",
            ".data=0x20000000",
            "lookup",
            "0x08001200",
            "--relocated",
        ])
        .unwrap();
        assert_eq!(cli.relocation.offset, Some(Address::new(0x1000)));
        assert_eq!(cli.relocation.section_addresses.len(), 1);
        assert!(matches!(cli.command, Commands::Lookup { relocated: true, .. }));
    }

    #[test]
    fn test_cli_reports_require_each_other()
    {
        assert!(Cli::try_parse_from(["objtab", "--sections-report", "s.txt", "sections"]).is_err());
    }
}
