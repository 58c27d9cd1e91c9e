//! dwarfline - map machine addresses to source lines
//!
//! Usage:
//!   dwarfline <binary>                 Summary of the line information
//!   dwarfline <binary> sections        List sections
//!   dwarfline <binary> lines           List line tables
//!   dwarfline <binary> lookup <addr>   Resolve an address to file:line
//!   dwarfline <binary> addresses       List every line-table address
//!   dwarfline <binary> files           List the source file of each table
//!   dwarfline <binary> aranges         Dump .debug_aranges

mod commands;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use dwarfline_formats::dwarf::{ConstAddPc, DecoderConfig, FileAttribution};
use dwarfline_formats::{detect_format, BinaryType, DwarfReader, Elf, LineInfoProvider};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dwarfline")]
#[command(about = "Map machine addresses to source lines using DWARF line tables", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the ELF file
    binary: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,

    /// How DW_LNS_const_add_pc is executed
    #[arg(long, value_enum, default_value_t = ConstAddPcMode::Ignore, global = true)]
    const_add_pc: ConstAddPcMode,

    /// Attribute each row to its own file instead of the table's first file
    #[arg(long, global = true)]
    per_entry_files: bool,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// List sections in the binary
    Sections,
    /// List line tables
    Lines {
        /// Also print every row
        #[arg(short, long)]
        entries: bool,
    },
    /// Resolve an address to a source line
    Lookup {
        /// Address (hex, 0x prefix optional)
        #[arg(value_parser = parse_hex)]
        address: u64,
    },
    /// List every address that starts a line-table row
    Addresses,
    /// List the source file of each line table
    Files,
    /// Dump address range sets
    Aranges,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ConstAddPcMode {
    /// Leave the address unchanged
    Ignore,
    /// Advance by the address increment of special opcode 255
    Standard,
}

impl From<ConstAddPcMode> for ConstAddPc {
    fn from(mode: ConstAddPcMode) -> Self {
        match mode {
            ConstAddPcMode::Ignore => ConstAddPc::Ignore,
            ConstAddPcMode::Standard => ConstAddPc::Standard,
        }
    }
}

/// Parse a hex address string (with or without 0x prefix).
fn parse_hex(s: &str) -> Result<u64, String> {
    let s = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u64::from_str_radix(s, 16).map_err(|e| e.to_string())
}

/// Install a stderr subscriber. `RUST_LOG` wins over the `-v` count.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let data = fs::read(&cli.binary)
        .with_context(|| format!("Failed to read binary: {}", cli.binary.display()))?;

    let elf = match detect_format(&data) {
        BinaryType::Elf => Elf::parse(&data).context("Failed to parse ELF file")?,
        BinaryType::Unknown => bail!("Unknown binary format. Supported formats: ELF"),
    };
    tracing::debug!(
        architecture = elf.architecture().name(),
        sections = elf.sections().len(),
        "parsed {}",
        cli.binary.display()
    );

    let config = DecoderConfig::new()
        .with_const_add_pc(cli.const_add_pc.into())
        .with_file_attribution(if cli.per_entry_files {
            FileAttribution::PerEntry
        } else {
            FileAttribution::FirstFile
        });
    let mut reader = DwarfReader::with_config(&elf, config);
    reader.read();

    match cli.command {
        Some(Commands::Sections) => commands::sections::print_sections(&elf),
        Some(Commands::Lines { entries }) => commands::lines::print_tables(&reader, entries),
        Some(Commands::Lookup { address }) => commands::lines::print_lookup(&reader, address),
        Some(Commands::Addresses) => commands::lines::print_addresses(&reader),
        Some(Commands::Files) => commands::lines::print_files(&reader),
        Some(Commands::Aranges) => commands::aranges::print_aranges(reader.aranges()),
        None => commands::print_summary(&elf, &reader),
    }

    Ok(())
}
