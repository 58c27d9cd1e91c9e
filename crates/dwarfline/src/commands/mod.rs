//! Command handlers for the dwarfline CLI.
//!
//! Each submodule prints one view of the binary; the summary shown when no
//! command is given lives here.

pub mod aranges;
pub mod lines;
pub mod sections;

use dwarfline_formats::{DwarfReader, Elf, LineInfoProvider};

/// Print table, row and arange counts plus any decode warnings.
pub fn print_summary(elf: &Elf, reader: &DwarfReader<'_, Elf<'_>>) {
    let store = reader.store();
    println!(
        "Architecture:  {} ({}-bit ELF)",
        elf.architecture().name(),
        elf.header.bitness().bits()
    );
    println!("Sections:      {}", elf.sections().len());
    println!("Line tables:   {}", store.len());
    println!("Line entries:  {}", store.entry_count());
    println!("Source files:  {}", reader.source_files().len());
    println!("Arange sets:   {}", reader.aranges().len());
    println!("Warnings:      {}", reader.warnings().len());
    for warning in reader.warnings() {
        println!("  {}", warning);
    }
}
