//! Line table views: table listing, address lookup, address and file lists.

use dwarfline_formats::{DwarfReader, LineInfoProvider, SectionSource};

/// Print one summary line per table, optionally followed by its rows.
pub fn print_tables<S: SectionSource + ?Sized>(reader: &DwarfReader<'_, S>, entries: bool) {
    let store = reader.store();
    if store.is_empty() {
        println!("No line information");
        return;
    }

    println!(
        "{:<40} {:<10} {:<10} {:<8} {:<8}",
        "File", "Start", "End", "Size", "Entries"
    );
    println!("{}", "-".repeat(80));

    for table in store.tables() {
        let start = table.start_address();
        let end = table.end_address();
        println!(
            "{:<40} {:#010x} {:#010x} {:<8} {:<8}",
            table.primary_path(),
            start,
            end,
            end.wrapping_sub(start),
            table.entries().len()
        );

        if entries {
            for entry in table.entries() {
                let path = table.path_for(entry, reader.config().file_attribution);
                println!(
                    "    {:#010x}  line {:<6} col {:<4} {}",
                    entry.address, entry.line, entry.column, path
                );
            }
        }
    }
}

/// Print the location `address` resolves to.
pub fn print_lookup<S: SectionSource + ?Sized>(reader: &DwarfReader<'_, S>, address: u64) {
    match reader.debug_info(address) {
        Some(location) => println!("{:#x}: {}", address, location),
        None => println!("{:#x}: no line information", address),
    }
}

/// Print every executable address, one per line.
pub fn print_addresses<S: SectionSource + ?Sized>(reader: &DwarfReader<'_, S>) {
    for address in reader.executable_addresses() {
        println!("{:#x}", address);
    }
}

/// Print the primary source file of each table.
pub fn print_files<S: SectionSource + ?Sized>(reader: &DwarfReader<'_, S>) {
    for file in reader.source_files() {
        println!("{}", file);
    }
}
