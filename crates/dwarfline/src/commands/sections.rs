//! Section listing.

use dwarfline_formats::{Elf, Section};

/// Print the section header table.
pub fn print_sections(elf: &Elf) {
    println!(
        "{:<4} {:<24} {:<10} {:<12} {:<10} {:<6}",
        "Idx", "Name", "Type", "Address", "Size", "Flags"
    );
    println!("{}", "-".repeat(70));

    for (idx, section) in elf.sections().iter().enumerate() {
        let header = &section.header;
        let flags = format!(
            "{}{}{}",
            if header.is_allocated() { "A" } else { "-" },
            if header.is_writable() { "W" } else { "-" },
            if header.is_executable() { "X" } else { "-" },
        );
        println!(
            "{:<4} {:<24} {:<10} {:#010x}   {:#08x}   {:<6}",
            idx,
            section.name(),
            header.type_name(),
            section.virtual_address(),
            section.size(),
            flags
        );
    }
}
