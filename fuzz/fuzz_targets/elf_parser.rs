#![no_main]

use libfuzzer_sys::fuzz_target;
use dwarfline_formats::{DwarfReader, Elf, LineInfoProvider, Section, SectionSource};

fuzz_target!(|data: &[u8]| {
    // Try to parse as ELF - should never panic
    let Ok(elf) = Elf::parse(data) else {
        return;
    };

    let _ = elf.architecture();
    for index in 0..elf.section_count() {
        if let Some(section) = elf.section(index) {
            let _ = section.name().len();
            let _ = section.data().len();
        }
    }

    // Whatever the sections hold, ingestion and queries must not panic.
    let mut reader = DwarfReader::new(&elf);
    reader.read();
    for address in reader.executable_addresses().into_iter().take(64) {
        let _ = reader.debug_info(address);
    }
    let _ = reader.source_files();
});
