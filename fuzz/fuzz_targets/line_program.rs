#![no_main]

use libfuzzer_sys::fuzz_target;
use dwarfline_core::Endianness;
use dwarfline_formats::dwarf::{ConstAddPc, DecoderConfig, LineProgramDecoder};

fuzz_target!(|data: &[u8]| {
    let Some((&mode, section)) = data.split_first() else {
        return;
    };
    let config = DecoderConfig::default().with_const_add_pc(if mode & 1 == 0 {
        ConstAddPc::Ignore
    } else {
        ConstAddPc::Standard
    });
    let endianness = if mode & 2 == 0 { Endianness::Little } else { Endianness::Big };

    let decoded = LineProgramDecoder::new(config).decode_section(section, endianness);
    for table in &decoded.tables {
        assert!(!table.entries().is_empty());
        let _ = table.floor_entry(table.end_address());
    }
});
