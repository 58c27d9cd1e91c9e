#![no_main]

use libfuzzer_sys::fuzz_target;
use dwarfline_core::Endianness;
use dwarfline_formats::dwarf::decode_aranges;

fuzz_target!(|data: &[u8]| {
    let decoded = decode_aranges(data, Endianness::Little);
    for set in &decoded.sets {
        if set.header.address_size != 2 {
            assert!(set.ranges.is_empty());
        }
    }
});
