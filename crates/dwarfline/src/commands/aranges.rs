//! `.debug_aranges` dump.

use dwarfline_formats::dwarf::ArangeSet;

/// Print every set header followed by its ranges.
pub fn print_aranges(sets: &[ArangeSet]) {
    if sets.is_empty() {
        println!("No address range sets");
        return;
    }

    for set in sets {
        let h = &set.header;
        println!(
            "Set at {:#x}: length {}, version {}, debug_info offset {:#x}, address size {}, segment size {}",
            set.offset, h.length, h.version, h.debug_info_offset, h.address_size, h.segment_size
        );
        if h.address_size != 2 {
            println!("  (ranges not decoded for address size {})", h.address_size);
            continue;
        }
        for range in &set.ranges {
            println!(
                "  {:#06x} - {:#06x}  ({} bytes)",
                range.address,
                range.end(),
                range.length
            );
        }
    }
}
