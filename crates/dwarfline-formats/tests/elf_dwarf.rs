//! End-to-end tests: a hand-assembled ELF32 (MSP430) image carrying
//! `.debug_line` and `.debug_aranges`, parsed and queried through the
//! public API.

use dwarfline_core::Architecture;
use dwarfline_formats::dwarf::{
    ConstAddPc, DecoderConfig, FileAttribution, WarningKind, DEBUG_ARANGES, DEBUG_LINE,
};
use dwarfline_formats::elf::{SHT_NULL, SHT_PROGBITS, SHT_STRTAB};
use dwarfline_formats::{DwarfReader, Elf, LineInfoProvider, SectionSource};

// =============================================================================
// Fixture Assembly
// =============================================================================

struct RawSection {
    name: &'static str,
    sh_type: u32,
    flags: u32,
    addr: u32,
    data: Vec<u8>,
}

/// Lay out an ELF32 little-endian MSP430 image: header, section contents,
/// `.shstrtab`, then the section header table.
fn elf32(sections: Vec<RawSection>) -> Vec<u8> {
    let mut shstrtab = vec![0u8];
    let mut name_offsets = Vec::new();
    for section in &sections {
        name_offsets.push(shstrtab.len() as u32);
        shstrtab.extend_from_slice(section.name.as_bytes());
        shstrtab.push(0);
    }
    let shstrtab_name = shstrtab.len() as u32;
    shstrtab.extend_from_slice(b".shstrtab\0");

    let mut image = vec![0u8; 52];
    image[0..4].copy_from_slice(&[0x7f, b'E', b'L', b'F']);
    image[4] = 1; // ELFCLASS32
    image[5] = 1; // ELFDATA2LSB
    image[6] = 1;
    image[16..18].copy_from_slice(&2u16.to_le_bytes()); // ET_EXEC
    image[18..20].copy_from_slice(&105u16.to_le_bytes()); // EM_MSP430

    let mut offsets = Vec::new();
    for section in &sections {
        offsets.push(image.len() as u32);
        image.extend_from_slice(&section.data);
    }
    let shstrtab_offset = image.len() as u32;
    image.extend_from_slice(&shstrtab);

    let shoff = image.len() as u32;
    let mut push = |name: u32, ty: u32, flags: u32, addr: u32, off: u32, size: u32| {
        for v in [name, ty, flags, addr, off, size, 0, 0, 1, 0] {
            image.extend_from_slice(&v.to_le_bytes());
        }
    };
    push(0, SHT_NULL, 0, 0, 0, 0);
    for (i, section) in sections.iter().enumerate() {
        push(
            name_offsets[i],
            section.sh_type,
            section.flags,
            section.addr,
            offsets[i],
            section.data.len() as u32,
        );
    }
    push(shstrtab_name, SHT_STRTAB, 0, 0, shstrtab_offset, shstrtab.len() as u32);

    let shnum = sections.len() as u16 + 2;
    image[32..36].copy_from_slice(&shoff.to_le_bytes());
    image[46..48].copy_from_slice(&40u16.to_le_bytes());
    image[48..50].copy_from_slice(&shnum.to_le_bytes());
    image[50..52].copy_from_slice(&(shnum - 1).to_le_bytes());
    image
}

/// A version 2 line program unit: minimum_instruction_length 1,
/// line_base -5, line_range 14, opcode_base 13.
fn line_unit(dirs: &[&str], files: &[(&str, u8)], program: &[u8]) -> Vec<u8> {
    let mut prologue = vec![1, 1, 0xFB, 14, 13];
    prologue.extend_from_slice(&[0, 1, 1, 1, 1, 0, 0, 0, 1, 0, 0, 1]);
    for dir in dirs {
        prologue.extend_from_slice(dir.as_bytes());
        prologue.push(0);
    }
    prologue.push(0);
    for (name, dir) in files {
        prologue.extend_from_slice(name.as_bytes());
        prologue.extend_from_slice(&[0, *dir, 0, 0]);
    }
    prologue.push(0);

    let mut body = 2u16.to_le_bytes().to_vec();
    body.extend_from_slice(&(prologue.len() as u32).to_le_bytes());
    body.extend_from_slice(&prologue);
    body.extend_from_slice(program);
    let mut unit = (body.len() as u32).to_le_bytes().to_vec();
    unit.extend_from_slice(&body);
    unit
}

fn debug_line() -> Vec<u8> {
    let mut data = line_unit(
        &["src"],
        &[("main.c", 1), ("led.h", 1)],
        &[
            0x00, 0x03, 0x02, 0x00, 0x44, // set_address 0x4400
            0x03, 0x09, // advance_line +9
            0x01, // copy: 0x4400 line 10
            75,   // special: 0x4404 line 11
            0x04, 0x02, // set_file 2
            51,   // special: 0x4406 line 16
            0x04, 0x01, // set_file 1
            0x03, 0x7C, // advance_line -4
            102,  // special: 0x440c line 12
            0x02, 0x02, // advance_pc 2
            0x00, 0x01, 0x01, // end_sequence
        ],
    );
    data.extend(line_unit(
        &[],
        &[("uart.c", 0)],
        &[
            0x00, 0x03, 0x02, 0x00, 0x50, // set_address 0x5000
            0x01, // copy: 0x5000 line 1
            47,   // special: 0x5002 line 2
            0x00, 0x01, 0x01,
        ],
    ));
    data
}

fn debug_aranges() -> Vec<u8> {
    let mut data = 20u32.to_le_bytes().to_vec();
    data.extend_from_slice(&[2, 0, 0, 0, 0, 0, 2, 0]);
    for (address, length) in [(0x4400u16, 0x0Eu16), (0x5000, 4), (0, 0)] {
        data.extend_from_slice(&address.to_le_bytes());
        data.extend_from_slice(&length.to_le_bytes());
    }
    data
}

fn fixture() -> Vec<u8> {
    elf32(vec![
        RawSection {
            name: ".text",
            sh_type: SHT_PROGBITS,
            flags: 0x6,
            addr: 0x4400,
            data: vec![0x30, 0x41, 0x03, 0x43],
        },
        RawSection {
            name: DEBUG_ARANGES,
            sh_type: SHT_PROGBITS,
            flags: 0,
            addr: 0,
            data: debug_aranges(),
        },
        RawSection {
            name: DEBUG_LINE,
            sh_type: SHT_PROGBITS,
            flags: 0,
            addr: 0,
            data: debug_line(),
        },
    ])
}

// =============================================================================
// Container
// =============================================================================

#[test]
fn test_fixture_sections() {
    let image = fixture();
    let elf = Elf::parse(&image).unwrap();
    assert_eq!(elf.architecture(), Architecture::Msp430);
    assert_eq!(elf.section_count(), 5);
    assert_eq!(elf.section_data(DEBUG_LINE).map(<[u8]>::len), Some(debug_line().len()));
    assert!(elf.section_named(DEBUG_ARANGES).is_some());
}

// =============================================================================
// Queries
// =============================================================================

#[test]
fn test_lookup_floor_semantics() {
    let image = fixture();
    let elf = Elf::parse(&image).unwrap();
    let mut reader = DwarfReader::new(&elf);
    reader.read();
    assert!(reader.warnings().is_empty(), "{:?}", reader.warnings());

    let loc = reader.debug_info(0x4400).unwrap();
    assert_eq!((loc.directory.as_str(), loc.file.as_str(), loc.line), ("src", "main.c", 10));
    assert_eq!(loc.context, None);

    assert_eq!(reader.debug_info(0x4405).unwrap().line, 11);
    assert_eq!(reader.debug_info(0x440C).unwrap().line, 12);
    assert_eq!(reader.debug_info(0x440D), None);
    assert_eq!(reader.debug_info(0x43FF), None);

    let uart = reader.debug_info(0x5001).unwrap();
    assert_eq!(uart.to_string(), "./uart.c:1");
}

#[test]
fn test_first_file_attribution_by_default() {
    let image = fixture();
    let elf = Elf::parse(&image).unwrap();
    let mut reader = DwarfReader::new(&elf);
    reader.read();

    // The row at 0x4406 was emitted with file 2, but lookups report the
    // table's first file unless per-entry attribution is requested.
    let loc = reader.debug_info(0x4408).unwrap();
    assert_eq!((loc.file.as_str(), loc.line), ("main.c", 16));

    let mut per_entry = DwarfReader::with_config(
        &elf,
        DecoderConfig::default().with_file_attribution(FileAttribution::PerEntry),
    );
    per_entry.read();
    let loc = per_entry.debug_info(0x4408).unwrap();
    assert_eq!((loc.file.as_str(), loc.line), ("led.h", 16));
}

#[test]
fn test_addresses_and_files() {
    let image = fixture();
    let elf = Elf::parse(&image).unwrap();
    let mut reader = DwarfReader::new(&elf);
    reader.read();

    assert_eq!(
        reader.executable_addresses(),
        vec![0x4400, 0x4404, 0x4406, 0x440C, 0x5000, 0x5002]
    );
    assert_eq!(reader.source_files(), vec!["src/main.c", "./uart.c"]);
    assert_eq!(reader.store().entry_count(), 6);
}

#[test]
fn test_aranges_decoded() {
    let image = fixture();
    let elf = Elf::parse(&image).unwrap();
    let mut reader = DwarfReader::new(&elf);
    reader.read();

    let sets = reader.aranges();
    assert_eq!(sets.len(), 1);
    let ends: Vec<u64> = sets[0].ranges.iter().map(|r| r.end()).collect();
    assert_eq!(ends, vec![0x440E, 0x5004]);
}

// =============================================================================
// Failure Isolation
// =============================================================================

#[test]
fn test_broken_unit_does_not_hide_later_units() {
    let mut line = line_unit(&[], &[("broken.c", 0)], &[0x01, 0x00, 0x01, 0x01]);
    line[4 + 2 + 4 + 4] = 0; // opcode_base
    line.extend(debug_line());

    let image = elf32(vec![RawSection {
        name: DEBUG_LINE,
        sh_type: SHT_PROGBITS,
        flags: 0,
        addr: 0,
        data: line,
    }]);
    let elf = Elf::parse(&image).unwrap();
    let mut reader = DwarfReader::new(&elf);
    reader.read();

    assert_eq!(reader.warnings().len(), 1);
    assert_eq!(reader.warnings()[0].kind, WarningKind::MalformedHeader);
    assert_eq!(reader.store().len(), 2);
    assert_eq!(reader.debug_info(0x4404).unwrap().line, 11);
}

#[test]
fn test_const_add_pc_standard() {
    let line = line_unit(
        &[],
        &[("a.c", 0)],
        &[0x00, 0x03, 0x02, 0x00, 0x44, 0x08, 0x01, 0x00, 0x01, 0x01],
    );
    let image = elf32(vec![RawSection {
        name: DEBUG_LINE,
        sh_type: SHT_PROGBITS,
        flags: 0,
        addr: 0,
        data: line,
    }]);
    let elf = Elf::parse(&image).unwrap();

    let mut ignore = DwarfReader::new(&elf);
    ignore.read();
    assert_eq!(ignore.executable_addresses(), vec![0x4400]);

    // (255 - 13) / 14 = 17
    let mut standard = DwarfReader::with_config(
        &elf,
        DecoderConfig::default().with_const_add_pc(ConstAddPc::Standard),
    );
    standard.read();
    assert_eq!(standard.executable_addresses(), vec![0x4411]);
}

#[test]
fn test_no_debug_sections() {
    let image = elf32(vec![RawSection {
        name: ".text",
        sh_type: SHT_PROGBITS,
        flags: 0x6,
        addr: 0x4400,
        data: vec![0x30, 0x41],
    }]);
    let elf = Elf::parse(&image).unwrap();
    let mut reader = DwarfReader::new(&elf);
    reader.read();
    assert!(reader.store().is_empty());
    assert_eq!(reader.debug_info(0x4400), None);
    assert!(reader.source_files().is_empty());
}
