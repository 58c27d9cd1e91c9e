//! # dwarfline-formats
//!
//! Parsers behind dwarfline:
//! - ELF - section enumeration for 32- and 64-bit objects of either byte order
//! - DWARF - `.debug_line` programs and `.debug_aranges` sets
//!
//! The DWARF side only sees [`SectionSource`], so the ELF container is one
//! provider among possible others.

pub mod cursor;
pub mod dwarf;
pub mod elf;
pub mod error;
pub mod traits;

pub use cursor::ByteCursor;
pub use dwarf::{DecoderConfig, DwarfReader};
pub use elf::{Elf, ElfType};
pub use error::ParseError;
pub use traits::{LineInfoProvider, Section, SectionSource};

/// Detected binary format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryType {
    Elf,
    Unknown,
}

/// Detect the binary format from magic bytes.
pub fn detect_format(data: &[u8]) -> BinaryType {
    if data.starts_with(&elf::ELF_MAGIC) {
        BinaryType::Elf
    } else {
        BinaryType::Unknown
    }
}
