//! ELF section header parsing.

use super::header::ElfClass;
use crate::cursor::ByteCursor;
use crate::{ParseError, Section};
use dwarfline_core::Endianness;

// Section types
pub const SHT_NULL: u32 = 0;
pub const SHT_PROGBITS: u32 = 1;
pub const SHT_SYMTAB: u32 = 2;
pub const SHT_STRTAB: u32 = 3;
pub const SHT_RELA: u32 = 4;
pub const SHT_NOTE: u32 = 7;
pub const SHT_NOBITS: u32 = 8;
pub const SHT_REL: u32 = 9;

// Section flags
pub const SHF_WRITE: u64 = 0x1;
pub const SHF_ALLOC: u64 = 0x2;
pub const SHF_EXECINSTR: u64 = 0x4;

/// A parsed section header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeader {
    /// Section name (index into the section name string table).
    pub sh_name: u32,
    /// Section type.
    pub sh_type: u32,
    /// Section flags.
    pub sh_flags: u64,
    /// Virtual address in memory.
    pub sh_addr: u64,
    /// Offset in file.
    pub sh_offset: u64,
    /// Size in bytes.
    pub sh_size: u64,
}

impl SectionHeader {
    /// Parse one section header entry.
    pub fn parse(data: &[u8], class: ElfClass, endianness: Endianness) -> Result<Self, ParseError> {
        let size = class.section_header_size();
        if data.len() < size {
            return Err(ParseError::too_short(size, data.len()));
        }

        let c = ByteCursor::new(data, endianness);
        match class {
            ElfClass::Elf32 => Ok(Self {
                sh_name: c.read_u32_at(0)?,
                sh_type: c.read_u32_at(4)?,
                sh_flags: u64::from(c.read_u32_at(8)?),
                sh_addr: u64::from(c.read_u32_at(12)?),
                sh_offset: u64::from(c.read_u32_at(16)?),
                sh_size: u64::from(c.read_u32_at(20)?),
            }),
            ElfClass::Elf64 => Ok(Self {
                sh_name: c.read_u32_at(0)?,
                sh_type: c.read_u32_at(4)?,
                sh_flags: c.read_u64_at(8)?,
                sh_addr: c.read_u64_at(16)?,
                sh_offset: c.read_u64_at(24)?,
                sh_size: c.read_u64_at(32)?,
            }),
        }
    }

    /// Returns the section type as a string.
    pub fn type_name(&self) -> &'static str {
        match self.sh_type {
            SHT_NULL => "NULL",
            SHT_PROGBITS => "PROGBITS",
            SHT_SYMTAB => "SYMTAB",
            SHT_STRTAB => "STRTAB",
            SHT_RELA => "RELA",
            SHT_NOTE => "NOTE",
            SHT_NOBITS => "NOBITS",
            SHT_REL => "REL",
            _ => "UNKNOWN",
        }
    }

    /// Returns true if this section contains executable code.
    pub fn is_executable(&self) -> bool {
        self.sh_flags & SHF_EXECINSTR != 0
    }

    /// Returns true if this section is loaded into memory.
    pub fn is_allocated(&self) -> bool {
        self.sh_flags & SHF_ALLOC != 0
    }

    /// Returns true if this section is writable.
    pub fn is_writable(&self) -> bool {
        self.sh_flags & SHF_WRITE != 0
    }

    /// File byte range of the section contents, if it has any.
    pub(crate) fn file_range(&self) -> Option<(usize, usize)> {
        if self.sh_type == SHT_NOBITS || self.sh_size == 0 {
            return None;
        }
        let start = usize::try_from(self.sh_offset).ok()?;
        let end = start.checked_add(usize::try_from(self.sh_size).ok()?)?;
        Some((start, end))
    }
}

/// A section header together with its resolved name and borrowed contents.
#[derive(Debug, Clone)]
pub struct ElfSection<'a> {
    /// The raw header.
    pub header: SectionHeader,
    name: String,
    data: &'a [u8],
}

impl<'a> ElfSection<'a> {
    pub(crate) fn new(header: SectionHeader, name: String, data: &'a [u8]) -> Self {
        Self { header, name, data }
    }
}

impl Section for ElfSection<'_> {
    fn name(&self) -> &str {
        &self.name
    }

    fn virtual_address(&self) -> u64 {
        self.header.sh_addr
    }

    fn size(&self) -> u64 {
        self.header.sh_size
    }

    fn data(&self) -> &[u8] {
        self.data
    }
}
