//! ELF file header parsing.

use crate::cursor::ByteCursor;
use crate::ParseError;
use dwarfline_core::{Architecture, Bitness, Endianness};

/// ELF magic bytes.
pub const ELF_MAGIC: [u8; 4] = [0x7f, b'E', b'L', b'F'];

/// ELF class (32-bit or 64-bit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElfClass {
    Elf32,
    Elf64,
}

impl ElfClass {
    /// Size of one section header entry for this class.
    pub fn section_header_size(self) -> usize {
        match self {
            Self::Elf32 => 40,
            Self::Elf64 => 64,
        }
    }
}

/// ELF file type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElfType {
    None,
    Relocatable,
    Executable,
    SharedObject,
    Core,
    Other(u16),
}

impl From<u16> for ElfType {
    fn from(value: u16) -> Self {
        match value {
            0 => Self::None,
            1 => Self::Relocatable,
            2 => Self::Executable,
            3 => Self::SharedObject,
            4 => Self::Core,
            other => Self::Other(other),
        }
    }
}

/// Machine architecture (`e_machine`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Machine {
    None,
    X86,
    Arm,
    X86_64,
    Msp430,
    Arm64,
    RiscV,
    Other(u16),
}

impl From<u16> for Machine {
    fn from(value: u16) -> Self {
        match value {
            0 => Self::None,
            3 => Self::X86,
            40 => Self::Arm,
            62 => Self::X86_64,
            105 => Self::Msp430,
            183 => Self::Arm64,
            243 => Self::RiscV,
            other => Self::Other(other),
        }
    }
}

/// Parsed ELF header. Only the fields needed to locate sections are kept.
#[derive(Debug, Clone)]
pub struct ElfHeader {
    /// ELF class (32 or 64 bit).
    pub class: ElfClass,
    /// Byte order of the file.
    pub endianness: Endianness,
    /// File type.
    pub file_type: ElfType,
    /// Machine architecture.
    pub machine: Machine,
    /// Entry point virtual address.
    pub e_entry: u64,
    /// Section header table file offset.
    pub e_shoff: u64,
    /// Processor-specific flags.
    pub e_flags: u32,
    /// Section header table entry size.
    pub e_shentsize: u16,
    /// Section header table entry count.
    pub e_shnum: u16,
    /// Section name string table index.
    pub e_shstrndx: u16,
}

impl ElfHeader {
    const EI_NIDENT: usize = 16;
    const ELF32_HEADER_SIZE: usize = 52;
    const ELF64_HEADER_SIZE: usize = 64;

    /// Parse an ELF header from the start of a file image.
    pub fn parse(data: &[u8]) -> Result<Self, ParseError> {
        if data.len() < Self::EI_NIDENT {
            return Err(ParseError::too_short(Self::EI_NIDENT, data.len()));
        }
        if data[0..4] != ELF_MAGIC {
            return Err(ParseError::invalid_magic("ELF", &data[0..4]));
        }

        let class = match data[4] {
            1 => ElfClass::Elf32,
            2 => ElfClass::Elf64,
            other => {
                return Err(ParseError::invalid_structure(
                    "ELF header",
                    4,
                    format!("invalid ELF class: {}", other),
                ))
            }
        };

        let endianness = match data[5] {
            1 => Endianness::Little,
            2 => Endianness::Big,
            other => {
                return Err(ParseError::invalid_structure(
                    "ELF header",
                    5,
                    format!("invalid endianness: {}", other),
                ))
            }
        };

        let required = match class {
            ElfClass::Elf32 => Self::ELF32_HEADER_SIZE,
            ElfClass::Elf64 => Self::ELF64_HEADER_SIZE,
        };
        if data.len() < required {
            return Err(ParseError::too_short(required, data.len()));
        }

        let c = ByteCursor::new(data, endianness);
        let file_type = ElfType::from(c.read_u16_at(16)?);
        let machine = Machine::from(c.read_u16_at(18)?);

        // Past e_version the two layouts differ only in the width of the
        // address/offset fields, which shifts everything after them.
        let header = match class {
            ElfClass::Elf32 => Self {
                class,
                endianness,
                file_type,
                machine,
                e_entry: u64::from(c.read_u32_at(24)?),
                e_shoff: u64::from(c.read_u32_at(32)?),
                e_flags: c.read_u32_at(36)?,
                e_shentsize: c.read_u16_at(46)?,
                e_shnum: c.read_u16_at(48)?,
                e_shstrndx: c.read_u16_at(50)?,
            },
            ElfClass::Elf64 => Self {
                class,
                endianness,
                file_type,
                machine,
                e_entry: c.read_u64_at(24)?,
                e_shoff: c.read_u64_at(40)?,
                e_flags: c.read_u32_at(48)?,
                e_shentsize: c.read_u16_at(58)?,
                e_shnum: c.read_u16_at(60)?,
                e_shstrndx: c.read_u16_at(62)?,
            },
        };
        Ok(header)
    }

    /// Returns the architecture for this ELF.
    pub fn architecture(&self) -> Architecture {
        match (self.machine, self.class) {
            (Machine::Msp430, _) => Architecture::Msp430,
            (Machine::X86_64, _) => Architecture::X86_64,
            (Machine::X86, _) => Architecture::X86,
            (Machine::Arm64, _) => Architecture::Arm64,
            (Machine::Arm, _) => Architecture::Arm,
            (Machine::RiscV, ElfClass::Elf64) => Architecture::RiscV64,
            (Machine::RiscV, ElfClass::Elf32) => Architecture::RiscV32,
            (Machine::Other(m), _) => Architecture::Unknown(m),
            (Machine::None, _) => Architecture::Unknown(0),
        }
    }

    /// Returns whether this is a 32-bit or 64-bit container.
    pub fn bitness(&self) -> Bitness {
        match self.class {
            ElfClass::Elf32 => Bitness::Bits32,
            ElfClass::Elf64 => Bitness::Bits64,
        }
    }
}
