//! Line-number program opcodes (DWARF 2-4, section 6.2.5).

/// Standard opcodes (`DW_LNS_*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DwLns {
    Copy = 0x01,
    AdvancePc = 0x02,
    AdvanceLine = 0x03,
    SetFile = 0x04,
    SetColumn = 0x05,
    NegateStmt = 0x06,
    SetBasicBlock = 0x07,
    ConstAddPc = 0x08,
    FixedAdvancePc = 0x09,
}

impl DwLns {
    /// Map an opcode below `opcode_base` to the opcodes with fixed semantics.
    /// Opcodes from 10 upward (prologue_end, epilogue_begin, set_isa and
    /// vendor extensions) return `None`.
    pub fn from_u8(value: u8) -> Option<Self> {
        Some(match value {
            0x01 => Self::Copy,
            0x02 => Self::AdvancePc,
            0x03 => Self::AdvanceLine,
            0x04 => Self::SetFile,
            0x05 => Self::SetColumn,
            0x06 => Self::NegateStmt,
            0x07 => Self::SetBasicBlock,
            0x08 => Self::ConstAddPc,
            0x09 => Self::FixedAdvancePc,
            _ => return None,
        })
    }
}

/// Extended opcodes (`DW_LNE_*`), introduced by a zero byte and a length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DwLne {
    EndSequence,
    SetAddress,
    DefineFile,
    Unknown(u8),
}

impl From<u8> for DwLne {
    fn from(value: u8) -> Self {
        match value {
            0x01 => Self::EndSequence,
            0x02 => Self::SetAddress,
            0x03 => Self::DefineFile,
            other => Self::Unknown(other),
        }
    }
}

/// The byte that introduces an extended opcode.
pub const DW_LNS_EXTENDED: u8 = 0x00;
