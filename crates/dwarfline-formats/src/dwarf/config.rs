//! Decoder and lookup options.
//!
//! The defaults reproduce the long-standing behaviour of the reader; the
//! alternatives are opt-in.

/// Handling of `DW_LNS_const_add_pc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConstAddPc {
    /// Treat the opcode as a no-op.
    #[default]
    Ignore,
    /// Advance the address like special opcode 255 would, without emitting
    /// a row.
    Standard,
}

/// Which source file a resolved location is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileAttribution {
    /// Always the first entry of the table's file list.
    #[default]
    FirstFile,
    /// The file register captured with the matching row (1-based), falling
    /// back to the first file when the index is out of range.
    PerEntry,
}

/// Options for [`DwarfReader`](super::DwarfReader) and the decoders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecoderConfig {
    pub const_add_pc: ConstAddPc,
    pub file_attribution: FileAttribution,
}

impl DecoderConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `DW_LNS_const_add_pc` handling.
    pub fn with_const_add_pc(mut self, mode: ConstAddPc) -> Self {
        self.const_add_pc = mode;
        self
    }

    /// Set the file attribution used by lookups.
    pub fn with_file_attribution(mut self, attribution: FileAttribution) -> Self {
        self.file_attribution = attribution;
        self
    }
}
