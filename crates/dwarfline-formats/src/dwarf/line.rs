//! DWARF line number program decoding (`.debug_line`, versions 2-4).
//!
//! Each unit starts with a header describing the encoding parameters, a
//! directory table and a file table, followed by bytecode for a small state
//! machine. Running the bytecode yields rows of (address, line); every
//! `end_sequence` closes one [`LineTable`].

use dwarfline_core::Endianness;

use super::config::{ConstAddPc, DecoderConfig, FileAttribution};
use super::constants::{DwLne, DwLns, DW_LNS_EXTENDED};
use super::warning::{DecodeWarning, WarningKind};
use super::DEBUG_LINE;
use crate::cursor::ByteCursor;
use crate::ParseError;

/// Name of directory index 0, the compilation directory.
pub const CURRENT_DIRECTORY: &str = ".";

/// A file entry in the line number program header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// The file name as written in the table.
    pub name: String,
    /// Index into the directory table (0 = compilation directory).
    pub directory_index: u64,
    /// Last modification time (0 if unknown).
    pub mod_time: u64,
    /// File size in bytes (0 if unknown).
    pub size: u64,
    /// `directory + "/" + name`, resolved when the table was read.
    pub path: String,
}

/// The header of one unit's line number program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineProgramHeader {
    /// Unit length, excluding the 4-byte length field itself.
    pub total_length: u32,
    pub version: u16,
    /// Bytes from the end of this field to the first opcode.
    pub prologue_length: u32,
    pub minimum_instruction_length: u8,
    /// Present from version 4; 1 for older units.
    pub maximum_operations_per_instruction: u8,
    pub default_is_stmt: bool,
    pub line_base: i8,
    pub line_range: u8,
    pub opcode_base: u8,
    /// Operand counts of standard opcodes 1..opcode_base.
    pub standard_opcode_lengths: Vec<u8>,
}

/// Reinterpret the raw `line_base` byte as two's complement (250 is -6).
pub fn signed_line_base(raw: u8) -> i8 {
    i8::from_le_bytes([raw])
}

impl LineProgramHeader {
    /// Parse the fixed part of the header. `unit` must be positioned just
    /// past the `total_length` field, which the caller has already read.
    pub fn parse(unit: &mut ByteCursor<'_>, total_length: u32) -> Result<Self, ParseError> {
        let version = unit.read_u16()?;
        if !(2..=4).contains(&version) {
            return Err(ParseError::UnsupportedVersion {
                format: "line program",
                version: u32::from(version),
            });
        }

        let prologue_length = unit.read_u32()?;
        let minimum_instruction_length = unit.read_u8()?;
        let maximum_operations_per_instruction = if version >= 4 { unit.read_u8()? } else { 1 };
        let default_is_stmt = unit.read_u8()? != 0;
        let line_base = signed_line_base(unit.read_u8()?);

        let line_range = unit.read_u8()?;
        if line_range == 0 {
            return Err(ParseError::invalid_structure(
                "line program header",
                unit.position() as u64,
                "line_range is zero",
            ));
        }

        let opcode_base = unit.read_u8()?;
        if opcode_base == 0 {
            return Err(ParseError::invalid_structure(
                "line program header",
                unit.position() as u64,
                "opcode_base is zero",
            ));
        }

        let standard_opcode_lengths = (1..opcode_base)
            .map(|_| unit.read_u8())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            total_length,
            version,
            prologue_length,
            minimum_instruction_length,
            maximum_operations_per_instruction,
            default_is_stmt,
            line_base,
            line_range,
            opcode_base,
            standard_opcode_lengths,
        })
    }

    /// Offset of the first opcode, relative to the byte after `total_length`.
    pub fn program_offset(&self) -> usize {
        // version (2) + prologue_length (4)
        6 + self.prologue_length as usize
    }

    /// Address and line advance encoded by a special opcode, or `None` if
    /// `opcode` is below `opcode_base`.
    pub fn special_opcode_advance(&self, opcode: u8) -> Option<(u64, i64)> {
        let adjusted = opcode.checked_sub(self.opcode_base)?;
        let address_advance = u64::from(adjusted / self.line_range)
            * u64::from(self.minimum_instruction_length);
        let line_advance = i64::from(self.line_base) + i64::from(adjusted % self.line_range);
        Some((address_advance, line_advance))
    }

    /// Address advance of `DW_LNS_const_add_pc` per the standard: that of
    /// special opcode 255.
    pub fn const_add_pc_advance(&self) -> u64 {
        self.special_opcode_advance(255).map_or(0, |(address, _)| address)
    }
}

/// One row of the line matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineEntry {
    pub address: u64,
    pub line: i64,
    /// File register at emission time (1-based index into the file table).
    pub file: u64,
    /// Column register at emission time (0 = unknown).
    pub column: u64,
}

/// The directories, files and rows of one terminated sequence.
///
/// Never empty: [`LineTable::new`] refuses a sequence without rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTable {
    directories: Vec<String>,
    files: Vec<SourceFile>,
    entries: Vec<LineEntry>,
}

impl LineTable {
    /// Package a sequence, or `None` if it produced no rows.
    pub fn new(
        directories: Vec<String>,
        files: Vec<SourceFile>,
        entries: Vec<LineEntry>,
    ) -> Option<Self> {
        if entries.is_empty() {
            return None;
        }
        Some(Self {
            directories,
            files,
            entries,
        })
    }

    pub fn directories(&self) -> &[String] {
        &self.directories
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn entries(&self) -> &[LineEntry] {
        &self.entries
    }

    /// Address of the first row.
    pub fn start_address(&self) -> u64 {
        self.entries.first().map_or(0, |e| e.address)
    }

    /// Address of the last row.
    pub fn end_address(&self) -> u64 {
        self.entries.last().map_or(0, |e| e.address)
    }

    /// Path of the first file in the table, or `""` if the table lists none.
    pub fn primary_path(&self) -> &str {
        self.files.first().map_or("", |f| f.path.as_str())
    }

    /// Returns true if `first.address <= address <= last.address`.
    pub fn brackets(&self, address: u64) -> bool {
        self.start_address() <= address && address <= self.end_address()
    }

    /// The last row (in program order) whose address does not exceed
    /// `address`.
    pub fn floor_entry(&self, address: u64) -> Option<&LineEntry> {
        self.entries.iter().rev().find(|e| e.address <= address)
    }

    /// Path a row is attributed to under `attribution`.
    pub fn path_for(&self, entry: &LineEntry, attribution: FileAttribution) -> &str {
        match attribution {
            FileAttribution::FirstFile => self.primary_path(),
            FileAttribution::PerEntry => entry
                .file
                .checked_sub(1)
                .and_then(|i| usize::try_from(i).ok())
                .and_then(|i| self.files.get(i))
                .map_or_else(|| self.primary_path(), |f| f.path.as_str()),
        }
    }
}

/// Registers of the line-number state machine.
///
/// Passed explicitly to [`LineState::execute`] so that decoding one unit can
/// never observe another unit's leftovers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineState {
    pub address: u64,
    pub file: u64,
    pub line: i64,
    pub column: u64,
    pub is_stmt: bool,
    pub basic_block: bool,
    pub end_sequence: bool,
}

impl LineState {
    /// Initial register values for a new sequence.
    pub fn new(default_is_stmt: bool) -> Self {
        Self {
            address: 0,
            file: 1,
            line: 1,
            column: 0,
            is_stmt: default_is_stmt,
            basic_block: false,
            end_sequence: false,
        }
    }

    fn row(&self) -> LineEntry {
        LineEntry {
            address: self.address,
            line: self.line,
            file: self.file,
            column: self.column,
        }
    }

    fn emit(&mut self) -> LineEntry {
        self.basic_block = false;
        self.row()
    }

    /// Execute one instruction whose opcode byte has already been read.
    /// Returns the row it emitted, if any.
    pub fn execute(
        &mut self,
        opcode: u8,
        program: &mut ByteCursor<'_>,
        header: &LineProgramHeader,
        config: &DecoderConfig,
    ) -> Result<Option<LineEntry>, ParseError> {
        if opcode == DW_LNS_EXTENDED {
            self.execute_extended(program)?;
            return Ok(None);
        }

        // Opcodes 1-9 keep their standard meaning even when opcode_base
        // would place them in the special range.
        if let Some(standard) = DwLns::from_u8(opcode) {
            return self.execute_standard(standard, program, header, config);
        }

        if let Some((address_advance, line_advance)) = header.special_opcode_advance(opcode) {
            self.address = self.address.wrapping_add(address_advance);
            self.line = self.line.wrapping_add(line_advance);
            tracing::trace!(opcode, address = self.address, line = self.line, "special opcode");
            return Ok(Some(self.emit()));
        }

        // Standard opcode without fixed semantics here; skip its declared
        // ULEB128 operands.
        let operands = header
            .standard_opcode_lengths
            .get(usize::from(opcode) - 1)
            .copied()
            .unwrap_or(0);
        for _ in 0..operands {
            program.read_uleb128()?;
        }
        tracing::trace!(opcode, operands, "skipped standard opcode");
        Ok(None)
    }

    fn execute_standard(
        &mut self,
        opcode: DwLns,
        program: &mut ByteCursor<'_>,
        header: &LineProgramHeader,
        config: &DecoderConfig,
    ) -> Result<Option<LineEntry>, ParseError> {
        let min_inst = u64::from(header.minimum_instruction_length);
        match opcode {
            DwLns::Copy => return Ok(Some(self.emit())),
            DwLns::AdvancePc => {
                let operand = program.read_uleb128()?;
                self.address = self.address.wrapping_add(operand.wrapping_mul(min_inst));
            }
            DwLns::AdvanceLine => {
                let delta = program.read_sleb128()?;
                self.line = self.line.wrapping_add(delta);
            }
            DwLns::SetFile => self.file = program.read_uleb128()?,
            DwLns::SetColumn => self.column = program.read_uleb128()?,
            DwLns::NegateStmt => self.is_stmt = !self.is_stmt,
            DwLns::SetBasicBlock => self.basic_block = true,
            DwLns::ConstAddPc => match config.const_add_pc {
                ConstAddPc::Ignore => tracing::trace!("const_add_pc ignored"),
                ConstAddPc::Standard => {
                    self.address = self.address.wrapping_add(header.const_add_pc_advance());
                }
            },
            DwLns::FixedAdvancePc => {
                let operand = program.read_u16()?;
                self.address = self.address.wrapping_add(u64::from(operand));
            }
        }
        Ok(None)
    }

    fn execute_extended(&mut self, program: &mut ByteCursor<'_>) -> Result<(), ParseError> {
        let length = usize::try_from(program.read_uleb128()?)
            .map_err(|_| ParseError::Overflow { context: "extended opcode length" })?;
        if length == 0 {
            return Ok(());
        }

        let sub_opcode = program.read_u8()?;
        let operand_len = length - 1;
        let end = program
            .position()
            .checked_add(operand_len)
            .ok_or(ParseError::Overflow { context: "extended opcode" })?;

        match DwLne::from(sub_opcode) {
            DwLne::EndSequence => {
                self.end_sequence = true;
                tracing::trace!(address = self.address, "end_sequence");
            }
            DwLne::SetAddress => match operand_len {
                1 | 2 | 4 | 8 => {
                    self.address = program.read_address(operand_len)?;
                    tracing::trace!(address = self.address, "set_address");
                }
                other => tracing::warn!(size = other, "set_address operand size not supported"),
            },
            DwLne::DefineFile => tracing::debug!("define_file not applied to the file table"),
            DwLne::Unknown(op) => tracing::trace!(op, length, "unknown extended opcode"),
        }

        // The length prefix is authoritative for every extended opcode.
        program.seek(end)
    }
}

/// Run one sequence to its `end_sequence`, returning the emitted rows.
pub fn run_sequence(
    program: &mut ByteCursor<'_>,
    header: &LineProgramHeader,
    config: &DecoderConfig,
) -> Result<Vec<LineEntry>, ParseError> {
    let mut state = LineState::new(header.default_is_stmt);
    let mut entries = Vec::new();
    while !state.end_sequence {
        let opcode = program.read_u8()?;
        if let Some(entry) = state.execute(opcode, program, header, config)? {
            entries.push(entry);
        }
    }
    Ok(entries)
}

/// Output of decoding a whole `.debug_line` section.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LineSection {
    pub tables: Vec<LineTable>,
    pub warnings: Vec<DecodeWarning>,
}

/// Decodes `.debug_line` unit by unit.
#[derive(Debug, Clone, Default)]
pub struct LineProgramDecoder {
    config: DecoderConfig,
}

impl LineProgramDecoder {
    pub fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    /// Decode every unit in `data`. Failed units are reported in the
    /// result's warnings; tables from sequences that completed before a
    /// failure are kept.
    pub fn decode_section(&self, data: &[u8], endianness: Endianness) -> LineSection {
        let mut section = ByteCursor::new(data, endianness);
        let mut out = LineSection::default();
        tracing::debug!(length = data.len(), "decoding {}", DEBUG_LINE);

        while !section.is_at_end() {
            let unit_offset = section.position();
            let total_length = match section.read_u32() {
                Ok(len) => len,
                Err(e) => {
                    out.push_warning(unit_offset, WarningKind::TruncatedSection, &e);
                    break;
                }
            };
            if total_length == 0xFFFF_FFFF {
                let warning = DecodeWarning::new(
                    DEBUG_LINE,
                    unit_offset,
                    WarningKind::MalformedHeader,
                    "64-bit DWARF units are not supported",
                );
                warning.log();
                out.warnings.push(warning);
                break;
            }

            // A unit that claims more bytes than remain is decoded as far as
            // it goes; nothing can follow it.
            let claimed = total_length as usize;
            let truncated = claimed > section.remaining();
            let mut unit = match section.split_off(claimed.min(section.remaining())) {
                Ok(unit) => unit,
                Err(e) => {
                    out.push_warning(unit_offset, WarningKind::TruncatedSection, &e);
                    break;
                }
            };

            if let Err(e) = self.decode_unit(&mut unit, total_length, &mut out.tables) {
                out.push_warning(unit_offset, WarningKind::MalformedProgram, &e);
            } else if truncated {
                out.push_warning(
                    unit_offset,
                    WarningKind::TruncatedSection,
                    &ParseError::truncated(claimed, unit.len(), "line program unit"),
                );
            }
        }

        out
    }

    /// Decode one unit. `unit` covers exactly the bytes after `total_length`.
    fn decode_unit(
        &self,
        unit: &mut ByteCursor<'_>,
        total_length: u32,
        tables: &mut Vec<LineTable>,
    ) -> Result<(), ParseError> {
        let header = LineProgramHeader::parse(unit, total_length)?;
        let program_start = header.program_offset();

        tracing::debug!(
            total_length,
            version = header.version,
            prologue_length = header.prologue_length,
            line_base = header.line_base,
            line_range = header.line_range,
            opcode_base = header.opcode_base,
            "line program header"
        );

        let directories = read_directories(unit)?;
        let files = read_files(unit, &directories)?;

        if unit.position() != program_start {
            tracing::debug!(
                expected = program_start,
                actual = unit.position(),
                "realigning to prologue_length"
            );
            unit.seek(program_start).map_err(|_| {
                ParseError::invalid_structure(
                    "line program header",
                    program_start as u64,
                    "prologue_length points past the unit",
                )
            })?;
        }

        while !unit.is_at_end() {
            let entries = run_sequence(unit, &header, &self.config)?;
            match LineTable::new(directories.clone(), files.clone(), entries) {
                Some(table) => {
                    tracing::debug!(
                        file = table.primary_path(),
                        start = table.start_address(),
                        end = table.end_address(),
                        rows = table.entries().len(),
                        "line table"
                    );
                    tables.push(table);
                }
                None => tracing::debug!("dropping empty sequence"),
            }
        }
        Ok(())
    }
}

impl LineSection {
    fn push_warning(&mut self, offset: usize, fallback: WarningKind, error: &ParseError) {
        // Header problems surface as invalid-structure or version errors.
        let fallback = match error {
            ParseError::InvalidStructure { .. } | ParseError::UnsupportedVersion { .. } => {
                WarningKind::MalformedHeader
            }
            _ => fallback,
        };
        let warning = DecodeWarning::from_error(DEBUG_LINE, offset, fallback, error);
        warning.log();
        self.warnings.push(warning);
    }
}

fn read_string(cursor: &mut ByteCursor<'_>) -> Result<String, ParseError> {
    Ok(String::from_utf8_lossy(cursor.read_cstr()?).into_owned())
}

/// Read the include directory list, with the compilation directory
/// inserted at index 0.
fn read_directories(unit: &mut ByteCursor<'_>) -> Result<Vec<String>, ParseError> {
    let mut directories = vec![CURRENT_DIRECTORY.to_string()];
    loop {
        let dir = read_string(unit)?;
        if dir.is_empty() {
            return Ok(directories);
        }
        tracing::trace!(directory = %dir, "include directory");
        directories.push(dir);
    }
}

/// Read the file list, resolving each entry's path against `directories`.
fn read_files(unit: &mut ByteCursor<'_>, directories: &[String]) -> Result<Vec<SourceFile>, ParseError> {
    let mut files = Vec::new();
    loop {
        let offset = unit.position();
        let name = read_string(unit)?;
        if name.is_empty() {
            return Ok(files);
        }
        let directory_index = unit.read_uleb128()?;
        let mod_time = unit.read_uleb128()?;
        let size = unit.read_uleb128()?;

        let directory = usize::try_from(directory_index)
            .ok()
            .and_then(|i| directories.get(i))
            .ok_or_else(|| {
                ParseError::invalid_structure(
                    "file table",
                    offset as u64,
                    format!(
                        "directory index {} out of range ({} directories)",
                        directory_index,
                        directories.len()
                    ),
                )
            })?;

        let path = format!("{}/{}", directory, name);
        tracing::trace!(path = %path, size, "source file");
        files.push(SourceFile {
            name,
            directory_index,
            mod_time,
            size,
            path,
        });
    }
}
