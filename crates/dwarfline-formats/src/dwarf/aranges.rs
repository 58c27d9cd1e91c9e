//! Address range table parsing (`.debug_aranges`).
//!
//! The section is read by explicit offset: each set starts with a fixed
//! 12-byte header, and the width of the tuples that follow depends on the
//! header's address size. Only 2-byte addresses (MSP430) are decoded; sets
//! with any other address size are kept with no ranges.

use dwarfline_core::Endianness;

use super::warning::{DecodeWarning, WarningKind};
use super::DEBUG_ARANGES;
use crate::cursor::ByteCursor;
use crate::ParseError;

/// Size of the fixed set header.
pub const ARANGE_HEADER_SIZE: usize = 12;

/// The fixed header of one address range set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArangeHeader {
    /// Set length, excluding the 4-byte length field.
    pub length: u32,
    pub version: u16,
    /// Offset of the owning compilation unit in `.debug_info`.
    pub debug_info_offset: u32,
    pub address_size: u8,
    pub segment_size: u8,
}

impl ArangeHeader {
    /// Read a header at `offset`.
    pub fn read_at(cursor: &ByteCursor<'_>, offset: usize) -> Result<Self, ParseError> {
        Ok(Self {
            length: cursor.read_u32_at(offset)?,
            version: cursor.read_u16_at(offset + 4)?,
            debug_info_offset: cursor.read_u32_at(offset + 6)?,
            address_size: cursor.read_u8_at(offset + 10)?,
            segment_size: cursor.read_u8_at(offset + 11)?,
        })
    }
}

/// One covered range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressRange {
    pub address: u64,
    pub length: u64,
}

impl AddressRange {
    /// One past the last covered address.
    pub fn end(&self) -> u64 {
        self.address.saturating_add(self.length)
    }
}

/// A header and the ranges that follow it (the (0,0) terminator excluded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArangeSet {
    /// Offset of the set within the section.
    pub offset: usize,
    pub header: ArangeHeader,
    pub ranges: Vec<AddressRange>,
}

/// Output of decoding a whole `.debug_aranges` section.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ArangesSection {
    pub sets: Vec<ArangeSet>,
    pub warnings: Vec<DecodeWarning>,
}

/// Decode every set in `data`.
pub fn decode_aranges(data: &[u8], endianness: Endianness) -> ArangesSection {
    let cursor = ByteCursor::new(data, endianness);
    let mut out = ArangesSection::default();
    let mut pos = 0;
    tracing::debug!(length = data.len(), "decoding {}", DEBUG_ARANGES);

    while pos < cursor.len() {
        let set_offset = pos;
        match read_set(&cursor, &mut pos) {
            Ok(set) => {
                if set.header.address_size != 2 {
                    let warning = DecodeWarning::new(
                        DEBUG_ARANGES,
                        set_offset,
                        WarningKind::UnsupportedAddressSize,
                        format!("address size {} not decoded", set.header.address_size),
                    );
                    warning.log();
                    out.warnings.push(warning);
                }
                tracing::debug!(
                    offset = set_offset,
                    length = set.header.length,
                    version = set.header.version,
                    debug_info_offset = set.header.debug_info_offset,
                    address_size = set.header.address_size,
                    ranges = set.ranges.len(),
                    "arange set"
                );
                out.sets.push(set);
            }
            Err(e) => {
                let warning =
                    DecodeWarning::from_error(DEBUG_ARANGES, set_offset, WarningKind::MalformedHeader, &e);
                warning.log();
                out.warnings.push(warning);
                break;
            }
        }
    }

    out
}

/// Read one set starting at `*pos`, leaving `*pos` at the next set.
fn read_set(cursor: &ByteCursor<'_>, pos: &mut usize) -> Result<ArangeSet, ParseError> {
    let offset = *pos;
    let header = ArangeHeader::read_at(cursor, offset)?;
    *pos += ARANGE_HEADER_SIZE;

    let mut ranges = Vec::new();
    if header.address_size == 2 {
        loop {
            let address = cursor.read_u16_at(*pos)?;
            let length = cursor.read_u16_at(*pos + 2)?;
            *pos += 4;
            if address == 0 && length == 0 {
                break;
            }
            tracing::trace!(address, length, "address range");
            ranges.push(AddressRange {
                address: u64::from(address),
                length: u64::from(length),
            });
        }
    } else {
        // Tuples were not read, so the declared length is the only way to
        // find the next set.
        let set_end = offset.saturating_add(4).saturating_add(header.length as usize);
        *pos = (*pos).max(set_end);
    }

    Ok(ArangeSet {
        offset,
        header,
        ranges,
    })
}
