//! Bounded byte cursor over one section's raw bytes.
//!
//! Every read is bounds-checked and reports [`ParseError::TruncatedData`]
//! instead of panicking, so a corrupt length field in the input can at worst
//! fail the unit being decoded.

use crate::dwarf::{decode_sleb128, decode_uleb128};
use crate::ParseError;
use dwarfline_core::Endianness;

/// Sequential and random-access reader over a byte slice.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    position: usize,
    endianness: Endianness,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor positioned at the start of `data`.
    pub fn new(data: &'a [u8], endianness: Endianness) -> Self {
        Self {
            data,
            position: 0,
            endianness,
        }
    }

    /// Total length of the underlying data.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the underlying data is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current read position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes left after the current position.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Returns true once every byte has been consumed.
    pub fn is_at_end(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Byte order used for multi-byte reads.
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Rewind to the start.
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Move to an absolute position (the end itself is a valid target).
    pub fn seek(&mut self, position: usize) -> Result<(), ParseError> {
        if position > self.data.len() {
            return Err(ParseError::truncated(position, self.data.len(), "seek target"));
        }
        self.position = position;
        Ok(())
    }

    /// Advance by `count` bytes.
    pub fn skip(&mut self, count: usize) -> Result<(), ParseError> {
        let target = self
            .position
            .checked_add(count)
            .ok_or(ParseError::Overflow { context: "skip" })?;
        self.seek(target)
    }

    /// Split off the next `len` bytes as an independent cursor and advance
    /// past them. The new cursor starts at position 0.
    pub fn split_off(&mut self, len: usize) -> Result<ByteCursor<'a>, ParseError> {
        let bytes = self.bytes_at(self.position, len, "sub-range")?;
        self.position += len;
        Ok(ByteCursor::new(bytes, self.endianness))
    }

    fn bytes_at(&self, offset: usize, len: usize, context: &'static str) -> Result<&'a [u8], ParseError> {
        let end = offset
            .checked_add(len)
            .ok_or(ParseError::Overflow { context })?;
        if end > self.data.len() {
            return Err(ParseError::truncated(end, self.data.len(), context));
        }
        Ok(&self.data[offset..end])
    }

    /// Read a byte at an explicit offset.
    pub fn read_u8_at(&self, offset: usize) -> Result<u8, ParseError> {
        Ok(self.bytes_at(offset, 1, "u8")?[0])
    }

    /// Read a 16-bit value at an explicit offset.
    pub fn read_u16_at(&self, offset: usize) -> Result<u16, ParseError> {
        let b = self.bytes_at(offset, 2, "u16")?;
        let bytes = [b[0], b[1]];
        Ok(match self.endianness {
            Endianness::Little => u16::from_le_bytes(bytes),
            Endianness::Big => u16::from_be_bytes(bytes),
        })
    }

    /// Read a 32-bit value at an explicit offset.
    pub fn read_u32_at(&self, offset: usize) -> Result<u32, ParseError> {
        let b = self.bytes_at(offset, 4, "u32")?;
        let bytes = [b[0], b[1], b[2], b[3]];
        Ok(match self.endianness {
            Endianness::Little => u32::from_le_bytes(bytes),
            Endianness::Big => u32::from_be_bytes(bytes),
        })
    }

    /// Read a 64-bit value at an explicit offset.
    pub fn read_u64_at(&self, offset: usize) -> Result<u64, ParseError> {
        let b = self.bytes_at(offset, 8, "u64")?;
        let bytes = [b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]];
        Ok(match self.endianness {
            Endianness::Little => u64::from_le_bytes(bytes),
            Endianness::Big => u64::from_be_bytes(bytes),
        })
    }

    /// Read a byte and advance.
    pub fn read_u8(&mut self) -> Result<u8, ParseError> {
        let value = self.read_u8_at(self.position)?;
        self.position += 1;
        Ok(value)
    }

    /// Read a 16-bit value and advance.
    pub fn read_u16(&mut self) -> Result<u16, ParseError> {
        let value = self.read_u16_at(self.position)?;
        self.position += 2;
        Ok(value)
    }

    /// Read a 32-bit value and advance.
    pub fn read_u32(&mut self) -> Result<u32, ParseError> {
        let value = self.read_u32_at(self.position)?;
        self.position += 4;
        Ok(value)
    }

    /// Read a 64-bit value and advance.
    pub fn read_u64(&mut self) -> Result<u64, ParseError> {
        let value = self.read_u64_at(self.position)?;
        self.position += 8;
        Ok(value)
    }

    /// Read an unsigned value of `size` bytes (1, 2, 4 or 8) and advance.
    pub fn read_address(&mut self, size: usize) -> Result<u64, ParseError> {
        match size {
            1 => self.read_u8().map(u64::from),
            2 => self.read_u16().map(u64::from),
            4 => self.read_u32().map(u64::from),
            8 => self.read_u64(),
            _ => Err(ParseError::InvalidValue("unsupported address size")),
        }
    }

    /// Read an unsigned LEB128 value and advance.
    pub fn read_uleb128(&mut self) -> Result<u64, ParseError> {
        let rest = self.data.get(self.position..).unwrap_or(&[]);
        let (value, consumed) = decode_uleb128(rest)?;
        self.position += consumed;
        Ok(value)
    }

    /// Read a signed LEB128 value and advance.
    pub fn read_sleb128(&mut self) -> Result<i64, ParseError> {
        let rest = self.data.get(self.position..).unwrap_or(&[]);
        let (value, consumed) = decode_sleb128(rest)?;
        self.position += consumed;
        Ok(value)
    }

    /// Read a NUL-terminated byte string and advance past the terminator.
    /// The terminator is not included in the result.
    pub fn read_cstr(&mut self) -> Result<&'a [u8], ParseError> {
        let rest = self.data.get(self.position..).unwrap_or(&[]);
        let len = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| ParseError::truncated(self.data.len() + 1, self.data.len(), "string"))?;
        self.position += len + 1;
        Ok(&rest[..len])
    }
}
