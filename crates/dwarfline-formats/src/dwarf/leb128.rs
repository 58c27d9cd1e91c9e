//! LEB128 (Little Endian Base 128) decoding.
//!
//! Seven payload bits per byte, least significant group first; a set high bit
//! means another byte follows. Both decoders return the value together with
//! the number of bytes consumed.

use crate::ParseError;

/// Decode an unsigned LEB128 value from the start of `data`.
pub fn decode_uleb128(data: &[u8]) -> Result<(u64, usize), ParseError> {
    let mut result: u64 = 0;
    let mut shift: u32 = 0;

    for (index, &byte) in data.iter().enumerate() {
        let low_bits = u64::from(byte & 0x7F);
        if shift >= 64 || (shift == 63 && low_bits > 1) {
            return Err(ParseError::InvalidValue("ULEB128 overflow"));
        }
        result |= low_bits << shift;
        shift += 7;

        if byte & 0x80 == 0 {
            return Ok((result, index + 1));
        }
    }

    Err(ParseError::truncated(data.len() + 1, data.len(), "ULEB128 value"))
}

/// Decode a signed LEB128 value from the start of `data`, sign-extending from
/// bit 6 of the final byte.
pub fn decode_sleb128(data: &[u8]) -> Result<(i64, usize), ParseError> {
    let mut result: i64 = 0;
    let mut shift: u32 = 0;

    for (index, &byte) in data.iter().enumerate() {
        if shift >= 64 {
            return Err(ParseError::InvalidValue("SLEB128 overflow"));
        }
        result |= i64::from(byte & 0x7F) << shift;
        shift += 7;

        if byte & 0x80 == 0 {
            if shift < 64 && byte & 0x40 != 0 {
                result |= !0i64 << shift;
            }
            return Ok((result, index + 1));
        }
    }

    Err(ParseError::truncated(data.len() + 1, data.len(), "SLEB128 value"))
}
