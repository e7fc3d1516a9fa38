//! Tag-byte variable-length quantities.
//!
//! Counts, string lengths and table indices are written as:
//!
//! | first byte | payload                   | range              |
//! |------------|---------------------------|--------------------|
//! | `0x00..`   | the byte itself           | `0 ..= 0x3F`       |
//! | `0x40`     | 1 byte                    | `.. 0x100`         |
//! | `0x80`     | 2 bytes, big-endian       | `.. 0x1_0000`      |
//! | `0xC0`     | 4 bytes, big-endian       | `.. 0x1_0000_0000` |
//!
//! The encoder always picks the narrowest row. The decoder treats every byte
//! that is not one of the three tags as a literal.

use crate::cursor::ByteReader;
use crate::error::Result;

pub const TAG_U8: u8 = 0x40;
pub const TAG_U16: u8 = 0x80;
pub const TAG_U32: u8 = 0xC0;

/// Append the narrowest encoding of `value` to `out`.
pub fn encode(value: u32, out: &mut Vec<u8>) {
    if value < 0x40 {
        out.push(value as u8);
    } else if value < 0x100 {
        out.extend_from_slice(&[TAG_U8, value as u8]);
    } else if value < 0x1_0000 {
        out.push(TAG_U16);
        out.extend_from_slice(&(value as u16).to_be_bytes());
    } else {
        out.push(TAG_U32);
        out.extend_from_slice(&value.to_be_bytes());
    }
}

/// Number of bytes [`encode`] writes for `value`.
pub fn encoded_len(value: u32) -> usize {
    match value {
        0..=0x3F => 1,
        0x40..=0xFF => 2,
        0x100..=0xFFFF => 3,
        _ => 5,
    }
}

pub fn decode(reader: &mut ByteReader<'_>) -> Result<u32> {
    match reader.read_u8()? {
        TAG_U8 => reader.read_u8().map(u32::from),
        TAG_U16 => reader.read_u16_be().map(u32::from),
        TAG_U32 => reader.read_u32_be(),
        literal => Ok(u32::from(literal)),
    }
}

/// Decode a VLQ that is used as a table index or count.
pub fn decode_usize(reader: &mut ByteReader<'_>) -> Result<usize> {
    decode(reader).map(|v| v as usize)
}
