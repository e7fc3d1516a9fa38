//! Scalar values and their typed-value wire form.
//!
//! A [`Scalar`] is what a property carries in the document tree: a resolved
//! integer, float, boolean or string. A [`TypedValue`] is the same value as it
//! sits in the Typed Value Table, with strings replaced by String Table
//! indices. The discriminant byte selects both the kind and the payload width:
//!
//! | kind             | discriminant    | payload              |
//! |------------------|-----------------|----------------------|
//! | int8 `0..=15`    | the value       | none                 |
//! | int8             | `0x10`          | 1 byte               |
//! | int16            | `0x20`          | 2 bytes LE           |
//! | int32            | `0x30`          | 4 bytes LE           |
//! | bool             | `0x40` / `0x41` | none                 |
//! | float            | `0xB0`          | 4 bytes LE IEEE-754  |
//! | string `< 16`    | `0xC0 + index`  | none                 |
//! | string `< 256`   | `0xD0`          | 1 byte               |
//! | string `< 65536` | `0xE0`          | 2 bytes BE           |
//!
//! Any other discriminant decodes as [`TypedValue::Unknown`] and occupies
//! exactly one byte.

use std::fmt;

use serde::Serialize;

use crate::cursor::ByteReader;
use crate::error::{CodecError, Result, Table};
use crate::string_table::StringTable;

pub const INT8: u8 = 0x10;
pub const INT16: u8 = 0x20;
pub const INT32: u8 = 0x30;
pub const BOOL_FALSE: u8 = 0x40;
pub const BOOL_TRUE: u8 = 0x41;
pub const FLOAT: u8 = 0xB0;
pub const STRING_INLINE: u8 = 0xC0;
pub const STRING_U8: u8 = 0xD0;
pub const STRING_U16: u8 = 0xE0;

/// Type name used for values whose discriminant has no known mapping.
pub const UNKNOWN_TYPE: &str = "__unknown__";

/// A property value as it appears in the document tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum Scalar {
    #[serde(rename = "int8")]
    Int8(i8),
    #[serde(rename = "int16")]
    Int16(i16),
    #[serde(rename = "int32")]
    Int32(i32),
    #[serde(rename = "float")]
    Float(f32),
    #[serde(rename = "bool")]
    Bool(bool),
    #[serde(rename = "string")]
    String(String),
    /// Raw discriminant byte of a value the format does not describe.
    #[serde(rename = "__unknown__")]
    Unknown(u8),
}

impl Scalar {
    /// Type name written to the `type` attribute of the textual form.
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Int8(_) => "int8",
            Scalar::Int16(_) => "int16",
            Scalar::Int32(_) => "int32",
            Scalar::Float(_) => "float",
            Scalar::Bool(_) => "bool",
            Scalar::String(_) => "string",
            Scalar::Unknown(_) => UNKNOWN_TYPE,
        }
    }

    /// Build a scalar from a declared type and its textual literal.
    ///
    /// Integer types accept signed decimal (unsigned for the `uint*` aliases)
    /// or hexadecimal with an optional `0x` prefix. Hex literals are taken as
    /// the unsigned bit pattern of the width, so `0xFF` as `int8` is `-1`.
    pub fn parse(declared: &str, literal: &str) -> Result<Scalar> {
        let invalid = || CodecError::InvalidValue {
            ty: declared.to_string(),
            value: literal.to_string(),
        };
        match declared {
            "byte" | "int8" | "uint8" => parse_integer(literal, 8, declared == "uint8")
                .map(|v| Scalar::Int8(v as i8))
                .ok_or_else(invalid),
            "short" | "int16" | "uint16" => parse_integer(literal, 16, declared == "uint16")
                .map(|v| Scalar::Int16(v as i16))
                .ok_or_else(invalid),
            "int" | "int32" | "uint32" => parse_integer(literal, 32, declared == "uint32")
                .map(|v| Scalar::Int32(v as i32))
                .ok_or_else(invalid),
            "float" => literal
                .trim()
                .parse::<f32>()
                .map(Scalar::Float)
                .map_err(|_| invalid()),
            "bool" => Ok(Scalar::Bool(literal.trim().eq_ignore_ascii_case("true"))),
            "string" => Ok(Scalar::String(literal.to_string())),
            other => Err(CodecError::UnsupportedPropertyType(other.to_string())),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int8(v) => write!(f, "{v}"),
            Scalar::Int16(v) => write!(f, "{v}"),
            Scalar::Int32(v) => write!(f, "{v}"),
            // Debug keeps a fractional part ("1.0") and round-trips exactly.
            Scalar::Float(v) => write!(f, "{v:?}"),
            Scalar::Bool(v) => write!(f, "{v}"),
            Scalar::String(v) => f.write_str(v),
            Scalar::Unknown(byte) => write!(f, "{byte:#04x}"),
        }
    }
}

/// Parse an integer literal into the bit pattern of a `bits`-wide integer.
///
/// Returns the value sign-extended into an `i64` for signed decimals and
/// zero-extended for unsigned decimals and hex; callers truncate with `as`.
fn parse_integer(literal: &str, bits: u32, unsigned: bool) -> Option<i64> {
    let literal = literal.trim();
    let max_unsigned = (1u64 << bits) - 1;
    if unsigned {
        if let Ok(v) = literal.parse::<u64>() {
            return (v <= max_unsigned).then_some(v as i64);
        }
    } else if let Ok(v) = literal.parse::<i64>() {
        let min = -(1i64 << (bits - 1));
        let max = (1i64 << (bits - 1)) - 1;
        return (min..=max).contains(&v).then_some(v);
    }
    let digits = literal
        .strip_prefix("0x")
        .or_else(|| literal.strip_prefix("0X"))
        .unwrap_or(literal);
    u64::from_str_radix(digits, 16)
        .ok()
        .filter(|v| *v <= max_unsigned)
        .map(|v| v as i64)
}

/// A Typed Value Table entry.
///
/// Equality and hashing follow the wire bytes: two entries are equal exactly
/// when they encode to the same discriminant and payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypedValue {
    Int8(i8),
    Int16(i16),
    Int32(i32),
    /// IEEE-754 bit pattern.
    Float(u32),
    Bool(bool),
    StringRef(usize),
    Unknown(u8),
}

impl TypedValue {
    /// Convert a tree scalar. String values are looked up in (or, if the
    /// enumeration pass missed them, appended to) the String Table.
    pub fn from_scalar(scalar: &Scalar, strings: &mut StringTable) -> TypedValue {
        match scalar {
            Scalar::Int8(v) => TypedValue::Int8(*v),
            Scalar::Int16(v) => TypedValue::Int16(*v),
            Scalar::Int32(v) => TypedValue::Int32(*v),
            Scalar::Float(v) => TypedValue::Float(v.to_bits()),
            Scalar::Bool(v) => TypedValue::Bool(*v),
            Scalar::String(s) => TypedValue::StringRef(strings.intern(s)),
            Scalar::Unknown(byte) => TypedValue::Unknown(*byte),
        }
    }

    /// Resolve string references into a tree scalar.
    pub fn resolve(&self, strings: &StringTable) -> Result<Scalar> {
        Ok(match *self {
            TypedValue::Int8(v) => Scalar::Int8(v),
            TypedValue::Int16(v) => Scalar::Int16(v),
            TypedValue::Int32(v) => Scalar::Int32(v),
            TypedValue::Float(bits) => Scalar::Float(f32::from_bits(bits)),
            TypedValue::Bool(v) => Scalar::Bool(v),
            TypedValue::StringRef(index) => Scalar::String(strings.get(index)?.to_string()),
            TypedValue::Unknown(byte) => Scalar::Unknown(byte),
        })
    }

    pub fn discriminant(&self) -> u8 {
        match *self {
            TypedValue::Int8(v) if (0..0x10).contains(&v) => v as u8,
            TypedValue::Int8(_) => INT8,
            TypedValue::Int16(_) => INT16,
            TypedValue::Int32(_) => INT32,
            TypedValue::Float(_) => FLOAT,
            TypedValue::Bool(false) => BOOL_FALSE,
            TypedValue::Bool(true) => BOOL_TRUE,
            TypedValue::StringRef(index) if index < 0x10 => STRING_INLINE + index as u8,
            TypedValue::StringRef(index) if index < 0x100 => STRING_U8,
            TypedValue::StringRef(_) => STRING_U16,
            TypedValue::Unknown(byte) => byte,
        }
    }

    /// Append discriminant and payload.
    pub fn write(&self, out: &mut Vec<u8>) -> Result<()> {
        out.push(self.discriminant());
        match *self {
            TypedValue::Int8(v) if !(0..0x10).contains(&v) => out.push(v as u8),
            TypedValue::Int16(v) => out.extend_from_slice(&v.to_le_bytes()),
            TypedValue::Int32(v) => out.extend_from_slice(&v.to_le_bytes()),
            TypedValue::Float(bits) => out.extend_from_slice(&bits.to_le_bytes()),
            TypedValue::StringRef(index) if index < 0x10 => {}
            TypedValue::StringRef(index) if index < 0x100 => out.push(index as u8),
            TypedValue::StringRef(index) => {
                let index = u16::try_from(index).map_err(|_| CodecError::IndexOutOfRange {
                    table: Table::Strings,
                    index,
                    len: usize::from(u16::MAX) + 1,
                })?;
                out.extend_from_slice(&index.to_be_bytes());
            }
            _ => {}
        }
        Ok(())
    }

    pub fn read(reader: &mut ByteReader<'_>) -> Result<TypedValue> {
        let tag = reader.read_u8()?;
        Ok(match tag {
            0x00..=0x0F => TypedValue::Int8(tag as i8),
            INT8 => TypedValue::Int8(reader.read_u8()? as i8),
            INT16 => TypedValue::Int16(i16::from_le_bytes(reader.read_array()?)),
            INT32 => TypedValue::Int32(i32::from_le_bytes(reader.read_array()?)),
            FLOAT => TypedValue::Float(u32::from_le_bytes(reader.read_array()?)),
            BOOL_FALSE => TypedValue::Bool(false),
            BOOL_TRUE => TypedValue::Bool(true),
            0xC0..=0xCF => TypedValue::StringRef(usize::from(tag - STRING_INLINE)),
            STRING_U8 => TypedValue::StringRef(usize::from(reader.read_u8()?)),
            STRING_U16 => TypedValue::StringRef(usize::from(reader.read_u16_be()?)),
            other => TypedValue::Unknown(other),
        })
    }

    /// Whether `byte` selects one of the described kinds.
    pub fn is_known_discriminant(byte: u8) -> bool {
        matches!(
            byte,
            0x00..=INT8 | INT16 | INT32 | BOOL_FALSE | BOOL_TRUE | FLOAT | 0xC0..=STRING_U8 | STRING_U16
        )
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            TypedValue::Int8(_) => "int8",
            TypedValue::Int16(_) => "int16",
            TypedValue::Int32(_) => "int32",
            TypedValue::Float(_) => "float",
            TypedValue::Bool(_) => "bool",
            TypedValue::StringRef(_) => "string",
            TypedValue::Unknown(_) => UNKNOWN_TYPE,
        }
    }
}
