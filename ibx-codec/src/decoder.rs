//! IBX1 decoder.
//!
//! Layout of a document:
//!
//! ```text
//! "IBX1"
//! String Table        VLQ(count) { VLQ(len) bytes 0x00 }*
//! Typed Value Table   VLQ(count) { discriminant payload? }*
//! encoding marker     1 byte
//! root element        0x00 VLQ(name) VLQ(#props) VLQ(#children) props children
//! ```
//!
//! A property is a tag byte naming the property (`0x80 + name` for names up
//! to `0x1F`, `0xA0 name:u8`, or `0xC0 name:u16be`) followed by a VLQ index
//! into the Typed Value Table.
//!
//! Input without the signature is not an error: [`decode`] reports
//! [`Parsed::Passthrough`] so the caller can copy it unchanged. Anything else
//! that goes wrong aborts the whole pass.

use tracing::{debug, trace};

use crate::cursor::ByteReader;
use crate::error::{CodecError, PassthroughReason, Result};
use crate::format::Parsed;
use crate::string_table::StringTable;
use crate::tree::{Document, Element, Property, MAX_DEPTH};
use crate::value_table::ValueTable;
use crate::vlq;

pub const SIGNATURE: &[u8; 4] = b"IBX1";

pub const PROPERTY_SHORT: u8 = 0x80;
pub const PROPERTY_SHORT_MAX_NAME: usize = 0x1F;
pub const PROPERTY_U8: u8 = 0xA0;
pub const PROPERTY_U16: u8 = 0xC0;

/// Whether `bytes` starts with the IBX1 signature.
pub fn has_signature(bytes: &[u8]) -> bool {
    bytes.starts_with(SIGNATURE)
}

/// Decode a complete IBX1 buffer.
pub fn decode(bytes: &[u8]) -> Result<Parsed> {
    match Decoder::new(bytes)? {
        Some(decoder) => decoder.read_document().map(Parsed::Document),
        None => Ok(Parsed::Passthrough(PassthroughReason::SignatureMismatch)),
    }
}

/// Decoder state for one buffer: the tables are read eagerly, the tree on
/// demand.
pub struct Decoder<'a> {
    reader: ByteReader<'a>,
    strings: StringTable,
    values: ValueTable,
    encoding: u8,
}

impl<'a> Decoder<'a> {
    /// Check the signature and read both tables and the encoding marker.
    ///
    /// Returns `None` when the signature does not match.
    pub fn new(bytes: &'a [u8]) -> Result<Option<Self>> {
        if !has_signature(bytes) {
            debug!(len = bytes.len(), "no IBX1 signature, passing through");
            return Ok(None);
        }
        let mut reader = ByteReader::new(bytes);
        reader.read_bytes(SIGNATURE.len())?;

        let strings = StringTable::read(&mut reader)?;
        debug!(count = strings.len(), "read string table");
        let values = ValueTable::read(&mut reader)?;
        debug!(count = values.len(), "read typed value table");
        // Resolve every string reference up front so a bad table fails the
        // pass even when no property points at the broken slot.
        for value in values.iter() {
            value.resolve(&strings)?;
        }
        let encoding = reader.read_u8()?;
        debug!(encoding = format_args!("{encoding:#04x}"), "encoding marker");

        Ok(Some(Self {
            reader,
            strings,
            values,
            encoding,
        }))
    }

    pub fn strings(&self) -> &StringTable {
        &self.strings
    }

    pub fn values(&self) -> &ValueTable {
        &self.values
    }

    pub fn encoding(&self) -> u8 {
        self.encoding
    }

    /// Read the root element and finish the pass.
    pub fn read_document(mut self) -> Result<Document> {
        let root = self.read_element(0)?;
        if self.reader.remaining() > 0 {
            debug!(
                trailing = self.reader.remaining(),
                "ignoring bytes after the root element"
            );
        }
        Ok(Document {
            encoding: self.encoding,
            root,
        })
    }

    fn read_element(&mut self, depth: usize) -> Result<Element> {
        if depth >= MAX_DEPTH {
            return Err(CodecError::NestingTooDeep { limit: MAX_DEPTH });
        }
        let offset = self.reader.position();
        let marker = self.reader.read_u8()?;
        if marker != 0 {
            return Err(CodecError::MalformedElement {
                offset,
                found: marker,
            });
        }
        let name_index = vlq::decode_usize(&mut self.reader)?;
        let name = self.strings.get(name_index)?.to_string();
        let property_count = vlq::decode_usize(&mut self.reader)?;
        let child_count = vlq::decode_usize(&mut self.reader)?;
        trace!(
            offset,
            depth,
            name = name.as_str(),
            name_index,
            properties = property_count,
            children = child_count,
            "element"
        );

        let mut element = Element::new(name);
        for _ in 0..property_count {
            element.properties.push(self.read_property(depth + 1)?);
        }
        for _ in 0..child_count {
            element.children.push(self.read_element(depth + 1)?);
        }
        Ok(element)
    }

    fn read_property(&mut self, depth: usize) -> Result<Property> {
        let offset = self.reader.position();
        let tag = self.reader.read_u8()?;
        let name_index = match tag {
            PROPERTY_U8 => usize::from(self.reader.read_u8()?),
            PROPERTY_U16 => usize::from(self.reader.read_u16_be()?),
            t if (PROPERTY_SHORT..PROPERTY_U8).contains(&t) => usize::from(t - PROPERTY_SHORT),
            t => return Err(CodecError::UnexpectedPropertyTag { offset, tag: t }),
        };
        let value_index = vlq::decode_usize(&mut self.reader)?;
        let name = self.strings.get(name_index)?.to_string();
        let value = self.values.get(value_index)?.resolve(&self.strings)?;
        trace!(
            offset,
            depth,
            name = name.as_str(),
            name_index,
            value_index,
            kind = value.type_name(),
            "property"
        );
        Ok(Property { name, value })
    }
}
