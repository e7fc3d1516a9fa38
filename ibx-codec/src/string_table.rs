//! String Table.
//!
//! Element names, property names and string property values are stored once
//! and referenced by index. Indices follow first insertion and are never
//! renumbered during a pass.
//!
//! Wire form: `VLQ(count)` then, per entry, `VLQ(byte length)`, the UTF-8
//! bytes and a `0x00` terminator.
//!
//! Tables read from foreign files may repeat a string; every slot stays
//! addressable and lookups resolve to the first occurrence.

use std::collections::HashMap;

use tracing::trace;

use crate::cursor::ByteReader;
use crate::error::{CodecError, Result, Table};
use crate::vlq;

#[derive(Debug, Clone, Default)]
pub struct StringTable {
    entries: Vec<String>,
    lookup: HashMap<String, usize>,
}

impl StringTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `value`, appending it when first seen.
    pub fn intern(&mut self, value: &str) -> usize {
        if let Some(&index) = self.lookup.get(value) {
            return index;
        }
        let index = self.push(value);
        trace!(index, len = value.len(), value, "string");
        index
    }

    /// Index of a string that has already been interned.
    pub fn index_of(&self, value: &str) -> Option<usize> {
        self.lookup.get(value).copied()
    }

    pub fn get(&self, index: usize) -> Result<&str> {
        self.entries
            .get(index)
            .map(String::as_str)
            .ok_or(CodecError::IndexOutOfRange {
                table: Table::Strings,
                index,
                len: self.entries.len(),
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn read(reader: &mut ByteReader<'_>) -> Result<Self> {
        let count = vlq::decode_usize(reader)?;
        let mut table = Self::new();
        for index in 0..count {
            let len = vlq::decode_usize(reader)?;
            let offset = reader.position();
            let bytes = reader.read_bytes(len)?;
            let value =
                std::str::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8 { offset })?;
            let terminator = reader.read_u8()?;
            if terminator != 0 {
                trace!(index, terminator, "string entry without zero terminator");
            }
            trace!(index, len, value, "string");
            table.push(value);
        }
        Ok(table)
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        vlq::encode(self.entries.len() as u32, out);
        for value in &self.entries {
            vlq::encode(value.len() as u32, out);
            out.extend_from_slice(value.as_bytes());
            out.push(0);
        }
    }

    fn push(&mut self, value: &str) -> usize {
        let index = self.entries.len();
        self.entries.push(value.to_string());
        self.lookup.entry(value.to_string()).or_insert(index);
        index
    }
}

impl PartialEq for StringTable {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for StringTable {}
