//! Typed Value Table.
//!
//! Property values are pooled here and referenced by index from the tree.
//! In share mode an entry whose discriminant and payload match an existing
//! slot reuses that slot; with sharing off every occurrence gets its own.
//!
//! Wire form: `VLQ(count)` then each entry's discriminant and payload.

use std::collections::HashMap;

use tracing::trace;

use crate::cursor::ByteReader;
use crate::error::{CodecError, Result, Table};
use crate::value::TypedValue;
use crate::vlq;

#[derive(Debug, Clone)]
pub struct ValueTable {
    entries: Vec<TypedValue>,
    lookup: HashMap<TypedValue, usize>,
    share: bool,
}

impl ValueTable {
    pub fn new(share: bool) -> Self {
        Self {
            entries: Vec::new(),
            lookup: HashMap::new(),
            share,
        }
    }

    pub fn is_shared(&self) -> bool {
        self.share
    }

    /// Slot index for `value`, appending a new slot unless sharing finds one.
    pub fn add(&mut self, value: TypedValue) -> usize {
        if self.share {
            if let Some(&index) = self.lookup.get(&value) {
                return index;
            }
        }
        let index = self.entries.len();
        self.entries.push(value);
        self.lookup.entry(value).or_insert(index);
        trace!(
            index,
            discriminant = format_args!("{:#04x}", value.discriminant()),
            kind = value.type_name(),
            "typed value"
        );
        index
    }

    pub fn get(&self, index: usize) -> Result<&TypedValue> {
        self.entries.get(index).ok_or(CodecError::IndexOutOfRange {
            table: Table::TypedValues,
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

    pub fn iter(&self) -> impl Iterator<Item = &TypedValue> {
        self.entries.iter()
    }

    /// Read a table. The result never shares: slots mirror the input.
    pub fn read(reader: &mut ByteReader<'_>) -> Result<Self> {
        let count = vlq::decode_usize(reader)?;
        let mut table = Self::new(false);
        for _ in 0..count {
            table.add(TypedValue::read(reader)?);
        }
        Ok(table)
    }

    pub fn write(&self, out: &mut Vec<u8>) -> Result<()> {
        vlq::encode(self.entries.len() as u32, out);
        for value in &self.entries {
            value.write(out)?;
        }
        Ok(())
    }
}

impl Default for ValueTable {
    fn default() -> Self {
        Self::new(true)
    }
}
