//! IBX1 encoder.
//!
//! Encoding runs in three steps, each following the reference producer so the
//! output matches it byte for byte:
//!
//! 1. walk the tree in enumeration order (element, child subtrees, then
//!    properties) and intern every name and string value;
//! 2. walk again in the same order and add every property value to the Typed
//!    Value Table, building an index-only copy of the tree;
//! 3. emit the header, both tables, the encoding marker and the indexed tree,
//!    writing each element's properties before its child elements.

use tracing::{debug, trace};

use crate::decoder::{
    PROPERTY_SHORT, PROPERTY_SHORT_MAX_NAME, PROPERTY_U16, PROPERTY_U8, SIGNATURE,
};
use crate::error::{CodecError, Result, Table};
use crate::string_table::StringTable;
use crate::tree::{Document, Element, Node};
use crate::value::{Scalar, TypedValue};
use crate::value_table::ValueTable;
use crate::vlq;

/// Encoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Reuse Typed Value Table slots for identical values.
    pub share: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self { share: true }
    }
}

/// Encode a document into IBX1 bytes.
pub fn encode(doc: &Document, options: &EncodeOptions) -> Result<Vec<u8>> {
    doc.root.check_depth()?;
    let mut encoder = Encoder::new(options);
    encoder.enumerate_strings(&doc.root);
    debug!(count = encoder.strings.len(), "built string table");
    let tree = encoder.index_element(&doc.root);
    debug!(
        count = encoder.values.len(),
        share = options.share,
        "built typed value table"
    );

    let mut out = Vec::new();
    out.extend_from_slice(SIGNATURE);
    encoder.strings.write(&mut out);
    encoder.values.write(&mut out)?;
    out.push(doc.encoding);
    write_element(&tree, &mut out)?;
    debug!(len = out.len(), "encoded document");
    Ok(out)
}

/// Tables under construction for one pass.
struct Encoder {
    strings: StringTable,
    values: ValueTable,
}

/// The tree with names and values replaced by table indices.
struct IndexedElement {
    name: usize,
    properties: Vec<IndexedProperty>,
    children: Vec<IndexedElement>,
}

struct IndexedProperty {
    name: usize,
    value: usize,
}

impl Encoder {
    fn new(options: &EncodeOptions) -> Self {
        Self {
            strings: StringTable::new(),
            values: ValueTable::new(options.share),
        }
    }

    fn enumerate_strings(&mut self, root: &Element) {
        for node in root.walk() {
            match node {
                Node::Element(element) => {
                    self.strings.intern(&element.name);
                }
                Node::Property(property) => {
                    self.strings.intern(&property.name);
                    if let Scalar::String(value) = &property.value {
                        self.strings.intern(value);
                    }
                }
            }
        }
    }

    fn index_element(&mut self, element: &Element) -> IndexedElement {
        let name = self.strings.intern(&element.name);
        let children = element
            .children
            .iter()
            .map(|child| self.index_element(child))
            .collect();
        let properties = element
            .properties
            .iter()
            .map(|property| IndexedProperty {
                name: self.strings.intern(&property.name),
                value: self
                    .values
                    .add(TypedValue::from_scalar(&property.value, &mut self.strings)),
            })
            .collect();
        IndexedElement {
            name,
            properties,
            children,
        }
    }
}

fn write_element(element: &IndexedElement, out: &mut Vec<u8>) -> Result<()> {
    trace!(
        offset = out.len(),
        name_index = element.name,
        properties = element.properties.len(),
        children = element.children.len(),
        "element"
    );
    out.push(0);
    vlq::encode(element.name as u32, out);
    vlq::encode(element.properties.len() as u32, out);
    vlq::encode(element.children.len() as u32, out);
    for property in &element.properties {
        write_property(property, out)?;
    }
    for child in &element.children {
        write_element(child, out)?;
    }
    Ok(())
}

fn write_property(property: &IndexedProperty, out: &mut Vec<u8>) -> Result<()> {
    trace!(
        offset = out.len(),
        name_index = property.name,
        value_index = property.value,
        "property"
    );
    match property.name {
        name if name <= PROPERTY_SHORT_MAX_NAME => out.push(PROPERTY_SHORT + name as u8),
        name if name <= 0xFF => out.extend_from_slice(&[PROPERTY_U8, name as u8]),
        name => {
            let name = u16::try_from(name).map_err(|_| CodecError::IndexOutOfRange {
                table: Table::Strings,
                index: name,
                len: usize::from(u16::MAX) + 1,
            })?;
            out.push(PROPERTY_U16);
            out.extend_from_slice(&name.to_be_bytes());
        }
    }
    vlq::encode(property.value as u32, out);
    Ok(())
}
