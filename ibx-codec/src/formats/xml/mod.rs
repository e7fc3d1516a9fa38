//! XML rendering of IBX1 documents
//!
//! Every element becomes a tag of the same name. Properties become
//! `<property name=".." type=".." value=".."/>` children written ahead of the
//! element children:
//!
//! ```text
//! <?xml version="1.0" ?>
//! <level>
//!   <property name="width" type="int16" value="640"/>
//!   <spawn>
//!     <property name="x" type="float" value="1.5"/>
//!   </spawn>
//! </level>
//! ```
//!
//! Documents that do not follow this shape are reported as passthrough by the
//! parser rather than rejected.

use crate::error::FormatError;
use crate::format::{Format, FormatOptions, Parsed, SerializedDocument};
use crate::tree::{Document, DEFAULT_ENCODING};

pub mod parser;
pub mod serializer;

/// Tag name reserved for properties.
pub const PROPERTY_TAG: &str = "property";
/// Attribute carrying the raw discriminant of an `__unknown__` property.
pub const TBYTE_ATTR: &str = "__tbyte";

/// Settings for the XML side of the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XmlOptions {
    /// Render int8 values as `0xNN`.
    pub hex8: bool,
    /// Render int16 values as `0xNNNN`.
    pub hex16: bool,
    /// Render int32 values as `0xNNNNNNNN`.
    pub hex32: bool,
    /// Encoding marker stamped on documents parsed from XML.
    pub encoding_marker: u8,
}

impl Default for XmlOptions {
    fn default() -> Self {
        Self {
            hex8: false,
            hex16: false,
            hex32: false,
            encoding_marker: DEFAULT_ENCODING,
        }
    }
}

pub struct XmlFormat;

impl Format for XmlFormat {
    fn name(&self) -> &str {
        "xml"
    }

    fn description(&self) -> &str {
        "XML element/property rendering"
    }

    fn file_extensions(&self) -> &[&str] {
        &["xml"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &[u8], options: &FormatOptions) -> Result<Parsed, FormatError> {
        let parsed = parser::parse_bytes(source)?;
        Ok(match parsed {
            Parsed::Document(mut doc) => {
                doc.encoding = options.xml.encoding_marker;
                Parsed::Document(doc)
            }
            passthrough => passthrough,
        })
    }

    fn serialize(
        &self,
        doc: &Document,
        options: &FormatOptions,
    ) -> Result<SerializedDocument, FormatError> {
        Ok(SerializedDocument::Text(serializer::serialize_document(
            doc,
            &options.xml,
        )?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Element;
    use crate::value::Scalar;

    #[test]
    fn serialize_then_parse_restores_the_tree() {
        let doc = Document::new(
            Element::new("level")
                .with_property("name", Scalar::String("a < b & \"c\"".into()))
                .with_child(Element::new("spawn").with_property("x", Scalar::Float(-0.25))),
        );
        let options = FormatOptions::default();
        let text = XmlFormat.serialize(&doc, &options).unwrap().into_bytes();
        assert_eq!(XmlFormat.parse(&text, &options).unwrap(), Parsed::Document(doc));
    }

    #[test]
    fn parsed_documents_carry_the_configured_marker() {
        let mut options = FormatOptions::default();
        options.xml.encoding_marker = 0x02;
        let Parsed::Document(doc) = XmlFormat.parse(b"<r/>", &options).unwrap() else {
            panic!("expected a document");
        };
        assert_eq!(doc.encoding, 0x02);
    }
}
