//! IBX1 binary format
//!
//! Thin [`Format`] wrapper over [`crate::decoder`] and [`crate::encoder`].

use crate::decoder;
use crate::encoder;
use crate::error::FormatError;
use crate::format::{Format, FormatOptions, Parsed, SerializedDocument};
use crate::tree::Document;

pub struct IbxFormat;

impl Format for IbxFormat {
    fn name(&self) -> &str {
        "ibx"
    }

    fn description(&self) -> &str {
        "IBX1 binary document"
    }

    fn file_extensions(&self) -> &[&str] {
        &["dat", "ibx"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &[u8], _options: &FormatOptions) -> Result<Parsed, FormatError> {
        Ok(decoder::decode(source)?)
    }

    fn serialize(
        &self,
        doc: &Document,
        options: &FormatOptions,
    ) -> Result<SerializedDocument, FormatError> {
        let bytes = encoder::encode(doc, &options.encode)?;
        Ok(SerializedDocument::Binary(bytes))
    }
}
