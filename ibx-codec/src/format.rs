//! Format trait definition
//!
//! This module defines the Format trait that both sides of the codec implement.
//! A format turns raw input bytes into a [`Document`] (or declines and asks for
//! passthrough) and turns a [`Document`] back into bytes.

use crate::encoder::EncodeOptions;
use crate::error::{FormatError, PassthroughReason};
use crate::formats::xml::XmlOptions;
use crate::tree::Document;

/// Serialized output produced by a [`Format`] implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerializedDocument {
    /// UTF-8 text output (XML)
    Text(String),
    /// Binary output (IBX1)
    Binary(Vec<u8>),
}

impl SerializedDocument {
    /// Consume the serialized output and return the underlying bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            SerializedDocument::Text(text) => text.into_bytes(),
            SerializedDocument::Binary(bytes) => bytes,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            SerializedDocument::Text(text) => text.as_bytes(),
            SerializedDocument::Binary(bytes) => bytes,
        }
    }
}

/// Outcome of parsing one input.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    Document(Document),
    /// The input is not ours to convert; copy it unchanged.
    Passthrough(PassthroughReason),
}

/// Settings for both directions, usually built from the loaded configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatOptions {
    pub encode: EncodeOptions,
    pub xml: XmlOptions,
}

/// Trait for document formats
///
/// Implementors provide conversion between raw bytes and the [`Document`]
/// tree. Formats can support parsing, serialization, or both.
///
/// # Examples
///
/// ```ignore
/// struct MyFormat;
///
/// impl Format for MyFormat {
///     fn name(&self) -> &str {
///         "my-format"
///     }
///
///     fn supports_parsing(&self) -> bool {
///         true
///     }
///
///     fn parse(&self, source: &[u8], _options: &FormatOptions) -> Result<Parsed, FormatError> {
///         todo!()
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "ibx", "xml")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// File extensions associated with this format, without the leading dot.
    ///
    /// Used for automatic format detection from filenames.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Whether this format supports parsing (bytes → Document)
    fn supports_parsing(&self) -> bool {
        false
    }

    /// Whether this format supports serialization (Document → bytes)
    fn supports_serialization(&self) -> bool {
        false
    }

    /// Parse raw input into a Document, or report that it should be passed through.
    ///
    /// Default implementation returns NotSupported error.
    fn parse(&self, _source: &[u8], _options: &FormatOptions) -> Result<Parsed, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support parsing",
            self.name()
        )))
    }

    /// Serialize a Document
    ///
    /// Default implementation returns NotSupported error.
    fn serialize(
        &self,
        _doc: &Document,
        _options: &FormatOptions,
    ) -> Result<SerializedDocument, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support serialization",
            self.name()
        )))
    }
}
