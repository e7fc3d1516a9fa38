//! Error types for codec and format operations
//!
//! [`CodecError`] covers everything that can go wrong while reading or writing
//! one document. [`FormatError`] is what the registry layer reports and wraps
//! codec failures. Inputs the codec declines to touch are not errors at all:
//! they surface as a [`PassthroughReason`] so callers can copy them verbatim.

use std::fmt;
use thiserror::Error;

/// Which interning table an index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Strings,
    TypedValues,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Table::Strings => write!(f, "string table"),
            Table::TypedValues => write!(f, "typed value table"),
        }
    }
}

/// Fatal errors raised while decoding or encoding a single document.
///
/// A pass that returns one of these produced no output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The buffer ended in the middle of a field.
    #[error("truncated input: needed {needed} byte(s) at offset {offset:#x}")]
    TruncatedInput { offset: usize, needed: usize },

    /// A string or typed value index points past the end of its table.
    #[error("index {index} out of range for {table} of length {len}")]
    IndexOutOfRange { table: Table, index: usize, len: usize },

    /// An element header did not start with the zero marker byte.
    #[error("malformed element at offset {offset:#x}: expected 0x00, found {found:#04x}")]
    MalformedElement { offset: usize, found: u8 },

    /// A property header used a tag byte outside the three known forms.
    #[error("unexpected property tag {tag:#04x} at offset {offset:#x}")]
    UnexpectedPropertyTag { offset: usize, tag: u8 },

    /// A string table entry is not valid UTF-8.
    #[error("invalid UTF-8 in string table entry at offset {offset:#x}")]
    InvalidUtf8 { offset: usize },

    /// The textual form declares a property type with no binary mapping.
    #[error("unsupported property type '{0}'")]
    UnsupportedPropertyType(String),

    /// A property literal cannot be represented in its declared type.
    #[error("invalid {ty} value '{value}'")]
    InvalidValue { ty: String, value: String },

    /// A required attribute is absent from an element of the textual form.
    #[error("element <{element}> is missing attribute '{attribute}'")]
    MissingAttribute { element: String, attribute: String },

    /// The textual input is not well-formed XML.
    #[error("XML parsing error: {0}")]
    Xml(String),

    /// Elements are nested deeper than [`MAX_DEPTH`](crate::tree::MAX_DEPTH).
    #[error("element nesting exceeds {limit} levels")]
    NestingTooDeep { limit: usize },

    /// An element name cannot be written as an XML tag.
    #[error("element name '{0}' is not a valid XML name")]
    InvalidElementName(String),

    /// A name or string value holds a character XML 1.0 cannot carry, even
    /// as a character reference.
    #[error("character U+{code:04X} in '{context}' cannot be written as XML")]
    UnrepresentableCharacter { context: String, code: u32 },
}

/// Why an input was copied through unchanged instead of converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassthroughReason {
    /// The input does not start with the `IBX1` signature.
    SignatureMismatch,
    /// The XML document does not follow the element/property schema.
    NonConformantDocument { element: String, reason: String },
}

impl fmt::Display for PassthroughReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassthroughReason::SignatureMismatch => write!(f, "no IBX1 signature"),
            PassthroughReason::NonConformantDocument { element, reason } => {
                write!(f, "non-conformant element <{element}>: {reason}")
            }
        }
    }
}

/// Errors that can occur during format operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
    /// Format does not support the requested direction
    #[error("Operation not supported: {0}")]
    NotSupported(String),
    /// The codec rejected the document
    #[error(transparent)]
    Codec(#[from] CodecError),
}

pub type Result<T, E = CodecError> = std::result::Result<T, E>;
