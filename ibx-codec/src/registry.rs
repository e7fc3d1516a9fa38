//! Format registry for format discovery and selection
//!
//! This module provides a centralized registry for the available formats.
//! Formats can be registered and retrieved by name, detected from a file
//! name, and chained by [`FormatRegistry::convert`].

use std::collections::HashMap;

use tracing::debug;

use crate::error::{FormatError, PassthroughReason};
use crate::format::{Format, FormatOptions, Parsed, SerializedDocument};
use crate::tree::Document;

/// Result of converting one input from one format to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conversion {
    Converted(SerializedDocument),
    /// The source format declined the input; the caller should copy it.
    Passthrough(PassthroughReason),
}

/// Registry of document formats
///
/// # Examples
///
/// ```ignore
/// let registry = FormatRegistry::default();
/// let xml = registry.convert(&bytes, "ibx", "xml", &FormatOptions::default())?;
/// ```
pub struct FormatRegistry {
    formats: HashMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formats: HashMap::new(),
        }
    }

    /// Register a format
    ///
    /// If a format with the same name already exists, it will be replaced.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        self.formats
            .insert(format.name().to_string(), Box::new(format));
    }

    /// Get a format by name
    pub fn get(&self, name: &str) -> Result<&dyn Format, FormatError> {
        self.formats
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| FormatError::FormatNotFound(name.to_string()))
    }

    /// Check if a format exists
    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formats.keys().cloned().collect();
        names.sort();
        names
    }

    /// Detect format from filename based on file extension
    ///
    /// Extensions compare case-insensitively, so `DATA.DAT` is `ibx`.
    pub fn detect_format_from_filename(&self, filename: &str) -> Option<String> {
        let extension = std::path::Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())?
            .to_ascii_lowercase();

        let mut names = self.list_formats();
        names.retain(|name| {
            self.formats[name]
                .file_extensions()
                .iter()
                .any(|candidate| candidate.eq_ignore_ascii_case(&extension))
        });
        names.into_iter().next()
    }

    /// Parse input using the specified format
    pub fn parse(
        &self,
        source: &[u8],
        format: &str,
        options: &FormatOptions,
    ) -> Result<Parsed, FormatError> {
        let fmt = self.get(format)?;
        if !fmt.supports_parsing() {
            return Err(FormatError::NotSupported(format!(
                "Format '{format}' does not support parsing"
            )));
        }
        fmt.parse(source, options)
    }

    /// Serialize a document using the specified format
    pub fn serialize(
        &self,
        doc: &Document,
        format: &str,
        options: &FormatOptions,
    ) -> Result<SerializedDocument, FormatError> {
        let fmt = self.get(format)?;
        if !fmt.supports_serialization() {
            return Err(FormatError::NotSupported(format!(
                "Format '{format}' does not support serialization"
            )));
        }
        fmt.serialize(doc, options)
    }

    /// Parse `source` as `from` and serialize the result as `to`.
    ///
    /// Both formats are resolved before any work is done.
    pub fn convert(
        &self,
        source: &[u8],
        from: &str,
        to: &str,
        options: &FormatOptions,
    ) -> Result<Conversion, FormatError> {
        self.get(to)?;
        match self.parse(source, from, options)? {
            Parsed::Document(doc) => {
                debug!(from, to, nodes = doc.root.node_count(), "converting");
                self.serialize(&doc, to, options)
                    .map(Conversion::Converted)
            }
            Parsed::Passthrough(reason) => {
                debug!(from, to, %reason, "passing input through");
                Ok(Conversion::Passthrough(reason))
            }
        }
    }

    /// Create a registry with default formats
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(crate::formats::ibx::IbxFormat);
        registry.register(crate::formats::xml::XmlFormat);
        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
