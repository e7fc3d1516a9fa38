//! Shared configuration loader for the ibx toolchain.
//!
//! `defaults/ibx.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`IbxConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use ibx_codec::{EncodeOptions, FormatOptions, XmlOptions};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/ibx.default.toml");

/// Top-level configuration consumed by ibx applications.
#[derive(Debug, Clone, Deserialize)]
pub struct IbxConfig {
    pub decode: DecodeConfig,
    pub encode: EncodeConfig,
    pub trace: TraceConfig,
    pub batch: BatchConfig,
}

/// How decoded values are rendered as XML.
#[derive(Debug, Clone, Deserialize)]
pub struct DecodeConfig {
    pub hex8: bool,
    pub hex16: bool,
    pub hex32: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EncodeConfig {
    pub share: bool,
    pub encoding_marker: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TraceConfig {
    pub debug: bool,
}

/// Extensions used when converting directories.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchConfig {
    pub binary_extension: String,
    pub text_extension: String,
}

impl From<&EncodeConfig> for EncodeOptions {
    fn from(config: &EncodeConfig) -> Self {
        EncodeOptions {
            share: config.share,
        }
    }
}

impl From<&IbxConfig> for XmlOptions {
    fn from(config: &IbxConfig) -> Self {
        XmlOptions {
            hex8: config.decode.hex8,
            hex16: config.decode.hex16,
            hex32: config.decode.hex32,
            encoding_marker: config.encode.encoding_marker,
        }
    }
}

impl From<&IbxConfig> for FormatOptions {
    fn from(config: &IbxConfig) -> Self {
        FormatOptions {
            encode: (&config.encode).into(),
            xml: config.into(),
        }
    }
}

impl IbxConfig {
    pub fn format_options(&self) -> FormatOptions {
        self.into()
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<IbxConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<IbxConfig, ConfigError> {
    Loader::new().build()
}
