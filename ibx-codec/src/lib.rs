//! Lossless codec between IBX1 binary documents and XML
//!
//!     IBX1 is a compact tree format: a string table, a typed value table, a
//!     one-byte encoding marker and a single root element whose names and
//!     values are indices into those tables. This crate decodes it into a
//!     [`Document`] tree, encodes the tree back byte for byte, and renders the
//!     tree as XML and reads it back.
//!
//!     This is a pure lib: it never touches the filesystem or the terminal.
//!     The `ibx` binary in `ibx-cli` is the shell around it.
//!
//!     The file structure :
//!     .
//!     ├── error.rs                # CodecError, FormatError, PassthroughReason
//!     ├── cursor.rs               # bounds-checked byte reader
//!     ├── vlq.rs                  # tag-byte integers for counts and indices
//!     ├── string_table.rs
//!     ├── value.rs                # Scalar and its typed-value wire form
//!     ├── value_table.rs
//!     ├── tree.rs                 # Document, Element, Property, traversal
//!     ├── decoder.rs              # bytes → Document
//!     ├── encoder.rs              # Document → bytes
//!     ├── format.rs               # Format trait
//!     ├── registry.rs             # FormatRegistry, convert
//!     └── formats
//!         ├── ibx                 # binary side
//!         └── xml                 # parser.rs, serializer.rs
//!
//! Passthrough
//!
//!     Inputs that are not IBX1 (no signature) or XML that does not follow the
//!     element/property shape are not errors. Parsing returns
//!     [`Parsed::Passthrough`] with the reason and callers copy the input
//!     verbatim. Everything else that goes wrong is a [`CodecError`] and the
//!     pass produces no output.
//!
//! Logging
//!
//!     The crate logs through `tracing`: pass-level milestones at `debug`,
//!     every table entry and tree node at `trace`. Installing a subscriber is
//!     up to the caller; logging never changes the produced bytes.

pub mod cursor;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod format;
pub mod formats;
pub mod registry;
pub mod string_table;
pub mod tree;
pub mod value;
pub mod value_table;
pub mod vlq;

pub use decoder::{decode, Decoder};
pub use encoder::{encode, EncodeOptions};
pub use error::{CodecError, FormatError, PassthroughReason};
pub use format::{Format, FormatOptions, Parsed, SerializedDocument};
pub use formats::{IbxFormat, XmlFormat, XmlOptions};
pub use registry::{Conversion, FormatRegistry};
pub use tree::{Document, Element, Node, Property, MAX_DEPTH};
pub use value::Scalar;
