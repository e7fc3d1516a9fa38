//! Format implementations
//!
//! The two sides of the codec: the IBX1 binary form and its XML rendering.

pub mod ibx;
pub mod xml;

pub use ibx::IbxFormat;
pub use xml::{XmlFormat, XmlOptions};
