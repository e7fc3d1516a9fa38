//! XML format tests
//!
//! Tests for the XML rendering in both directions.

mod export;
mod import;
