//! Shared fixtures and generators for the integration tests.

use std::path::PathBuf;

use ibx_codec::value::TypedValue;
use ibx_codec::{Document, Element, Parsed, Scalar};
use proptest::prelude::*;

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn fixture(name: &str) -> Vec<u8> {
    std::fs::read(fixture_path(name))
        .unwrap_or_else(|e| panic!("failed to read fixture {name}: {e}"))
}

pub fn expect_document(parsed: Parsed) -> Document {
    match parsed {
        Parsed::Document(doc) => doc,
        Parsed::Passthrough(reason) => panic!("unexpected passthrough: {reason}"),
    }
}

/// The tree stored in `level.dat` and rendered in `level.xml`.
pub fn level() -> Element {
    Element::new("level")
        .with_property("width", Scalar::Int16(640))
        .with_property("title", Scalar::String("Demo".into()))
        .with_property("visible", Scalar::Bool(true))
        .with_child(
            Element::new("spawn")
                .with_property("x", Scalar::Float(1.5))
                .with_property("y", Scalar::Float(-2.0))
                .with_property("id", Scalar::Int8(3)),
        )
        .with_child(
            Element::new("enemy")
                .with_property("hp", Scalar::Int32(100_000))
                .with_property("kind", Scalar::String("Demo".into()))
                .with_property("id", Scalar::Int8(3))
                .with_property("odd", Scalar::Unknown(0x99))
                .with_child(Element::new("loot")),
        )
}

/// Element names; too short to ever spell `property`.
fn arb_element_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,6}"
}

fn arb_property_name() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_ .]{0,10}"
}

pub fn arb_scalar() -> impl Strategy<Value = Scalar> {
    prop_oneof![
        any::<i8>().prop_map(Scalar::Int8),
        any::<i16>().prop_map(Scalar::Int16),
        any::<i32>().prop_map(Scalar::Int32),
        any::<f32>()
            .prop_filter("NaN never compares equal", |f| !f.is_nan())
            .prop_map(Scalar::Float),
        any::<bool>().prop_map(Scalar::Bool),
        "[ -~\\t\\néü]{0,16}".prop_map(Scalar::String),
        any::<u8>()
            .prop_filter("only unmapped discriminants", |b| {
                !TypedValue::is_known_discriminant(*b)
            })
            .prop_map(Scalar::Unknown),
    ]
}

fn arb_properties() -> impl Strategy<Value = Vec<(String, Scalar)>> {
    prop::collection::vec((arb_property_name(), arb_scalar()), 0..4)
}

fn element(name: String, properties: Vec<(String, Scalar)>, children: Vec<Element>) -> Element {
    let mut element = Element::new(name);
    for (name, value) in properties {
        element = element.with_property(name, value);
    }
    element.children = children;
    element
}

pub fn arb_element() -> impl Strategy<Value = Element> {
    let leaf = (arb_element_name(), arb_properties())
        .prop_map(|(name, properties)| element(name, properties, Vec::new()));
    leaf.prop_recursive(4, 32, 4, |inner| {
        (
            arb_element_name(),
            arb_properties(),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(name, properties, children)| element(name, properties, children))
    })
}
