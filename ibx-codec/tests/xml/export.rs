//! Document → XML

use crate::common::{arb_element, expect_document, fixture, level};
use ibx_codec::formats::xml::parser::parse_document;
use ibx_codec::formats::xml::serializer::serialize_document;
use ibx_codec::{Document, Element, Scalar, XmlOptions};
use insta::assert_snapshot;
use proptest::prelude::*;

#[test]
fn test_level_matches_reference_rendering() {
    let xml = serialize_document(&Document::new(level()), &XmlOptions::default()).unwrap();
    assert_eq!(xml.as_bytes(), fixture("level.xml").as_slice());
}

#[test]
fn test_awkward_strings_are_escaped() {
    let doc = Document::new(
        Element::new("notes")
            .with_property("quote", Scalar::String("say \"hi\" & 'bye'".into()))
            .with_property("tags", Scalar::String("<b>\tbold</b>".into()))
            .with_property("lines", Scalar::String("one\r\ntwo".into()))
            .with_property("padded", Scalar::String("  x  ".into())),
    );
    let xml = serialize_document(&doc, &XmlOptions::default()).unwrap();
    assert_snapshot!(xml, @r#"
    <?xml version="1.0" ?>
    <notes>
      <property name="quote" type="string" value="say &quot;hi&quot; &amp; &apos;bye&apos;"/>
      <property name="tags" type="string" value="&lt;b&gt;&#9;bold&lt;/b&gt;"/>
      <property name="lines" type="string" value="one&#13;&#10;two"/>
      <property name="padded" type="string" value="  x  "/>
    </notes>
    "#);

    let back = expect_document(parse_document(&xml).unwrap());
    assert_eq!(back, doc);
}

#[test]
fn test_float_rendering() {
    let doc = Document::new(
        Element::new("f")
            .with_property("whole", Scalar::Float(3.0))
            .with_property("tenth", Scalar::Float(0.1))
            .with_property("tiny", Scalar::Float(1e-7))
            .with_property("max", Scalar::Float(f32::MAX))
            .with_property("inf", Scalar::Float(f32::NEG_INFINITY)),
    );
    let xml = serialize_document(&doc, &XmlOptions::default()).unwrap();
    assert_snapshot!(xml, @r#"
    <?xml version="1.0" ?>
    <f>
      <property name="whole" type="float" value="3.0"/>
      <property name="tenth" type="float" value="0.1"/>
      <property name="tiny" type="float" value="1e-7"/>
      <property name="max" type="float" value="3.4028235e38"/>
      <property name="inf" type="float" value="-inf"/>
    </f>
    "#);
    assert_eq!(expect_document(parse_document(&xml).unwrap()), doc);
}

proptest! {
    #[test]
    fn prop_xml_round_trip(root in arb_element(), hex8 in any::<bool>(), hex32 in any::<bool>()) {
        let doc = Document::new(root);
        let options = XmlOptions { hex8, hex32, ..XmlOptions::default() };
        let xml = serialize_document(&doc, &options).unwrap();
        prop_assert_eq!(expect_document(parse_document(&xml).unwrap()), doc);
    }
}
