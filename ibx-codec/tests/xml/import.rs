//! XML → Document

use crate::common::{expect_document, fixture, level};
use ibx_codec::formats::xml::parser::{parse_bytes, parse_document};
use ibx_codec::formats::xml::serializer::serialize_document;
use ibx_codec::{CodecError, Parsed, PassthroughReason, XmlOptions};
use insta::assert_snapshot;

#[test]
fn test_reference_rendering_parses_to_level() {
    let doc = expect_document(parse_bytes(&fixture("level.xml")).unwrap());
    assert_eq!(doc.root, level());
}

#[test]
fn test_handwritten_file_is_normalized() {
    let doc = expect_document(parse_bytes(&fixture("handwritten.xml")).unwrap());
    assert_snapshot!(serialize_document(&doc, &XmlOptions::default()).unwrap(), @r#"
    <?xml version="1.0" ?>
    <level>
      <property name="width" type="int16" value="640"/>
      <property name="title" type="string" value="Demo"/>
      <property name="visible" type="bool" value="true"/>
      <spawn>
        <property name="id" type="int8" value="3"/>
        <property name="x" type="float" value="1.5"/>
        <property name="y" type="float" value="-2.0"/>
      </spawn>
    </level>
    "#);
}

#[test]
fn test_foreign_xml_passes_through() {
    assert_eq!(
        parse_bytes(&fixture("foreign.xml")).unwrap(),
        Parsed::Passthrough(PassthroughReason::NonConformantDocument {
            element: "settings".into(),
            reason: "unexpected attribute 'version'".into()
        })
    );
}

#[test]
fn test_namespaced_xml_passes_through() {
    // Dropping the prefix would merge <x:b> and <y:b> into one name.
    let source = r#"<a xmlns:x="urn:x" xmlns:y="urn:y"><x:b/><y:b/></a>"#;
    assert_eq!(
        parse_document(source).unwrap(),
        Parsed::Passthrough(PassthroughReason::NonConformantDocument {
            element: "a".into(),
            reason: "namespace declaration".into()
        })
    );
    assert_eq!(
        parse_document(r#"<a><x:b xmlns:x="urn:x"/></a>"#).unwrap(),
        Parsed::Passthrough(PassthroughReason::NonConformantDocument {
            element: "x:b".into(),
            reason: "namespace declaration".into()
        })
    );
}

#[test]
fn test_doctype_is_accepted() {
    let doc = expect_document(parse_document("<!DOCTYPE a><a><b/></a>").unwrap());
    assert_eq!(doc.root.children.len(), 1);
}

#[test]
fn test_broken_xml_reports_position() {
    let err = parse_document("<level>\n  <spawn>\n</level>").unwrap_err();
    let CodecError::Xml(message) = &err else {
        panic!("expected an XML error, got {err:?}");
    };
    assert!(message.contains("3:"), "{message}");
}
