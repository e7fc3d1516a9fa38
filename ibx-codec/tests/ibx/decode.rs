//! Decoding of reference IBX1 files.

use crate::common::{expect_document, fixture, level};
use ibx_codec::error::Table;
use ibx_codec::formats::xml::serializer::serialize_document;
use ibx_codec::{decode, CodecError, Decoder, Element, Parsed, PassthroughReason, Scalar, XmlOptions};
use insta::assert_snapshot;

#[test]
fn test_minimal_file_renders_single_property() {
    let doc = expect_document(decode(&fixture("minimal.dat")).unwrap());
    assert_eq!(
        doc.root,
        Element::new("root").with_property("X", Scalar::Int8(5))
    );

    let xml = serialize_document(&doc, &XmlOptions::default()).unwrap();
    assert_snapshot!(xml, @r#"
    <?xml version="1.0" ?>
    <root>
      <property name="X" type="int8" value="5"/>
    </root>
    "#);
}

#[test]
fn test_level_file_decodes_to_expected_tree() {
    let doc = expect_document(decode(&fixture("level.dat")).unwrap());
    assert_eq!(doc.encoding, 0x01);
    assert_eq!(doc.root, level());
}

#[test]
fn test_level_file_tables() {
    let bytes = fixture("level.dat");
    let decoder = Decoder::new(&bytes).unwrap().expect("signature");
    assert_eq!(
        decoder.strings().iter().collect::<Vec<_>>(),
        vec![
            "level", "spawn", "x", "y", "id", "enemy", "loot", "hp", "kind", "Demo", "odd",
            "width", "title", "visible"
        ]
    );
    // The two `id = 3` properties and the two "Demo" strings share slots.
    assert_eq!(decoder.values().len(), 8);
}

#[test]
fn test_level_file_hex_rendering() {
    let doc = expect_document(decode(&fixture("level.dat")).unwrap());
    let options = XmlOptions {
        hex8: true,
        hex16: true,
        hex32: true,
        ..XmlOptions::default()
    };
    assert_snapshot!(serialize_document(&doc, &options).unwrap(), @r#"
    <?xml version="1.0" ?>
    <level>
      <property name="width" type="int16" value="0x0280"/>
      <property name="title" type="string" value="Demo"/>
      <property name="visible" type="bool" value="true"/>
      <spawn>
        <property name="x" type="float" value="1.5"/>
        <property name="y" type="float" value="-2.0"/>
        <property name="id" type="int8" value="0x03"/>
      </spawn>
      <enemy>
        <property name="hp" type="int32" value="0x000186A0"/>
        <property name="kind" type="string" value="Demo"/>
        <property name="id" type="int8" value="0x03"/>
        <property name="odd" type="__unknown__" __tbyte="0x99"/>
        <loot/>
      </enemy>
    </level>
    "#);
}

#[test]
fn test_non_ibx_input_passes_through() {
    for input in [
        fixture("level.xml"),
        b"IBX".to_vec(),
        b"ibx1".to_vec(),
        Vec::new(),
    ] {
        assert_eq!(
            decode(&input).unwrap(),
            Parsed::Passthrough(PassthroughReason::SignatureMismatch)
        );
    }
}

#[test]
fn test_every_truncation_of_a_valid_file_is_fatal() {
    let bytes = fixture("level.dat");
    for len in 4..bytes.len() {
        let result = decode(&bytes[..len]);
        assert!(
            matches!(result, Err(CodecError::TruncatedInput { .. })),
            "prefix of {len} bytes: {result:?}"
        );
    }
}

#[test]
fn test_corrupt_string_reference_is_fatal() {
    let mut bytes = fixture("minimal.dat");
    // Root element name index.
    bytes[18] = 0x02;
    assert_eq!(
        decode(&bytes).unwrap_err(),
        CodecError::IndexOutOfRange {
            table: Table::Strings,
            index: 2,
            len: 2
        }
    );
}
