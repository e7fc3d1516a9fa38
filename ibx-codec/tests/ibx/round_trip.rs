//! Binary round trips: tree → bytes → tree and bytes → tree → bytes.

use crate::common::{arb_element, expect_document, fixture, level};
use ibx_codec::{decode, encode, Document, EncodeOptions};
use proptest::prelude::*;

#[test]
fn test_reencoding_reference_file_is_byte_identical() {
    let bytes = fixture("level.dat");
    let doc = expect_document(decode(&bytes).unwrap());
    assert_eq!(encode(&doc, &EncodeOptions::default()).unwrap(), bytes);
}

#[test]
fn test_encoding_reference_tree_matches_reference_file() {
    let doc = Document::new(level());
    assert_eq!(
        encode(&doc, &EncodeOptions::default()).unwrap(),
        fixture("level.dat")
    );
}

#[test]
fn test_no_share_output_decodes_to_the_same_tree() {
    let doc = Document::new(level());
    let bytes = encode(&doc, &EncodeOptions { share: false }).unwrap();
    assert_ne!(bytes, fixture("level.dat"));
    assert_eq!(expect_document(decode(&bytes).unwrap()), doc);
}

proptest! {
    #[test]
    fn prop_decode_inverts_encode(root in arb_element(), share in any::<bool>()) {
        let doc = Document::new(root);
        let bytes = encode(&doc, &EncodeOptions { share }).unwrap();
        prop_assert_eq!(expect_document(decode(&bytes).unwrap()), doc);
    }

    #[test]
    fn prop_encode_is_stable_across_decode(root in arb_element()) {
        let options = EncodeOptions::default();
        let first = encode(&Document::new(root), &options).unwrap();
        let again = encode(&expect_document(decode(&first).unwrap()), &options).unwrap();
        prop_assert_eq!(again, first);
    }

    #[test]
    fn prop_sharing_never_grows_the_output(root in arb_element()) {
        let doc = Document::new(root);
        let shared = encode(&doc, &EncodeOptions { share: true }).unwrap();
        let unshared = encode(&doc, &EncodeOptions { share: false }).unwrap();
        prop_assert!(shared.len() <= unshared.len());
    }
}
