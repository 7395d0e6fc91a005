use super::*;
use crate::{
    encode::encode,
    row::{AttributeOperator, CollectionOperator, RowData, RowRoot},
    test_support::{catalog, path},
};

fn sample_tree() -> (quarry_schema::Catalog, ExpressionTree) {
    let catalog = catalog();
    let root = RowRoot::new("Epoch", CollectionOperator::Any).with_child(
        RowData::new(path(&catalog, "Epoch", &["purpose"]))
            .with_comparison(AttributeOperator::Eq, "ramp"),
    );
    let tree = encode(&catalog, &root).expect("encodes");

    (catalog, tree)
}

#[test]
fn round_trip_preserves_the_tree() {
    let (catalog, tree) = sample_tree();
    let fingerprint = catalog.fingerprint();

    let bytes = to_bytes(fingerprint, &tree).expect("serializes");
    let restored = from_bytes(fingerprint, &bytes).expect("deserializes");

    assert_eq!(restored, tree);
}

#[test]
fn schema_drift_is_rejected() {
    let (catalog, tree) = sample_tree();

    let bytes = to_bytes(catalog.fingerprint(), &tree).expect("serializes");
    let err = from_bytes([0u8; 32], &bytes).expect_err("different schema");

    assert!(matches!(err, SerializeError::FingerprintMismatch));
}

#[test]
fn future_format_versions_are_rejected() {
    let (catalog, tree) = sample_tree();
    let fingerprint = catalog.fingerprint();

    let bytes = cbor::serialize(&EnvelopeRef {
        format: FORMAT_VERSION + 1,
        fingerprint,
        tree: &tree,
    })
    .expect("serializes");

    let err = from_bytes(fingerprint, &bytes).expect_err("future version");
    assert!(matches!(
        err,
        SerializeError::FormatVersion {
            found,
            expected: FORMAT_VERSION,
        } if found == FORMAT_VERSION + 1
    ));
}

#[test]
fn oversized_payloads_are_rejected_before_decode() {
    let bytes = vec![0u8; MAX_ENVELOPE_BYTES + 1];
    let err = from_bytes([0u8; 32], &bytes).expect_err("too large");

    assert!(matches!(err, SerializeError::SizeLimitExceeded { .. }));
}

#[test]
fn garbage_bytes_are_a_deserialize_error() {
    let err = from_bytes([0u8; 32], &[0xff, 0x00, 0x13]).expect_err("garbage");
    assert!(matches!(err, SerializeError::Deserialize(_)));
}
