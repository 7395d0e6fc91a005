//! CBOR persistence envelope for saved queries.
//!
//! A saved query is only meaningful against the schema it was written
//! under, so the envelope carries the catalog fingerprint alongside the
//! tree and a format version for forward migration.

mod cbor;

#[cfg(test)]
mod tests;

use crate::expr::ExpressionTree;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

/// Bumped when the envelope or tree layout changes incompatibly.
pub const FORMAT_VERSION: u16 = 1;

/// Upper bound on an encoded envelope. Saved queries are small; anything
/// near this size is corrupt or hostile input.
pub const MAX_ENVELOPE_BYTES: usize = 1 << 20;

///
/// SerializeError
///

#[derive(Debug, ThisError)]
pub enum SerializeError {
    #[error("serialize error: {0}")]
    Serialize(String),

    #[error("deserialize error: {0}")]
    Deserialize(String),

    #[error("payload is {len} bytes (limit {max_bytes})")]
    SizeLimitExceeded { len: usize, max_bytes: usize },

    #[error("unsupported format version {found} (expected {expected})")]
    FormatVersion { found: u16, expected: u16 },

    #[error("saved query was written under a different schema")]
    FingerprintMismatch,
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    format: u16,
    fingerprint: [u8; 32],
    tree: &'a ExpressionTree,
}

#[derive(Deserialize)]
struct Envelope {
    format: u16,
    fingerprint: [u8; 32],
    tree: ExpressionTree,
}

/// Serialize a tree under the given catalog fingerprint.
pub fn to_bytes(
    fingerprint: [u8; 32],
    tree: &ExpressionTree,
) -> Result<Vec<u8>, SerializeError> {
    cbor::serialize(&EnvelopeRef {
        format: FORMAT_VERSION,
        fingerprint,
        tree,
    })
}

/// Deserialize a saved envelope, rejecting version and schema drift.
pub fn from_bytes(
    expected_fingerprint: [u8; 32],
    bytes: &[u8],
) -> Result<ExpressionTree, SerializeError> {
    let envelope: Envelope = cbor::deserialize(bytes, MAX_ENVELOPE_BYTES)?;

    if envelope.format != FORMAT_VERSION {
        return Err(SerializeError::FormatVersion {
            found: envelope.format,
            expected: FORMAT_VERSION,
        });
    }

    if envelope.fingerprint != expected_fingerprint {
        return Err(SerializeError::FingerprintMismatch);
    }

    Ok(envelope.tree)
}
