//! Quarry — schema-driven query assembly.
//!
//! This is the public meta-crate. Downstream users depend on **quarry**
//! only; it re-exports the stable API from:
//!   - `quarry-schema` (class catalog, typed attributes, provider handle)
//!   - `quarry-core`   (row tree, expression tree, translator, persistence)
//!
//! The free functions here are the recommended entry points: they validate
//! before translating and fold every failure into one [`Error`].

pub use quarry_core as core;
pub use quarry_schema as schema;

mod error;

pub use error::Error;
pub use quarry_core::{ExpressionTree, RowRoot};
pub use quarry_schema::{Catalog, SchemaProvider};

///
/// Prelude
///

pub mod prelude {
    pub use quarry_core::prelude::*;
    pub use quarry_schema::prelude::*;
}

/// Validate and encode an edit tree into the canonical expression form.
pub fn encode<P: SchemaProvider>(
    provider: &P,
    root: &RowRoot,
) -> Result<ExpressionTree, Error> {
    root.validate()?;

    Ok(quarry_core::encode(provider, root)?)
}

/// Decode an expression tree back into an editable row tree.
pub fn decode<P: SchemaProvider>(
    provider: &P,
    tree: &ExpressionTree,
) -> Result<RowRoot, Error> {
    Ok(quarry_core::decode(provider, tree)?)
}

/// Encode an edit tree and serialize it under the catalog's fingerprint.
pub fn save(catalog: &Catalog, root: &RowRoot) -> Result<Vec<u8>, Error> {
    let tree = encode(catalog, root)?;

    Ok(quarry_core::serialize::to_bytes(
        catalog.fingerprint(),
        &tree,
    )?)
}

/// Deserialize a saved query and decode it against the same catalog it was
/// written under.
pub fn load(catalog: &Catalog, bytes: &[u8]) -> Result<RowRoot, Error> {
    let tree = quarry_core::serialize::from_bytes(catalog.fingerprint(), bytes)?;

    decode(catalog, &tree)
}
