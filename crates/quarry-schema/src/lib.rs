//! Schema catalog for quarry: class descriptions, typed attributes, and the
//! read-only provider handle consumed by the translator.

pub mod attribute;
pub mod catalog;
pub mod class;
pub mod types;


pub use attribute::{Attribute, Sentinel};
pub use catalog::{Catalog, CatalogBuilder, SchemaProvider};
pub use class::ClassDescription;
pub use types::{AttributeType, Cardinality};

use thiserror::Error as ThisError;

/// Maximum length for class and attribute identifiers.
pub const MAX_NAME_LEN: usize = 64;

///
/// SchemaError
///
/// Catalog construction and lookup failures. Lookup variants carry enough
/// context to identify the offending name without the caller re-deriving it.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum SchemaError {
    #[error("unknown class: {name}")]
    UnknownClass { name: String },

    #[error("unknown attribute: {class}.{attribute}")]
    UnknownAttribute { class: String, attribute: String },

    #[error("duplicate class: {name}")]
    DuplicateClass { name: String },

    #[error("duplicate attribute: {class}.{attribute}")]
    DuplicateAttribute { class: String, attribute: String },

    #[error("class {class} names unknown parent: {parent}")]
    UnknownParent { class: String, parent: String },

    #[error("attribute {class}.{attribute} is not a reference and has no target class")]
    NotAReference { class: String, attribute: String },

    #[error("identifier exceeds {MAX_NAME_LEN} characters: {name}")]
    NameTooLong { name: String },
}

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        SchemaError,
        attribute::{Attribute, Sentinel},
        catalog::{Catalog, CatalogBuilder, SchemaProvider},
        class::ClassDescription,
        types::{AttributeType, Cardinality},
    };
    pub use serde::{Deserialize, Serialize};
}
