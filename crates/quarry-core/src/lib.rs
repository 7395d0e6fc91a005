//! Core runtime for quarry: the editable row tree, the canonical expression
//! tree, and the bidirectional translator between them.
//!
//! Both directions are pure functions over an injected [`SchemaProvider`];
//! nothing in this crate owns schema state or performs I/O beyond the CBOR
//! persistence envelope in [`serialize`].
//!
//! [`SchemaProvider`]: quarry_schema::SchemaProvider

pub mod decode;
pub mod encode;
pub mod event;
pub mod expr;
pub mod path;
pub mod row;
pub mod serialize;
pub mod value;

#[cfg(test)]
pub(crate) mod test_support;

pub use decode::{DecodeError, decode};
pub use encode::{EncodeError, encode};
pub use expr::{Expression, ExpressionTree, Literal};
pub use path::AttributePath;
pub use row::{AttributeOperator, CollectionOperator, RowData, RowError, RowPath, RowRoot};
pub use value::Value;

///
/// Prelude
///
/// Domain vocabulary only. No errors, serializers, or helpers.
///

pub mod prelude {
    pub use crate::{
        event::{ChangeKind, ChangeSink, RowChange},
        expr::{Expression, ExpressionTree, Literal},
        path::AttributePath,
        row::{
            AttributeOperator, CollectionOperator, EditOp, KeyedProperty, RowData, RowPath,
            RowRoot,
        },
        value::Value,
    };
}
