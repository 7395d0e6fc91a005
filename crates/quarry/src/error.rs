use quarry_core::{DecodeError, EncodeError, RowError, serialize::SerializeError};
use quarry_schema::SchemaError;
use thiserror::Error as ThisError;

///
/// Error
///
/// Umbrella over every failure the facade can surface.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Row(#[from] RowError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Serialize(#[from] SerializeError),
}
