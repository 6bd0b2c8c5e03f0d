use avro_data::DataError;
use avro_types::SchemaError;
use avro_value::ValueError;
use thiserror::Error;

/// Result alias for resolution and decoding.
pub type SpecificResult<T> = Result<T, SpecificError>;

/// Errors produced while building or running a resolver.
#[derive(Debug, Error)]
pub enum SpecificError {
    /// The writer schema cannot be stored into the target type.
    #[error("Cannot store {actual} into {target}")]
    SchemaMismatch { target: String, actual: String },

    /// The encoded data selected a writer union branch that had no compatible target.
    #[error("no resolver for writer union branch {discriminant}")]
    MissingBranch { discriminant: usize },

    /// The consumer does not accept this kind of value.
    #[error("{callback} is not supported by this consumer")]
    NotApplicable { callback: &'static str },

    /// The encoded enum symbol has no counterpart in the target enum.
    #[error("enum symbol '{symbol}' is not defined in {target}")]
    UnknownSymbol { symbol: String, target: String },

    /// The consumer node was already released by a free walk.
    #[error("consumer {id} has been freed")]
    FreedConsumer { id: usize },

    /// A child was wired into a slot the node does not have.
    #[error("consumer {id} has no child slot {slot} ({slots} slots)")]
    SlotOutOfRange { id: usize, slot: usize, slots: usize },

    /// The target handed to a consumer was not the type it was built for.
    #[error("consumer target is not a {expected}")]
    WrongTarget { expected: &'static str },

    #[error(transparent)]
    Value(#[from] ValueError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl SpecificError {
    pub fn mismatch(target: impl Into<String>, actual: &avro_types::Schema) -> Self {
        SpecificError::SchemaMismatch {
            target: target.into(),
            actual: actual.type_name().to_string(),
        }
    }
}
