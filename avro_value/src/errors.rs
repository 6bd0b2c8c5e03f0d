use avro_data::DataError;
use avro_types::SchemaError;
use thiserror::Error;

/// Result alias for value access and the binary codec.
pub type ValueResult<T> = Result<T, ValueError>;

/// Errors produced through the value interface.
#[derive(Debug, Error)]
pub enum ValueError {
    /// The implementation does not provide this accessor.
    #[error("{operation} is not applicable to {value_type} values")]
    NotApplicable {
        operation: &'static str,
        value_type: String,
    },

    /// The self storage was not the type the interface expects.
    #[error("value storage is not a {expected}")]
    WrongSelf { expected: &'static str },

    /// Compound access past the end.
    #[error("index {index} out of range for size {size}")]
    IndexOutOfRange { index: usize, size: usize },

    /// Record has no field of this name.
    #[error("no field named '{name}'")]
    NoSuchField { name: String },

    /// Map has no entry for this key.
    #[error("no entry for key '{key}'")]
    NoSuchKey { key: String },

    /// Union has no branch selected yet.
    #[error("union has no selected branch")]
    NoBranch,

    /// Union discriminant past the last branch.
    #[error("discriminant {discriminant} out of range for {branches} branches")]
    InvalidDiscriminant { discriminant: i64, branches: usize },

    /// Enum index past the last symbol.
    #[error("enum symbol {index} out of range for {size} symbols")]
    InvalidEnumSymbol { index: i64, size: usize },

    /// Fixed contents must match the declared size exactly.
    #[error("fixed '{name}' expects {expected} bytes, got {actual}")]
    FixedSizeMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// A record reaches itself without passing through an array, map or union.
    #[error("record '{name}' contains itself and cannot be instantiated")]
    UnboundedRecursion { name: String },

    /// Two values of different shapes were copied or compared.
    #[error("cannot combine {left} value with {right} value")]
    TypeMismatch { left: String, right: String },

    /// Encoded input ended early.
    #[error("unexpected end of input: needed {needed} bytes, {available} available")]
    UnexpectedEof { needed: usize, available: usize },

    /// A varint ran past ten bytes.
    #[error("varint is longer than 64 bits")]
    VarintOverflow,

    /// Encoded int does not fit in 32 bits.
    #[error("value {0} does not fit in an int")]
    IntOutOfRange(i64),

    /// Encoded length or block count was negative or too large.
    #[error("invalid length {0}")]
    InvalidLength(i64),

    /// A block claimed more items than the input can hold.
    #[error("block of {count} items exceeds the limit of {limit}")]
    BlockTooLarge { count: usize, limit: usize },

    /// Encoded boolean byte was neither 0 nor 1.
    #[error("invalid boolean byte {0:#04x}")]
    InvalidBoolean(u8),

    /// String contents were not UTF-8.
    #[error("string is not valid UTF-8")]
    InvalidUtf8,

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Data(#[from] DataError),
}
