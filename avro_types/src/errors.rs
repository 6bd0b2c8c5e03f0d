use thiserror::Error;

/// Result alias used across the schema model.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised while constructing or navigating a schema graph.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Names must match `[A-Za-z_][A-Za-z0-9_]*`.
    #[error("invalid name '{name}'")]
    InvalidName { name: String },

    /// A record listed the same field name twice.
    #[error("record '{record}' declares field '{field}' more than once")]
    DuplicateField { record: String, field: String },

    /// An enum listed the same symbol twice.
    #[error("enum '{name}' declares symbol '{symbol}' more than once")]
    DuplicateSymbol { name: String, symbol: String },

    /// Enums need at least one symbol to have a default.
    #[error("enum '{name}' declares no symbols")]
    EmptyEnum { name: String },

    /// Two union branches share a type name.
    #[error("union contains more than one '{type_name}' branch")]
    DuplicateUnionBranch { type_name: String },

    /// A union needs a branch to hold its default.
    #[error("union has no branches")]
    EmptyUnion,

    /// Unions may not directly contain unions.
    #[error("union branches cannot themselves be unions")]
    NestedUnion,

    /// The named type a link points at was never bound or has been dropped.
    #[error("link to '{name}' has no live target")]
    UnboundLink { name: String },

    /// Links are bound exactly once.
    #[error("link to '{name}' is already bound")]
    LinkAlreadyBound { name: String },

    /// Link targets must be named schemas carrying the link's name.
    #[error("link to '{name}' cannot target a {actual} schema")]
    LinkTargetMismatch { name: String, actual: String },
}
