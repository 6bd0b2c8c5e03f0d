use avro_types::SchemaError;
use std::path::PathBuf;
use thiserror::Error;

pub type LoadResult<T> = Result<T, LoadError>;

/// Errors produced while loading schema files.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The schema file could not be read.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a well-formed JSON schema.
    #[error("invalid JSON schema: {0}")]
    Json(#[from] serde_json::Error),

    /// The file is not a well-formed YAML schema.
    #[error("invalid YAML schema: {0}")]
    Yaml(#[from] serde_yml::Error),

    /// A type name that is neither a primitive nor a previously declared type.
    #[error("unknown type '{name}'")]
    UnknownType { name: String },

    /// A named type declared twice.
    #[error("type '{name}' is already defined")]
    Redefined { name: String },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}
