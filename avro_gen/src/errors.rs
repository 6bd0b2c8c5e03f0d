use avro_types::SchemaError;
use std::path::PathBuf;
use thiserror::Error;

pub type GenResult<T> = Result<T, GenError>;

#[derive(Debug, Error)]
pub enum GenError {
  /// Nesting of compound schemas went deeper than the generator's stack.
  #[error("Exceeded schema recursion depth ({limit})")]
  RecursionLimitExceeded { limit: usize },

  /// A record reaches itself without an array, map or union in between.
  #[error("Record '{name}' contains itself and can never be instantiated")]
  UnboundedRecursion { name: String },

  /// Different unions would be generated under the same type name.
  #[error("Union name '{name}' is shared by unions with different branches")]
  NameCollision { name: String },

  /// A single formatted write did not fit the line buffer.
  #[error("Buffer overflow: {len} byte write exceeds the {limit} byte line buffer")]
  LineOverflow { len: usize, limit: usize },

  /// An output file could not be created or written.
  #[error("cannot write {path}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error(transparent)]
  Schema(#[from] SchemaError),
}
