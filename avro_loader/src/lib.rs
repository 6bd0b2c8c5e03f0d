//! Avro Schema File Loading
//!
//! This crate reads schema files (JSON, or the same model in YAML) and
//! turns them into `avro_types::Schema` graphs, resolving references to
//! named types and turning recursive references into links.

pub mod errors;
pub mod file;
pub mod loader;

// Re-export commonly used types at the crate root
pub use errors::{LoadError, LoadResult};
pub use file::{load_schema_file, parse_schema, parse_schema_yaml};
pub use loader::SchemaLoader;

// Re-export avro_types for convenience
pub use avro_types;
