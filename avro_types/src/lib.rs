//! Avro Schema Types
//!
//! This crate contains the schema graph shared by the rest of the
//! workspace: the counted `Schema` handle and its accessors, link nodes for
//! recursive named types, the reference counting primitives behind them,
//! and the serde model of schema files. It performs no file I/O.

pub mod def;
pub mod errors;
pub mod refcount;
pub mod schema;

// Re-export commonly used types at the crate root
pub use def::*;
pub use errors::{SchemaError, SchemaResult};
pub use refcount::{cas_ptr, RefCount, IMMORTAL};
pub use schema::{validate_name, RecordBuilder, Schema, SchemaId, SchemaType};
