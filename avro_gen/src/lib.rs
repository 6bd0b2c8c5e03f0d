//! Avro Schema-Specific Code Generator
//!
//! Turns schemas into Rust source that the `avro_specific` resolver can
//! decode into directly. Each generator writes three files: a definition
//! table (`.def`), the type declarations (`.rs`) and the resolver
//! implementations (`_impl.rs`).

pub mod decl;
pub mod errors;
pub mod generator;
pub mod names;
pub mod render;
pub mod writer;

// Re-export commonly used types at the crate root
pub use decl::{DeclKind, Declaration, FieldDecl, TypeRef};
pub use errors::{GenError, GenResult};
pub use generator::{
  schema_to_specific, GeneratedFiles, SpecificGenOptions, SpecificGenerator, MAX_RECURSION_DEPTH,
};
pub use names::canonical_name;
pub use writer::{LineWriter, LINE_BUFFER_SIZE};
