//! Avro Schema-Specific Resolution
//!
//! Builds decode plans that store writer data directly into statically
//! typed targets: raw primitives, `RawArray`/`RawMap` collections, and the
//! record, enum, fixed and union types produced by the code generator.
//!
//! A plan is a graph of consumer nodes held in an arena. Resolution is
//! memoized per (target type, writer schema), which is what lets recursive
//! schemas produce finite graphs; the resulting back-edges are released by
//! a free walk that visits every node once.

#[macro_use]
mod macros;

pub mod binary;
pub mod callbacks;
pub mod collections;
pub mod context;
pub mod errors;
pub mod graph;
pub mod raw;
pub mod record;
pub mod union;

// Re-export commonly used types at the crate root
pub use binary::consume_binary;
pub use callbacks::{target_mut, ConsumerCallbacks, WriterUnionCallbacks};
pub use context::{ResolveContext, Resolver, Specific};
pub use errors::{SpecificError, SpecificResult};
pub use graph::{BranchSelector, ConsumerGraph, ConsumerId, ConsumerNode};
pub use raw::{
    raw_boolean_resolver_new, raw_bytes_resolver_new, raw_double_resolver_new,
    raw_float_resolver_new, raw_int_resolver_new, raw_long_resolver_new, raw_null_resolver_new,
    raw_string_resolver_new, RawConsume,
};
pub use record::{SpecificEnum, SpecificFixed, SpecificRecord};
pub use union::SpecificUnion;

// Re-export the crates generated code refers to
pub use avro_data;
pub use avro_types;
