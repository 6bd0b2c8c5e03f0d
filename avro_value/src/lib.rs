//! Avro Value Interface
//!
//! A polymorphic view over Avro data. Any storage can be read and written
//! generically by pairing it with a `ValueIface` implementation. This crate
//! ships three families of implementations: the generic value tree, wrapping
//! interfaces for raw primitives and buffers, and whatever application code
//! provides for its own structs. On top of the interface sit copy and
//! equality, the binary codec and JSON rendering.

pub mod cache;
pub mod encoding;
pub mod errors;
pub mod generic;
pub mod iface;
pub mod json;
pub mod ops;
pub mod wrapped;

// Re-export commonly used types at the crate root
pub use cache::SchemaCache;
pub use encoding::{read_generic, read_value, skip, write_value, Reader};
pub use errors::{ValueError, ValueResult};
pub use generic::{GenericIface, GenericValue, GENERIC_IFACE};
pub use iface::{downcast, downcast_mut, not_applicable, ValueIface, ValueMut, ValueRef, WrappedBuffer};
pub use json::to_json;
pub use ops::{copy_value, values_equal};
pub use wrapped::{wrap, wrap_mut, RawWrap};
