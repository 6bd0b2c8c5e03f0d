/* Raw data structures
 *
 * Storage used by schema-specific types and by the generic value tree:
 * a growable array, a string-keyed map on top of it, a byte buffer with
 * give semantics, a two-key memoization table, and the raw equality
 * predicates. */

pub mod array;
pub mod equals;
pub mod errors;
pub mod map;
pub mod memo;
pub mod string;

pub use array::RawArray;
pub use equals::{raw_equals, RawEquals};
pub use errors::{DataError, DataResult};
pub use map::RawMap;
pub use memo::Memo;
pub use string::{FreeFn, RawBytes, RawString};

/* Raw primitive aliases */
pub type RawBoolean = bool;
pub type RawInt = i32;
pub type RawLong = i64;
pub type RawFloat = f32;
pub type RawDouble = f64;
pub type RawNull = ();
