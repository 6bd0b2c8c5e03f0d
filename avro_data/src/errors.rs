use thiserror::Error;

/// Result alias for the raw data structures.
pub type DataResult<T> = Result<T, DataError>;

/// Errors produced while growing raw buffers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DataError {
    /// Backing storage could not be grown. The structure is left unchanged.
    #[error("cannot allocate {requested} bytes")]
    OutOfMemory { requested: usize },
}
