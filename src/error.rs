/// Errors returned by fallible table operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The requested key is not present in the table.
    #[error("key not found")]
    KeyNotFound,
    /// Parallel key and value sequences had different lengths.
    #[error("length mismatch: {keys} keys but {values} values")]
    LengthMismatch {
        /// Number of keys supplied.
        keys: usize,
        /// Number of values supplied.
        values: usize,
    },
}

/// Result type used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;
