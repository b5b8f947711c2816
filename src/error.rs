//! Error types.

use thiserror::Error;


/// Errors during tree construction and querying
///
/// All of these are caller contract violations. None of them is transient, so
/// retrying the same call will fail the same way.
#[derive(Error, PartialEq, Eq, Clone, Debug)]
pub enum Error {
    /// The builder input is empty or not sorted
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested rank lies outside `[1, len]`
    #[error("k = {k} is out of range for a tree of {len} elements")]
    OutOfRange {
        /// Requested rank
        k: usize,
        /// Number of elements in the tree
        len: usize,
    },

    /// The transient split state does not match the requested operation
    #[error("inconsistent split state: {0}")]
    InconsistentState(String),
}


/// Result type used throughout this crate
pub type Result<T> = std::result::Result<T, Error>;
