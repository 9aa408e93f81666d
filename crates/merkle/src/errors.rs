//! Errors for the TLV commitment.

use thiserror::Error;

/// Errors that can occur while committing to a TLV stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MerkleError {
    /// A commitment needs at least one record.
    #[error("cannot commit to an empty TLV stream")]
    EmptyStream,

    /// A proof was requested for a record the stream does not have.
    #[error("record index {index} out of range for a stream of {len} records")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,

        /// Number of records in the stream.
        len: usize,
    },
}

/// Wrapper type for results that can fail with a [`MerkleError`].
pub type MerkleResult<T> = Result<T, MerkleError>;
