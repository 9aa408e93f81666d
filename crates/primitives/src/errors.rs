//! Error types for the channel key and TLV primitives.

use bitcoin::bip32;
use thiserror::Error;

/// Errors that can occur while deriving channel keys.
///
/// Every variant is fatal to the enclosing protocol step: derivation is deterministic, so retrying
/// with the same inputs cannot produce a different outcome.
#[derive(Debug, Error)]
pub enum DerivationError {
    /// A supplied point is not a valid compressed secp256k1 point.
    #[error("invalid point: {0}")]
    InvalidPoint(secp256k1::Error),

    /// A tweak-add or tweak-multiply produced a zero scalar or the point at infinity.
    #[error("tweak produced a degenerate key")]
    DegenerateTweak,

    /// A child index in the hardened range was requested from a public extended key.
    #[error("child index {0} is hardened and cannot be derived from a public key")]
    NotDerivable(u32),

    /// Secret bytes are zero or not below the curve order.
    #[error("secret is not a valid scalar")]
    InvalidScalar,

    /// A fixed-size input had the wrong length.
    #[error("expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// The required length.
        expected: usize,

        /// The length that was supplied.
        actual: usize,
    },

    /// The extended key could not produce a child.
    #[error("BIP32 derivation error: {0}")]
    Bip32(#[from] bip32::Error),
}

/// Wrapper type for results that can fail with a [`DerivationError`].
pub type DerivationResult<T> = Result<T, DerivationError>;

/// Errors that can occur while framing TLV records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TlvError {
    /// Record types must be strictly ascending within a stream.
    #[error("record type {current} follows type {previous}")]
    UnorderedRecords {
        /// Type of the preceding record.
        previous: u64,

        /// Type of the offending record.
        current: u64,
    },

    /// The input ended in the middle of a record.
    #[error("truncated TLV record")]
    Truncated,

    /// A BigSize value was not encoded in its shortest form.
    #[error("non-minimal BigSize encoding")]
    NonMinimalBigSize,

    /// Trailing bytes after a single record, or a payload shorter than its declared length.
    #[error("record declares {declared} payload bytes but carries {actual}")]
    LengthMismatch {
        /// Length from the record header.
        declared: u64,

        /// Bytes actually present.
        actual: usize,
    },
}

/// Wrapper type for results that can fail with a [`TlvError`].
pub type TlvResult<T> = Result<T, TlvError>;
