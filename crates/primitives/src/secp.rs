//! SECP256K1 primitives.
//!
//! All curve arithmetic goes through the process-wide [`SECP256K1`] context. It is created lazily
//! on first use, never mutated afterwards, and is safe to share across threads without
//! synchronization.

use std::fmt;

use secp256k1::{PublicKey, SecretKey, SECP256K1};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{
    constants::{PUBKEY_CMPR_LEN, SECRET_LEN},
    errors::{DerivationError, DerivationResult},
    hash::{sha256_concat, Digest},
};

/// 32 bytes of secret key material: a basepoint secret or a per-commitment secret.
///
/// The bytes are wiped on drop and never printed by [`Debug`](fmt::Debug).
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Secret([u8; SECRET_LEN]);

impl Secret {
    /// Wraps exactly 32 bytes.
    pub const fn from_bytes(bytes: [u8; SECRET_LEN]) -> Self {
        Self(bytes)
    }

    /// Copies a secret out of `slice`, rejecting any length other than 32.
    pub fn from_slice(slice: &[u8]) -> DerivationResult<Self> {
        let bytes: [u8; SECRET_LEN] =
            slice
                .try_into()
                .map_err(|_| DerivationError::InvalidLength {
                    expected: SECRET_LEN,
                    actual: slice.len(),
                })?;
        Ok(Self(bytes))
    }

    /// Borrows the raw secret bytes.
    pub const fn as_bytes(&self) -> &[u8; SECRET_LEN] {
        &self.0
    }

    /// Interprets the secret as a scalar.
    ///
    /// Fails with [`DerivationError::InvalidScalar`] if the bytes are zero or not below the curve
    /// order.
    pub fn to_secret_key(&self) -> DerivationResult<SecretKey> {
        SecretKey::from_slice(&self.0).map_err(|_| DerivationError::InvalidScalar)
    }

    /// Returns `secret·G`.
    pub fn public_key(&self) -> DerivationResult<PublicKey> {
        Ok(self.to_secret_key()?.public_key(SECP256K1))
    }
}

impl From<SecretKey> for Secret {
    fn from(value: SecretKey) -> Self {
        Self(value.secret_bytes())
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

/// Parses a point from its 33-byte compressed encoding.
///
/// The uncompressed form is rejected even though it describes the same point, since only the
/// compressed form is ever hashed.
pub fn parse_point(bytes: &[u8]) -> DerivationResult<PublicKey> {
    if bytes.len() != PUBKEY_CMPR_LEN {
        return Err(DerivationError::InvalidPoint(
            secp256k1::Error::InvalidPublicKey,
        ));
    }

    PublicKey::from_slice(bytes).map_err(DerivationError::InvalidPoint)
}

/// Computes the per-commitment point `per_commitment_secret·G`.
pub fn per_commitment_point(per_commitment_secret: &Secret) -> DerivationResult<PublicKey> {
    per_commitment_secret.public_key()
}

/// Computes `SHA256(ser(first) || ser(second))` over the compressed encodings.
///
/// The argument order is significant.
pub fn point_pair_hash(first: &PublicKey, second: &PublicKey) -> Digest {
    sha256_concat([&first.serialize()[..], &second.serialize()[..]])
}
