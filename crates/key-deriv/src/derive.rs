//! Per-commitment key derivation.
//!
//! Two families of keys rotate with every commitment transaction:
//!
//! - **Simple keys** (payment, htlc, delayed-payment) are the basepoint shifted by a single tweak:
//!
//!   ```text
//!   pubkey  = basepoint + SHA256(per_commitment_point || basepoint)·G
//!   privkey = basepoint_secret + SHA256(per_commitment_point || basepoint)
//!   ```
//!
//! - **Revocation keys** blind the counterparty's revocation basepoint with the per-commitment
//!   point, so that the private key is only recoverable once both secrets are known:
//!
//!   ```text
//!   pubkey  = revocation_basepoint·SHA256(revocation_basepoint || per_commitment_point)
//!           + per_commitment_point·SHA256(per_commitment_point || revocation_basepoint)
//!   privkey = revocation_basepoint_secret·SHA256(revocation_basepoint || per_commitment_point)
//!           + per_commitment_secret·SHA256(per_commitment_point || revocation_basepoint)
//!   ```
//!
//! The hashes are always taken over the public points, including inside the private-key
//! functions, and always over the 33-byte compressed encodings.

use channel_crypto_primitives::{
    errors::{DerivationError, DerivationResult},
    hash::Digest,
    secp::{point_pair_hash, Secret},
};
use secp256k1::{PublicKey, Scalar, SecretKey, SECP256K1};
use tracing::trace;

/// Converts a hash into a tweak, failing if it is not below the curve order.
fn to_scalar(digest: Digest) -> DerivationResult<Scalar> {
    Scalar::from_be_bytes(digest.to_byte_array()).map_err(|_| DerivationError::DegenerateTweak)
}

/// `SHA256(per_commitment_point || basepoint)`.
fn simple_tweak(
    basepoint: &PublicKey,
    per_commitment_point: &PublicKey,
) -> DerivationResult<Scalar> {
    to_scalar(point_pair_hash(per_commitment_point, basepoint))
}

/// The two revocation tweaks `(h1, h2)`; `h2` hashes the same points in swapped order.
fn revocation_tweaks(
    revocation_basepoint: &PublicKey,
    per_commitment_point: &PublicKey,
) -> DerivationResult<(Scalar, Scalar)> {
    let h1 = to_scalar(point_pair_hash(revocation_basepoint, per_commitment_point))?;
    let h2 = to_scalar(point_pair_hash(per_commitment_point, revocation_basepoint))?;
    Ok((h1, h2))
}

/// Derives a payment, htlc or delayed-payment public key for one commitment.
pub fn derive_simple_pubkey(
    basepoint: &PublicKey,
    per_commitment_point: &PublicKey,
) -> DerivationResult<PublicKey> {
    let tweak = simple_tweak(basepoint, per_commitment_point)?;
    let key = basepoint
        .add_exp_tweak(SECP256K1, &tweak)
        .map_err(|_| DerivationError::DegenerateTweak)?;

    trace!(%basepoint, %per_commitment_point, %key, "derived simple pubkey");
    Ok(key)
}

/// Derives the private key matching [`derive_simple_pubkey`] for the same inputs.
///
/// `basepoint` must be `base_secret·G`; it is taken as an argument because the tweak hashes the
/// public point.
pub fn derive_simple_privkey(
    base_secret: &Secret,
    basepoint: &PublicKey,
    per_commitment_point: &PublicKey,
) -> DerivationResult<SecretKey> {
    let tweak = simple_tweak(basepoint, per_commitment_point)?;
    let key = base_secret
        .to_secret_key()?
        .add_tweak(&tweak)
        .map_err(|_| DerivationError::DegenerateTweak)?;

    trace!(%basepoint, %per_commitment_point, "derived simple privkey");
    Ok(key)
}

/// Derives the revocation public key for one commitment.
///
/// Only public data is needed, so either channel party can compute it.
pub fn derive_revocation_pubkey(
    revocation_basepoint: &PublicKey,
    per_commitment_point: &PublicKey,
) -> DerivationResult<PublicKey> {
    let (h1, h2) = revocation_tweaks(revocation_basepoint, per_commitment_point)?;

    let blinded_base = revocation_basepoint
        .mul_tweak(SECP256K1, &h1)
        .map_err(|_| DerivationError::DegenerateTweak)?;
    let blinded_commitment = per_commitment_point
        .mul_tweak(SECP256K1, &h2)
        .map_err(|_| DerivationError::DegenerateTweak)?;

    let key = blinded_base
        .combine(&blinded_commitment)
        .map_err(|_| DerivationError::DegenerateTweak)?;

    trace!(%revocation_basepoint, %per_commitment_point, %key, "derived revocation pubkey");
    Ok(key)
}

/// Derives the revocation private key once the counterparty has revealed `per_commitment_secret`.
///
/// The tweaks are computed from the public points, exactly as in [`derive_revocation_pubkey`].
pub fn derive_revocation_privkey(
    revocation_base_secret: &Secret,
    per_commitment_secret: &Secret,
    revocation_basepoint: &PublicKey,
    per_commitment_point: &PublicKey,
) -> DerivationResult<SecretKey> {
    let (h1, h2) = revocation_tweaks(revocation_basepoint, per_commitment_point)?;

    let blinded_base = revocation_base_secret
        .to_secret_key()?
        .mul_tweak(&h1)
        .map_err(|_| DerivationError::DegenerateTweak)?;
    let blinded_commitment = per_commitment_secret
        .to_secret_key()?
        .mul_tweak(&h2)
        .map_err(|_| DerivationError::DegenerateTweak)?;

    let key = blinded_base
        .add_tweak(&Scalar::from(blinded_commitment))
        .map_err(|_| DerivationError::DegenerateTweak)?;

    trace!(%revocation_basepoint, %per_commitment_point, "derived revocation privkey");
    Ok(key)
}
