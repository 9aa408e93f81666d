//! Recovery of a single non-hardened child public key from an extended public key.
//!
//! Wallet addresses handed out for channel closes are derived this way, so the node can recognize
//! its own outputs from the xpub alone. Hardened children need the private extended key and are
//! rejected.

use bitcoin::bip32::{ChildNumber, Xpub};
use channel_crypto_primitives::{
    constants::BIP32_INITIAL_HARDENED_CHILD,
    errors::{DerivationError, DerivationResult},
    secp::parse_point,
};
use secp256k1::{PublicKey, SECP256K1};
use tracing::trace;

/// Derives the public key of the `index`-th non-hardened child of `extended_key`.
///
/// Fails with [`DerivationError::NotDerivable`] if `index` is in the hardened range.
pub fn bip32_pubkey(extended_key: &Xpub, index: u32) -> DerivationResult<PublicKey> {
    if index >= BIP32_INITIAL_HARDENED_CHILD {
        return Err(DerivationError::NotDerivable(index));
    }

    let child = extended_key.ckd_pub(SECP256K1, ChildNumber::from_normal_idx(index)?)?;

    // Round-trip through the compressed encoding so a malformed child surfaces as a parse failure.
    let pubkey = parse_point(&child.public_key.serialize())?;

    trace!(parent = %extended_key.fingerprint(), %index, %pubkey, "derived child pubkey");
    Ok(pubkey)
}
