//! Key derivation for payment channels.
//!
//! This crate derives the keys that rotate with every commitment transaction from each party's
//! long-lived basepoints, and recovers non-hardened BIP32 child public keys for wallet outputs.
//!
//! # Usage
//!
//! ```rust,ignore
//! use channel_crypto_key_deriv::{derive_revocation_pubkey, derive_simple_pubkey, Keyset};
//!
//! // Keys for one commitment, computed from public data only.
//! let payment_key = derive_simple_pubkey(&basepoints.payment, &per_commitment_point)?;
//! let revocation_key = derive_revocation_pubkey(&remote.revocation, &per_commitment_point)?;
//!
//! // Or every key the commitment needs at once.
//! let keyset = Keyset::derive(&per_commitment_point, &local, &remote, true)?;
//! ```
//!
//! # Failure
//!
//! Every function returns a [`DerivationError`] instead of a key when an input point is invalid or
//! a tweak degenerates. Derivation is deterministic, so callers should abort the protocol step
//! that needed the key rather than retry.

pub mod bip32;
pub mod derive;
pub mod keyset;

pub use bip32::bip32_pubkey;
pub use channel_crypto_primitives::errors::{DerivationError, DerivationResult};
pub use derive::{
    derive_revocation_privkey, derive_revocation_pubkey, derive_simple_privkey,
    derive_simple_pubkey,
};
pub use keyset::{BasepointSecrets, Basepoints, KeyFamily, Keyset};
