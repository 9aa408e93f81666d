//! The full set of keys one commitment transaction is built from.
//!
//! Each party publishes four basepoints when the channel opens. For every commitment index the
//! holder of that commitment combines them with the per-commitment point into a [`Keyset`]:
//!
//! | Key | Derived from |
//! |-----|--------------|
//! | `self_revocation_key` | remote revocation basepoint (revocation derivation) |
//! | `self_delayed_payment_key` | local delayed-payment basepoint |
//! | `self_payment_key` | local payment basepoint |
//! | `other_payment_key` | remote payment basepoint, or the basepoint itself with `static_remotekey` |
//! | `self_htlc_key` | local htlc basepoint |
//! | `other_htlc_key` | remote htlc basepoint |

use channel_crypto_primitives::{errors::DerivationResult, secp::Secret};
use secp256k1::{PublicKey, SecretKey};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::derive::{
    derive_revocation_privkey, derive_revocation_pubkey, derive_simple_privkey,
    derive_simple_pubkey,
};

/// The key families derived with the single-tweak scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyFamily {
    /// Key paying the commitment's `to_remote` (or, for the holder, `to_local` via delay).
    Payment,

    /// Key signing HTLC outputs.
    Htlc,

    /// Key for the holder's delayed `to_local` output.
    DelayedPayment,
}

/// A party's long-lived public basepoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Basepoints {
    /// Root of the revocation family.
    pub revocation: PublicKey,

    /// Root of the payment family.
    pub payment: PublicKey,

    /// Root of the htlc family.
    pub htlc: PublicKey,

    /// Root of the delayed-payment family.
    pub delayed_payment: PublicKey,
}

impl Basepoints {
    /// Returns the basepoint of a single-tweak family.
    pub const fn of(&self, family: KeyFamily) -> &PublicKey {
        match family {
            KeyFamily::Payment => &self.payment,
            KeyFamily::Htlc => &self.htlc,
            KeyFamily::DelayedPayment => &self.delayed_payment,
        }
    }
}

/// The secrets behind a party's [`Basepoints`].
#[derive(Debug, Clone)]
pub struct BasepointSecrets {
    /// Secret of the revocation basepoint.
    pub revocation: Secret,

    /// Secret of the payment basepoint.
    pub payment: Secret,

    /// Secret of the htlc basepoint.
    pub htlc: Secret,

    /// Secret of the delayed-payment basepoint.
    pub delayed_payment: Secret,
}

impl BasepointSecrets {
    /// Computes the public basepoints.
    pub fn basepoints(&self) -> DerivationResult<Basepoints> {
        Ok(Basepoints {
            revocation: self.revocation.public_key()?,
            payment: self.payment.public_key()?,
            htlc: self.htlc.public_key()?,
            delayed_payment: self.delayed_payment.public_key()?,
        })
    }

    const fn of(&self, family: KeyFamily) -> &Secret {
        match family {
            KeyFamily::Payment => &self.payment,
            KeyFamily::Htlc => &self.htlc,
            KeyFamily::DelayedPayment => &self.delayed_payment,
        }
    }

    /// Derives the private key of `family` for the commitment at `per_commitment_point`.
    pub fn derive_privkey(
        &self,
        family: KeyFamily,
        per_commitment_point: &PublicKey,
    ) -> DerivationResult<SecretKey> {
        let secret = self.of(family);
        derive_simple_privkey(secret, &secret.public_key()?, per_commitment_point)
    }

    /// Derives the revocation private key for a commitment the counterparty has since revoked by
    /// revealing `per_commitment_secret`.
    pub fn derive_revocation_privkey(
        &self,
        per_commitment_secret: &Secret,
    ) -> DerivationResult<SecretKey> {
        let per_commitment_point = per_commitment_secret.public_key()?;
        derive_revocation_privkey(
            &self.revocation,
            per_commitment_secret,
            &self.revocation.public_key()?,
            &per_commitment_point,
        )
    }
}

/// Every key needed to build (or check) one commitment transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyset {
    /// Revocation key for the holder's `to_local` and HTLC outputs.
    pub self_revocation_key: PublicKey,

    /// Key for the holder's delayed `to_local` output.
    pub self_delayed_payment_key: PublicKey,

    /// The holder's payment key.
    pub self_payment_key: PublicKey,

    /// The counterparty's payment key for `to_remote`.
    pub other_payment_key: PublicKey,

    /// The holder's HTLC key.
    pub self_htlc_key: PublicKey,

    /// The counterparty's HTLC key.
    pub other_htlc_key: PublicKey,
}

impl Keyset {
    /// Derives the keyset of the commitment identified by `per_commitment_point`, held by the
    /// owner of `local`.
    ///
    /// With `static_remotekey` the counterparty's payment key is its basepoint, unchanged.
    pub fn derive(
        per_commitment_point: &PublicKey,
        local: &Basepoints,
        remote: &Basepoints,
        static_remotekey: bool,
    ) -> DerivationResult<Self> {
        let other_payment_key = if static_remotekey {
            remote.payment
        } else {
            derive_simple_pubkey(&remote.payment, per_commitment_point)?
        };

        let keyset = Self {
            self_revocation_key: derive_revocation_pubkey(&remote.revocation, per_commitment_point)?,
            self_delayed_payment_key: derive_simple_pubkey(
                &local.delayed_payment,
                per_commitment_point,
            )?,
            self_payment_key: derive_simple_pubkey(&local.payment, per_commitment_point)?,
            other_payment_key,
            self_htlc_key: derive_simple_pubkey(&local.htlc, per_commitment_point)?,
            other_htlc_key: derive_simple_pubkey(&remote.htlc, per_commitment_point)?,
        };

        debug!(%per_commitment_point, %static_remotekey, "derived commitment keyset");
        Ok(keyset)
    }
}
