//! Test utilities for the primitives.
//!
//! These utilities are not written in a separate crate to keep the primitives crate completely
//! independent.

use std::collections::HashSet;

use secp256k1::{rand::thread_rng, PublicKey, SecretKey, SECP256K1};

use crate::secp::{point_pair_hash, Secret};

/// Generate `count` distinct (public key, secret) pairs as two separate [`Vec`].
pub(crate) fn generate_keypairs(count: usize) -> (Vec<PublicKey>, Vec<Secret>) {
    let mut rng = thread_rng();
    let mut secrets: Vec<Secret> = Vec::with_capacity(count);
    let mut pubkeys: Vec<PublicKey> = Vec::with_capacity(count);

    let mut pubkeys_set: HashSet<PublicKey> = HashSet::new();

    while pubkeys_set.len() != count {
        let sk = SecretKey::new(&mut rng);
        let pubkey = sk.public_key(SECP256K1);

        if pubkeys_set.insert(pubkey) {
            secrets.push(sk.into());
            pubkeys.push(pubkey);
        }
    }

    (pubkeys, secrets)
}

#[test]
fn random_points_hash_asymmetrically() {
    let (pubkeys, secrets) = generate_keypairs(8);

    for (pubkey, secret) in pubkeys.iter().zip(&secrets) {
        assert_eq!(secret.public_key().unwrap(), *pubkey);
    }

    for pair in pubkeys.windows(2) {
        assert_ne!(
            point_pair_hash(&pair[0], &pair[1]),
            point_pair_hash(&pair[1], &pair[0])
        );
    }
}
