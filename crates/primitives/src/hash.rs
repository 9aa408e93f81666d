//! SHA-256 and the tagged double-hash used by the TLV commitment.
//!
//! `H(tag, msg) = SHA256(SHA256(tag) || SHA256(tag) || msg)`.
//!
//! The tags used by the commitment are not all static (the nonce tag embeds the whole record
//! stream), so the engine is built at runtime instead of through a compile-time tagged-hash
//! newtype. [`TaggedHasher`] keeps the engine state after the two tag blocks so the same tag can be
//! reused across many messages without rehashing it.

use std::{fmt, str::FromStr};

use bitcoin::hashes::{sha256, Hash, HashEngine};
use serde::{Deserialize, Serialize};

use crate::constants::DIGEST_LEN;

/// A 32-byte SHA-256 output.
///
/// Ordering is lexicographic over the raw bytes, which is the ordering the commitment uses to make
/// every pairwise combination commutative.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Digest(#[serde(with = "hex::serde")] [u8; DIGEST_LEN]);

impl Digest {
    /// Wraps raw digest bytes.
    pub const fn from_byte_array(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Returns the raw digest bytes.
    pub const fn to_byte_array(self) -> [u8; DIGEST_LEN] {
        self.0
    }

    /// Borrows the raw digest bytes.
    pub const fn as_byte_array(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }
}

impl From<sha256::Hash> for Digest {
    fn from(value: sha256::Hash) -> Self {
        Self(value.to_byte_array())
    }
}

impl From<Digest> for sha256::Hash {
    fn from(value: Digest) -> Self {
        sha256::Hash::from_byte_array(value.0)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({self})")
    }
}

impl FromStr for Digest {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; DIGEST_LEN];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }
}

/// Plain SHA-256 of `data`.
pub fn sha256(data: &[u8]) -> Digest {
    sha256::Hash::hash(data).into()
}

/// SHA-256 over the concatenation of `parts`, without materializing the concatenation.
pub fn sha256_concat<'a>(parts: impl IntoIterator<Item = &'a [u8]>) -> Digest {
    let mut engine = sha256::Hash::engine();
    for part in parts {
        engine.input(part);
    }
    sha256::Hash::from_engine(engine).into()
}

/// Computes `H(tag, msg)`.
pub fn tagged_hash(tag: &[u8], msg: &[u8]) -> Digest {
    TaggedHasher::new(tag).hash(msg)
}

/// Concatenates two digests lesser-first, so that `ordered_concat(a, b) == ordered_concat(b, a)`.
pub fn ordered_concat(a: &Digest, b: &Digest) -> [u8; 2 * DIGEST_LEN] {
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };

    let mut buf = [0u8; 2 * DIGEST_LEN];
    buf[..DIGEST_LEN].copy_from_slice(lo.as_byte_array());
    buf[DIGEST_LEN..].copy_from_slice(hi.as_byte_array());
    buf
}

/// A SHA-256 engine primed with `SHA256(tag) || SHA256(tag)`.
#[derive(Clone)]
pub struct TaggedHasher {
    engine: sha256::HashEngine,
}

impl fmt::Debug for TaggedHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaggedHasher").finish_non_exhaustive()
    }
}

impl TaggedHasher {
    /// Primes an engine for `tag`.
    pub fn new(tag: &[u8]) -> Self {
        Self::from_tag_parts([tag])
    }

    /// Primes an engine for the tag formed by concatenating `parts`.
    pub fn from_tag_parts<'a>(parts: impl IntoIterator<Item = &'a [u8]>) -> Self {
        let tag_hash = sha256_concat(parts);

        let mut engine = sha256::Hash::engine();
        engine.input(tag_hash.as_byte_array());
        engine.input(tag_hash.as_byte_array());

        Self { engine }
    }

    /// Computes `H(tag, msg)` for the primed tag.
    pub fn hash(&self, msg: &[u8]) -> Digest {
        let mut engine = self.engine.clone();
        engine.input(msg);
        sha256::Hash::from_engine(engine).into()
    }

    /// Computes `H(tag, order(a, b))` for the primed tag.
    pub fn hash_ordered(&self, a: &Digest, b: &Digest) -> Digest {
        self.hash(&ordered_concat(a, b))
    }
}
