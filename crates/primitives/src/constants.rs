//! Protocol constants shared by the derivation and commitment crates.
//!
//! Every value here is fixed by the wire protocol. Changing any of them breaks interoperability
//! with every other implementation.

/// Length of a compressed secp256k1 point, which is the form hashed during key derivation.
pub const PUBKEY_CMPR_LEN: usize = 33;

/// Length of a secret scalar.
pub const SECRET_LEN: usize = 32;

/// Length of a SHA-256 digest.
pub const DIGEST_LEN: usize = 32;

/// First child index in the BIP32 hardened range.
pub const BIP32_INITIAL_HARDENED_CHILD: u32 = 1 << 31;

/// Tag for the hash of a single TLV record.
pub const LEAF_TAG: &[u8] = b"LnLeaf";

/// Prefix of the per-stream nonce tag. The full tag is this prefix followed by every record of the
/// stream.
pub const NONCE_TAG_PREFIX: &[u8] = b"LnAll";

/// Tag for every interior combination, including the leaf/nonce pairing.
pub const BRANCH_TAG: &[u8] = b"LnBranch";
