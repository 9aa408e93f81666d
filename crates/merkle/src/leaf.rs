//! Leaf construction.
//!
//! Every record contributes one leaf:
//!
//! ```text
//! nonce(r) = H("LnAll" || all, r)
//! base(r)  = H("LnLeaf", r)
//! leaf(r)  = H("LnBranch", order(base(r), nonce(r)))
//! ```
//!
//! where `r` is the record's exact wire encoding and `all` is the concatenation of every record in
//! the stream. The nonce ties each leaf to the stream it came from, so a leaf cannot be replayed in
//! another stream, and hides the record from anyone who only sees the leaf.

use channel_crypto_primitives::{
    constants::{BRANCH_TAG, LEAF_TAG, NONCE_TAG_PREFIX},
    hash::{Digest, TaggedHasher},
};

/// Hashes the leaves of one stream, priming each tag once.
#[derive(Debug, Clone)]
pub struct LeafHasher {
    nonce: TaggedHasher,
    leaf: TaggedHasher,
    branch: TaggedHasher,
}

impl LeafHasher {
    /// Prepares a hasher for the stream whose concatenated wire bytes are `all`.
    pub fn new(all: &[u8]) -> Self {
        Self {
            nonce: TaggedHasher::from_tag_parts([NONCE_TAG_PREFIX, all]),
            leaf: TaggedHasher::new(LEAF_TAG),
            branch: TaggedHasher::new(BRANCH_TAG),
        }
    }

    /// `H("LnAll" || all, record)`.
    pub fn nonce(&self, record: &[u8]) -> Digest {
        self.nonce.hash(record)
    }

    /// `H("LnLeaf", record)`.
    pub fn base(&self, record: &[u8]) -> Digest {
        self.leaf.hash(record)
    }

    /// The full leaf for `record`.
    pub fn leaf(&self, record: &[u8]) -> Digest {
        self.nonce_and_leaf(record).1
    }

    /// The nonce of `record` together with its leaf, hashing the nonce only once.
    pub fn nonce_and_leaf(&self, record: &[u8]) -> (Digest, Digest) {
        let nonce = self.nonce(record);
        let leaf = self.branch.hash_ordered(&self.base(record), &nonce);
        (nonce, leaf)
    }

    /// The `LnBranch` hasher, shared with the interior levels of the tree.
    pub const fn branch(&self) -> &TaggedHasher {
        &self.branch
    }
}

/// Computes the leaf of `record` inside the stream `all`.
pub fn leaf_hash(record: &[u8], all: &[u8]) -> Digest {
    LeafHasher::new(all).leaf(record)
}
