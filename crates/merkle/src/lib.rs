//! Merkle commitment over a TLV record stream.
//!
//! The root commits to every record of a stream in order, and lets a holder of the full stream
//! disclose individual records later without revealing the others. See [`leaf`] for how each record
//! becomes a leaf and [`tree`] for how leaves reduce to the root.
//!
//! # Usage
//!
//! ```rust,ignore
//! use channel_crypto_merkle::{merkle_root, MerkleTree};
//!
//! let root = merkle_root(stream.records())?;
//!
//! let tree = MerkleTree::from_stream(&stream)?;
//! let proof = tree.prove(2)?;
//! assert!(proof.verify(stream.records()[2].wire(), &tree.root()));
//! ```
//!
//! With the `parallel` feature, leaf hashing runs on the rayon thread pool. The result is identical.

pub mod errors;
pub mod leaf;
pub mod proof;
pub mod tree;

pub use channel_crypto_primitives::hash::Digest;
pub use errors::{MerkleError, MerkleResult};
pub use leaf::{leaf_hash, LeafHasher};
pub use proof::InclusionProof;
pub use tree::{merkle_root, MerkleTree};
