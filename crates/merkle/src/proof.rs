//! Selective disclosure of a single record.
//!
//! A holder of the full stream can reveal one record to a verifier who only knows the root (for
//! example, from a signature over it). The proof carries the record's nonce, which stands in for the
//! undisclosed rest of the stream, and the sibling hashes on the way to the root. Every combination
//! is order-independent, so the verifier needs no left/right flags.

use channel_crypto_primitives::{
    constants::{BRANCH_TAG, LEAF_TAG},
    hash::{Digest, TaggedHasher},
};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Proof that a record is part of the stream committed to by some root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InclusionProof {
    /// Position of the record in the stream.
    leaf_index: usize,

    /// `H("LnAll" || all, record)` for the committed stream.
    nonce: Digest,

    /// Sibling hashes, leaf level first. Levels where the node was carried up unpaired are
    /// skipped.
    siblings: Vec<Digest>,
}

impl InclusionProof {
    pub(crate) fn new(leaf_index: usize, nonce: Digest, siblings: Vec<Digest>) -> Self {
        Self {
            leaf_index,
            nonce,
            siblings,
        }
    }

    /// Position of the disclosed record in the stream.
    pub const fn leaf_index(&self) -> usize {
        self.leaf_index
    }

    /// The record's nonce.
    pub const fn nonce(&self) -> &Digest {
        &self.nonce
    }

    /// The sibling path, leaf level first.
    pub fn siblings(&self) -> &[Digest] {
        &self.siblings
    }

    /// Recomputes the root implied by disclosing `record` with this proof.
    pub fn compute_root(&self, record: &[u8]) -> Digest {
        let branch = TaggedHasher::new(BRANCH_TAG);
        let base = TaggedHasher::new(LEAF_TAG).hash(record);
        let leaf = branch.hash_ordered(&base, &self.nonce);

        self.siblings
            .iter()
            .fold(leaf, |node, sibling| branch.hash_ordered(&node, sibling))
    }

    /// Checks that `record` (its exact wire encoding) is committed to by `root`.
    pub fn verify(&self, record: &[u8], root: &Digest) -> bool {
        let computed = self.compute_root(record);
        let valid = computed == *root;

        trace!(leaf_index = %self.leaf_index, %computed, %root, %valid, "checked inclusion proof");
        valid
    }
}

#[cfg(test)]
mod tests {
    use channel_crypto_primitives::tlv::{tu64, TlvRecord};
    use proptest::prelude::*;

    use crate::{errors::MerkleError, tree::MerkleTree};

    fn stream(count: u64) -> Vec<TlvRecord> {
        (0..count)
            .map(|t| TlvRecord::new(2 * t + 1, &tu64(1000 + t)))
            .collect()
    }

    #[test]
    fn every_record_of_a_six_record_stream_verifies() {
        let records = stream(6);
        let tree = MerkleTree::build(&records).unwrap();

        for (index, record) in records.iter().enumerate() {
            let proof = tree.prove(index).unwrap();
            assert_eq!(proof.leaf_index(), index);
            assert!(proof.verify(record.wire(), &tree.root()), "index {index}");
        }
    }

    #[test]
    fn carried_node_contributes_no_sibling() {
        // 5 -> 3 -> 2 -> 1: the last leaf is carried twice and only paired at the top.
        let records = stream(5);
        let tree = MerkleTree::build(&records).unwrap();

        assert_eq!(tree.prove(4).unwrap().siblings().len(), 1);
        assert_eq!(tree.prove(0).unwrap().siblings().len(), 3);
    }

    #[test]
    fn single_record_proof_has_no_siblings() {
        let records = stream(1);
        let tree = MerkleTree::build(&records).unwrap();
        let proof = tree.prove(0).unwrap();

        assert!(proof.siblings().is_empty());
        assert!(proof.verify(records[0].wire(), &tree.root()));
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let tree = MerkleTree::build(&stream(3)).unwrap();
        assert_eq!(
            tree.prove(3),
            Err(MerkleError::IndexOutOfRange { index: 3, len: 3 })
        );
    }

    #[test]
    fn altered_record_fails() {
        let records = stream(4);
        let tree = MerkleTree::build(&records).unwrap();
        let proof = tree.prove(2).unwrap();

        let forged = TlvRecord::new(records[2].record_type(), &tu64(9999));
        assert!(!proof.verify(forged.wire(), &tree.root()));
    }

    #[test]
    fn proof_is_bound_to_its_stream() {
        let records = stream(4);
        let tree = MerkleTree::build(&records).unwrap();

        let mut other = stream(4);
        other[3] = TlvRecord::new(7, &tu64(1));
        let other_tree = MerkleTree::build(&other).unwrap();

        // Record 0 is identical in both streams, but its nonce differs.
        let proof = tree.prove(0).unwrap();
        assert!(!proof.verify(records[0].wire(), &other_tree.root()));
    }

    #[test]
    fn proof_serializes_as_hex() {
        let tree = MerkleTree::build(&stream(3)).unwrap();
        let proof = tree.prove(1).unwrap();

        let json = serde_json::to_value(&proof).unwrap();
        assert_eq!(json["leaf_index"], 1);
        assert_eq!(
            json["nonce"],
            serde_json::Value::String(proof.nonce().to_string())
        );

        let back: super::InclusionProof = serde_json::from_value(json).unwrap();
        assert_eq!(back, proof);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn proofs_verify_for_any_stream_size(count in 1u64..33, pick in any::<prop::sample::Index>()) {
            let records = stream(count);
            let tree = MerkleTree::build(&records).unwrap();
            let index = pick.index(records.len());

            let proof = tree.prove(index).unwrap();
            prop_assert!(proof.verify(records[index].wire(), &tree.root()));
            prop_assert!(proof.siblings().len() <= tree.depth());
        }
    }
}
