//! Bottom-up reduction of the leaves to a root.
//!
//! Leaves stay in stream order. Each level pairs hashes left to right and combines every full pair
//! with `H("LnBranch", order(left, right))`. When a level has an odd count, its last hash is carried
//! up unchanged rather than paired with a copy of itself or a padding value. For six records:
//!
//! ```text
//!                      root
//!                /              \
//!          b(b01,b23)           b45
//!          /        \          /    \
//!       b01          b23     l4      l5
//!      /   \        /   \
//!    l0     l1    l2     l3
//! ```

use channel_crypto_primitives::{
    hash::{Digest, TaggedHasher},
    tlv::TlvStream,
};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::debug;

use crate::{
    errors::{MerkleError, MerkleResult},
    leaf::LeafHasher,
    proof::InclusionProof,
};

/// Every level of the commitment tree over one stream, leaves first and root last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    /// Per-record nonces, kept so that a record can later be disclosed.
    nonces: Vec<Digest>,

    /// `layers[0]` holds the leaves; the last layer holds only the root.
    layers: Vec<Vec<Digest>>,
}

impl MerkleTree {
    /// Builds the tree over `records`, each given as its exact wire encoding, in stream order.
    ///
    /// The order is not checked; use [`MerkleTree::from_stream`] to also reject out-of-order
    /// records.
    pub fn build<R>(records: &[R]) -> MerkleResult<Self>
    where
        R: AsRef<[u8]> + Sync,
    {
        if records.is_empty() {
            return Err(MerkleError::EmptyStream);
        }

        let all: Vec<u8> = records
            .iter()
            .flat_map(|r| r.as_ref().iter().copied())
            .collect();
        let hasher = LeafHasher::new(&all);
        let hash_record = |record: &R| hasher.nonce_and_leaf(record.as_ref());

        #[cfg(feature = "parallel")]
        let (nonces, leaves): (Vec<_>, Vec<_>) = records.par_iter().map(hash_record).unzip();
        #[cfg(not(feature = "parallel"))]
        let (nonces, leaves): (Vec<_>, Vec<_>) = records.iter().map(hash_record).unzip();

        let mut layers = vec![leaves];
        while let Some(level) = layers.last().filter(|level| level.len() > 1) {
            let next = reduce_level(hasher.branch(), level);
            layers.push(next);
        }

        let tree = Self { nonces, layers };
        debug!(records = records.len(), depth = tree.depth(), root = %tree.root(), "built merkle tree");
        Ok(tree)
    }

    /// Builds the tree over a validated stream.
    pub fn from_stream(stream: &TlvStream) -> MerkleResult<Self> {
        Self::build(stream.records())
    }

    /// The commitment root.
    pub fn root(&self) -> Digest {
        // `build` never produces an empty tree and always reduces to a single top hash.
        self.layers[self.layers.len() - 1][0]
    }

    /// The leaf hashes, in stream order.
    pub fn leaves(&self) -> &[Digest] {
        &self.layers[0]
    }

    /// Every level of the tree, leaves first.
    pub fn layers(&self) -> &[Vec<Digest>] {
        &self.layers
    }

    /// Number of reductions between the leaves and the root.
    pub fn depth(&self) -> usize {
        self.layers.len() - 1
    }

    /// Produces the proof that discloses the record at `index`.
    ///
    /// The sibling of each level is collected bottom-up; levels where the node was the carried odd
    /// hash contribute nothing.
    pub fn prove(&self, index: usize) -> MerkleResult<InclusionProof> {
        let len = self.leaves().len();
        if index >= len {
            return Err(MerkleError::IndexOutOfRange { index, len });
        }

        let mut siblings = Vec::with_capacity(self.depth());
        let mut position = index;
        for level in &self.layers[..self.depth()] {
            let sibling = position ^ 1;
            if let Some(hash) = level.get(sibling) {
                siblings.push(*hash);
            }
            position /= 2;
        }

        Ok(InclusionProof::new(index, self.nonces[index], siblings))
    }
}

/// Combines one level into the next, carrying an odd trailing hash unchanged.
fn reduce_level(branch: &TaggedHasher, level: &[Digest]) -> Vec<Digest> {
    let mut next: Vec<Digest> = level
        .chunks_exact(2)
        .map(|pair| branch.hash_ordered(&pair[0], &pair[1]))
        .collect();

    if level.len() % 2 == 1 {
        next.push(level[level.len() - 1]);
    }

    next
}

/// Computes the commitment root over `records`, each given as its exact wire encoding, in stream
/// order.
///
/// Fails with [`MerkleError::EmptyStream`] if there are no records.
pub fn merkle_root<R>(records: &[R]) -> MerkleResult<Digest>
where
    R: AsRef<[u8]> + Sync,
{
    MerkleTree::build(records).map(|tree| tree.root())
}

#[cfg(test)]
mod tests {
    use channel_crypto_primitives::{
        hash::tagged_hash,
        tlv::{tu64, TlvRecord},
    };
    use proptest::prelude::*;

    use super::*;
    use crate::leaf::leaf_hash;

    fn branch(a: &Digest, b: &Digest) -> Digest {
        TaggedHasher::new(b"LnBranch").hash_ordered(a, b)
    }

    fn tlv1() -> TlvRecord {
        TlvRecord::new(1, &tu64(1000))
    }

    /// short_channel_id 1x2x3: 3-byte block height, 3-byte tx index, 2-byte output index.
    fn tlv2() -> TlvRecord {
        TlvRecord::new(2, &[0, 0, 1, 0, 0, 2, 0, 3])
    }

    fn tlv3() -> TlvRecord {
        let mut value =
            hex::decode("0266e4598d1d3c415f572a8488830b60f7e744ed9235eb0b1ba93283b315c03518")
                .unwrap();
        value.extend_from_slice(&1u64.to_be_bytes());
        value.extend_from_slice(&2u64.to_be_bytes());
        TlvRecord::new(3, &value)
    }

    fn offer_fields() -> Vec<TlvRecord> {
        vec![
            TlvRecord::new(6, b"USD"),
            TlvRecord::new(8, &tu64(1000)),
            TlvRecord::new(10, b"10USD every day"),
            TlvRecord::new(20, b"rusty.ozlabs.org"),
            TlvRecord::new(26, &[0x01, 0x01]),
            TlvRecord::new(
                30,
                &hex::decode("024b9a1fa8e006f1e3937f65f66c408e6da8e1ca728ea43222a7381df1cc449605")
                    .unwrap(),
            ),
        ]
    }

    fn concat(records: &[TlvRecord]) -> Vec<u8> {
        records.iter().flat_map(|r| r.wire().to_vec()).collect()
    }

    #[test]
    fn empty_stream_is_rejected() {
        let records: [TlvRecord; 0] = [];
        assert_eq!(merkle_root(&records), Err(MerkleError::EmptyStream));
    }

    #[test]
    fn single_record_root_is_the_leaf() {
        let records = [tlv1()];
        let root = merkle_root(&records).unwrap();

        let wire = tlv1().wire().to_vec();
        let mut nonce_tag = b"LnAll".to_vec();
        nonce_tag.extend_from_slice(&wire);
        let leaf = branch(
            &tagged_hash(b"LnLeaf", &wire),
            &tagged_hash(&nonce_tag, &wire),
        );

        assert_eq!(root, leaf);
        assert_eq!(
            root.to_string(),
            "aa0aa0f694c85492ac459c1de9831a37682985f5e840ecc9b1e28eece7dc5236"
        );
    }

    #[test]
    fn two_records() {
        let records = [tlv1(), tlv2()];
        let all = concat(&records);
        assert_eq!(hex::encode(&all), "010203e802080000010000020003");

        let leaf0 = leaf_hash(records[0].wire(), &all);
        let leaf1 = leaf_hash(records[1].wire(), &all);
        let root = merkle_root(&records).unwrap();

        assert_eq!(root, branch(&leaf0, &leaf1));
        assert_eq!(
            root.to_string(),
            "013b756ed73554cbc4dd3d90f363cb7cba6d8a279465a21c464e582b173ff502"
        );
    }

    #[test]
    fn three_records_carry_the_odd_leaf() {
        let records = [tlv1(), tlv2(), tlv3()];
        let all = concat(&records);
        let leaves: Vec<_> = records.iter().map(|r| leaf_hash(r.wire(), &all)).collect();

        let root = merkle_root(&records).unwrap();
        assert_eq!(root, branch(&branch(&leaves[0], &leaves[1]), &leaves[2]));
        assert_eq!(
            root.to_string(),
            "016fcda3b6f9ca30b35936877ca591fa101365a761a1453cfd9436777d593656"
        );
    }

    #[test]
    fn six_field_offer() {
        let records = offer_fields();
        let all = concat(&records);
        assert_eq!(
            hex::encode(&all),
            "0603555344080203e80a0f313055534420657665727920646179141072757374792e6f7a6c6162732e6f72671a0201011e21024b9a1fa8e006f1e3937f65f66c408e6da8e1ca728ea43222a7381df1cc449605"
        );

        let l: Vec<_> = records.iter().map(|r| leaf_hash(r.wire(), &all)).collect();
        let expected = branch(
            &branch(&branch(&l[0], &l[1]), &branch(&l[2], &l[3])),
            &branch(&l[4], &l[5]),
        );

        let tree = MerkleTree::build(&records).unwrap();
        assert_eq!(tree.root(), expected);
        assert_eq!(
            tree.root().to_string(),
            "68d324405c2c96cb8adb95dd4e10b03ee42fd43515cfe0676ff4b801d05dda9b"
        );

        let widths: Vec<_> = tree.layers().iter().map(Vec::len).collect();
        assert_eq!(widths, vec![6, 3, 2, 1]);
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.leaves().len(), records.len());
    }

    #[test]
    fn record_order_changes_the_root() {
        assert_ne!(
            merkle_root(&[tlv1(), tlv2()]).unwrap(),
            merkle_root(&[tlv2(), tlv1()]).unwrap()
        );
    }

    #[test]
    fn payload_change_changes_the_root() {
        let changed = TlvRecord::new(1, &tu64(1001));
        assert_ne!(
            merkle_root(&[tlv1(), tlv2()]).unwrap(),
            merkle_root(&[changed, tlv2()]).unwrap()
        );
    }

    #[test]
    fn stream_entry_point_matches_raw_records() {
        let stream = TlvStream::new(offer_fields()).unwrap();
        let tree = MerkleTree::from_stream(&stream).unwrap();

        let raw: Vec<Vec<u8>> = offer_fields().iter().map(|r| r.wire().to_vec()).collect();
        assert_eq!(tree.root(), merkle_root(&raw).unwrap());
    }

    #[test]
    fn odd_levels_never_pad() {
        // Five leaves reduce 5 -> 3 -> 2 -> 1; a padded tree would have 8 leaves and 3 reductions
        // of widths 4, 2, 1.
        let records: Vec<_> = (1..=5).map(|t| TlvRecord::new(t, &tu64(t))).collect();
        let tree = MerkleTree::build(&records).unwrap();

        let widths: Vec<_> = tree.layers().iter().map(Vec::len).collect();
        assert_eq!(widths, vec![5, 3, 2, 1]);

        let l = tree.leaves();
        let expected = branch(
            &branch(&branch(&l[0], &l[1]), &branch(&l[2], &l[3])),
            &l[4],
        );
        assert_eq!(tree.root(), expected);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn root_is_deterministic(values in prop::collection::vec(any::<u64>(), 1..12)) {
            let records: Vec<_> = values
                .iter()
                .enumerate()
                .map(|(i, v)| TlvRecord::new(i as u64, &tu64(*v)))
                .collect();

            prop_assert_eq!(merkle_root(&records).unwrap(), merkle_root(&records).unwrap());
        }

        #[test]
        fn level_widths_halve_rounding_up(count in 1usize..40) {
            let records: Vec<_> = (0..count as u64).map(|t| TlvRecord::new(t, &[])).collect();
            let tree = MerkleTree::build(&records).unwrap();

            for pair in tree.layers().windows(2) {
                prop_assert_eq!(pair[1].len(), pair[0].len().div_ceil(2));
            }
            prop_assert_eq!(tree.layers().last().map(Vec::len), Some(1));
        }
    }
}
