//! Tree construction, root derivation, and proof generation.

use std::collections::HashMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;
use serde_with::{hex::Hex, serde_as};

use shared_types::{DistributionEntry, LeafFormat};

use crate::error::MerkleError;
use crate::leaf::{combine, entry_leaf};

/// A fully built merkle tree over one distribution.
///
/// Built once per (entries, format) pair; changing either requires a
/// rebuild. Leaves stay in input order. Proofs are keyed by the entry's
/// lowercase address; when the same address appears in several entries
/// the last occurrence's proof wins.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DistributionTree {
    format: LeafFormat,
    #[serde_as(as = "Hex")]
    root: [u8; 32],
    #[serde_as(as = "Vec<Hex>")]
    leaves: Vec<[u8; 32]>,
    #[serde_as(as = "HashMap<_, Vec<Hex>>")]
    proofs: HashMap<String, Vec<[u8; 32]>>,
}

impl DistributionTree {
    /// Builds the tree: leaves per `format`, sorted-pair hashing upward,
    /// lone nodes promoted unchanged, and one proof per address.
    pub fn build(
        entries: &[DistributionEntry],
        format: LeafFormat,
    ) -> Result<Self, MerkleError> {
        if entries.is_empty() {
            return Err(MerkleError::EmptyTree);
        }

        let leaves = hash_leaves(entries, format)?;
        let levels = build_levels(leaves.clone());
        let root = *levels
            .last()
            .and_then(|top| top.first())
            .unwrap_or(&[0u8; 32]);

        let mut proofs = HashMap::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            proofs.insert(entry.grouping_key(), proof_path(&levels, position));
        }

        tracing::debug!(
            entries = entries.len(),
            %format,
            root = %hex::encode(root),
            "built distribution tree"
        );

        Ok(Self {
            format,
            root,
            leaves,
            proofs,
        })
    }

    pub fn format(&self) -> LeafFormat {
        self.format
    }

    pub fn root(&self) -> &[u8; 32] {
        &self.root
    }

    /// Lowercase `0x`-prefixed root, the form reports carry.
    pub fn root_hex(&self) -> String {
        format!("0x{}", hex::encode(self.root))
    }

    /// Leaf hashes in input order.
    pub fn leaves(&self) -> &[[u8; 32]] {
        &self.leaves
    }

    /// Sibling path for an address, looked up case-insensitively.
    pub fn proof(&self, address: &str) -> Option<&[[u8; 32]]> {
        self.proofs
            .get(&address.trim().to_ascii_lowercase())
            .map(Vec::as_slice)
    }

    /// The full proof map, keyed by lowercase address.
    pub fn proofs(&self) -> &HashMap<String, Vec<[u8; 32]>> {
        &self.proofs
    }
}

fn hash_leaves(
    entries: &[DistributionEntry],
    format: LeafFormat,
) -> Result<Vec<[u8; 32]>, MerkleError> {
    #[cfg(feature = "parallel")]
    {
        entries
            .par_iter()
            .map(|entry| entry_leaf(entry, format))
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        entries
            .iter()
            .map(|entry| entry_leaf(entry, format))
            .collect()
    }
}

/// All tree levels bottom-up, leaves first, root level last. An odd node
/// at any level is carried up unchanged, so a level of length n produces
/// one of length ceil(n / 2).
fn build_levels(leaves: Vec<[u8; 32]>) -> Vec<Vec<[u8; 32]>> {
    let mut levels = vec![leaves];
    while levels.last().map(Vec::len).unwrap_or(0) > 1 {
        let current = levels.last().cloned().unwrap_or_default();
        let mut next = Vec::with_capacity(current.len().div_ceil(2));
        for pair in current.chunks(2) {
            match pair {
                [left, right] => next.push(combine(left, right)),
                [lone] => next.push(*lone),
                _ => unreachable!("chunks(2) yields one or two nodes"),
            }
        }
        levels.push(next);
    }
    levels
}

/// Sibling hashes on the path from one leaf to the root. A promoted lone
/// node contributes no sibling at its level.
fn proof_path(levels: &[Vec<[u8; 32]>], mut position: usize) -> Vec<[u8; 32]> {
    let mut path = Vec::new();
    for level in &levels[..levels.len().saturating_sub(1)] {
        let sibling = position ^ 1;
        if sibling < level.len() {
            path.push(level[sibling]);
        }
        position /= 2;
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use shared_types::{Amount, EntryAmount, RecipientAddress};

    use crate::leaf::keccak256;
    use crate::proof::verify_proof;

    fn entry(address: &str, amount: u64, index: u64) -> DistributionEntry {
        DistributionEntry::new(
            RecipientAddress::new(address),
            EntryAmount::from_amount(Amount::from(amount)),
            index,
        )
    }

    fn fixture(n: u64) -> Vec<DistributionEntry> {
        (0..n)
            .map(|i| {
                let address = format!("0x{:040x}", 0x1000 + i);
                entry(&address, (i + 1) * 100, i)
            })
            .collect()
    }

    #[test]
    fn test_empty_entries_are_an_error() {
        assert_eq!(
            DistributionTree::build(&[], LeafFormat::Packed),
            Err(MerkleError::EmptyTree)
        );
    }

    #[test]
    fn test_single_entry_root_is_the_leaf() {
        let entries = fixture(1);
        let tree = DistributionTree::build(&entries, LeafFormat::Packed).unwrap();
        assert_eq!(tree.root(), &tree.leaves()[0]);
        assert_eq!(tree.proof(entries[0].address.raw()), Some(&[][..]));
    }

    #[test]
    fn test_two_entry_root_is_the_sorted_pair() {
        let entries = fixture(2);
        let tree = DistributionTree::build(&entries, LeafFormat::Packed).unwrap();
        let expected = combine(&tree.leaves()[0], &tree.leaves()[1]);
        assert_eq!(tree.root(), &expected);
    }

    #[test]
    fn test_build_is_deterministic() {
        let entries = fixture(7);
        let first = DistributionTree::build(&entries, LeafFormat::Packed).unwrap();
        let second = DistributionTree::build(&entries, LeafFormat::Packed).unwrap();
        assert_eq!(first.root(), second.root());
        assert_eq!(first.proofs(), second.proofs());
    }

    #[test]
    fn test_odd_node_promotes_unchanged() {
        // Three leaves: the third is lone at level 0 and pairs at level 1.
        let entries = fixture(3);
        let tree = DistributionTree::build(&entries, LeafFormat::Packed).unwrap();
        let pair = combine(&tree.leaves()[0], &tree.leaves()[1]);
        let expected = combine(&pair, &tree.leaves()[2]);
        assert_eq!(tree.root(), &expected);

        // The lone leaf's proof skips its own level.
        let proof = tree.proof(entries[2].address.raw()).unwrap();
        assert_eq!(proof, &[pair]);
    }

    #[test]
    fn test_all_proofs_verify_against_the_root() {
        for format in LeafFormat::DETECTION_ORDER {
            let entries = fixture(9);
            let tree = DistributionTree::build(&entries, format).unwrap();
            for e in &entries {
                let proof = tree.proof(e.address.raw()).unwrap();
                let ok = verify_proof(
                    e.address.raw(),
                    &e.amount.value().unwrap(),
                    Some(e.index),
                    proof,
                    &tree.root_hex(),
                    format,
                )
                .unwrap();
                assert!(ok, "proof for entry {} under {format} must verify", e.index);
            }
        }
    }

    #[test]
    fn test_proof_lookup_is_case_insensitive() {
        let entries = vec![
            entry("0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA1", 100, 0),
            entry("0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb2", 200, 1),
        ];
        let tree = DistributionTree::build(&entries, LeafFormat::Packed).unwrap();
        assert!(tree
            .proof("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1")
            .is_some());
        assert!(tree
            .proof("0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA1")
            .is_some());
        assert!(tree.proof("0xccc").is_none());
    }

    #[test]
    fn test_duplicate_address_keeps_last_proof() {
        let a = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1";
        let entries = vec![
            entry(a, 100, 0),
            entry("0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb2", 200, 1),
            entry(a, 300, 2),
        ];
        let tree = DistributionTree::build(&entries, LeafFormat::Packed).unwrap();
        // The stored proof belongs to the amount-300 occurrence.
        let ok = verify_proof(
            a,
            &Amount::from(300u64),
            Some(2),
            tree.proof(a).unwrap(),
            &tree.root_hex(),
            LeafFormat::Packed,
        )
        .unwrap();
        assert!(ok);
    }

    #[test]
    fn test_unencodable_entry_fails_with_its_index() {
        let mut entries = fixture(3);
        entries[1] = DistributionEntry::new(
            RecipientAddress::new("garbage"),
            EntryAmount::from_amount(Amount::from(1u64)),
            1,
        );
        assert!(matches!(
            DistributionTree::build(&entries, LeafFormat::Packed),
            Err(MerkleError::InvalidEntry { index: 1, .. })
        ));
    }

    #[test]
    fn test_reordering_changes_indexed_but_not_packed_roots() {
        let mut entries = fixture(4);
        let packed = DistributionTree::build(&entries, LeafFormat::Packed).unwrap();
        let indexed = DistributionTree::build(&entries, LeafFormat::Indexed).unwrap();

        // Swap two rows but keep their payload indexes; positions change.
        entries.swap(0, 3);
        let reindexed: Vec<_> = entries
            .iter()
            .enumerate()
            .map(|(i, e)| {
                DistributionEntry::new(e.address.clone(), e.amount.clone(), i as u64)
            })
            .collect();

        let indexed_after = DistributionTree::build(&reindexed, LeafFormat::Indexed).unwrap();
        assert_ne!(indexed.root(), indexed_after.root());

        // Packed leaves do not commit to position; sorted pairs absorb a
        // two-leaf swap at the bottom level only for sibling pairs, so
        // compare against the same multiset via a full rebuild.
        let packed_after = DistributionTree::build(&reindexed, LeafFormat::Packed).unwrap();
        let mut before: Vec<_> = packed.leaves().to_vec();
        let mut after: Vec<_> = packed_after.leaves().to_vec();
        before.sort_unstable();
        after.sort_unstable();
        assert_eq!(before, after);
    }

    #[test]
    fn test_serializes_to_hex_fields() {
        let entries = fixture(2);
        let tree = DistributionTree::build(&entries, LeafFormat::Packed).unwrap();
        let json = serde_json::to_value(&tree).unwrap();
        let root = json["root"].as_str().unwrap();
        assert_eq!(root.len(), 64);
        assert_eq!(format!("0x{root}"), tree.root_hex());
        assert_eq!(json["leaves"].as_array().unwrap().len(), 2);
    }

    proptest! {
        #[test]
        fn prop_combine_is_commutative(a in any::<[u8; 32]>(), b in any::<[u8; 32]>()) {
            prop_assert_eq!(combine(&a, &b), combine(&b, &a));
        }

        #[test]
        fn prop_every_proof_round_trips(n in 1usize..40, seed in any::<u64>()) {
            let entries: Vec<_> = (0..n as u64)
                .map(|i| {
                    let address = format!("0x{:040x}", seed.wrapping_add(i));
                    entry(&address, i.wrapping_mul(31) + 1, i)
                })
                .collect();
            let tree = DistributionTree::build(&entries, LeafFormat::DoubleHashed).unwrap();
            for e in &entries {
                let ok = verify_proof(
                    e.address.raw(),
                    &e.amount.value().unwrap(),
                    Some(e.index),
                    tree.proof(e.address.raw()).unwrap(),
                    &tree.root_hex(),
                    LeafFormat::DoubleHashed,
                ).unwrap();
                prop_assert!(ok);
            }
        }

        #[test]
        fn prop_tampered_amount_fails_verification(n in 2usize..20, bit in 0usize..64) {
            let entries: Vec<_> = (0..n as u64)
                .map(|i| entry(&format!("0x{:040x}", 0xbeef + i), (i + 1) * 10, i))
                .collect();
            let tree = DistributionTree::build(&entries, LeafFormat::Packed).unwrap();
            let victim = &entries[0];
            let tampered = Amount::from(victim.amount.value().unwrap().value()
                ^ shared_types::U256::from(1u64) << bit);
            let ok = verify_proof(
                victim.address.raw(),
                &tampered,
                Some(victim.index),
                tree.proof(victim.address.raw()).unwrap(),
                &tree.root_hex(),
                LeafFormat::Packed,
            ).unwrap();
            prop_assert!(!ok, "flipping bit {bit} must break the proof");
        }
    }

    #[test]
    fn test_scenario_two_known_recipients() {
        // Two canonical recipients under the packed format: the root is
        // non-zero and stable across runs.
        let entries = vec![
            entry(
                "0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA1",
                1_000_000_000_000_000_000,
                0,
            ),
            entry(
                "0xBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBB2",
                2_000_000_000_000_000_000,
                1,
            ),
        ];
        let tree = DistributionTree::build(&entries, LeafFormat::Packed).unwrap();
        assert_ne!(tree.root(), &[0u8; 32]);
        assert_ne!(tree.root(), &keccak256(&[]));

        let again = DistributionTree::build(&entries, LeafFormat::Packed).unwrap();
        assert_eq!(tree.root(), again.root());
        assert_eq!(
            tree.proof(entries[0].address.raw()),
            again.proof(entries[0].address.raw())
        );
    }
}
