//! Per-format leaf encoding and the two hash primitives.
//!
//! `encode` lays fields out as ABI-style 32-byte words; `tight_pack` is
//! the `abi.encodePacked` layout with no padding between fields. The
//! address always contributes its 20 canonical bytes (case-insensitive
//! parse happens before encoding), the amount its 32-byte big-endian
//! form, and the index a 32-byte big-endian word.

use sha3::{Digest, Keccak256};

use shared_types::{Address, Amount, DistributionEntry, LeafFormat};

use crate::error::MerkleError;

/// Keccak-256 of arbitrary bytes.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// Hashes two sibling nodes with the sorted-pair rule: the byte-wise
/// smaller node is always hashed first, so `combine(a, b) == combine(b, a)`
/// and proofs need not record left/right position.
pub fn combine(a: &[u8; 32], b: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    if a <= b {
        hasher.update(a);
        hasher.update(b);
    } else {
        hasher.update(b);
        hasher.update(a);
    }
    hasher.finalize().into()
}

/// Hashes one (address, amount, index) triple into a leaf under `format`.
///
/// `index` is only consulted by [`LeafFormat::Indexed`]; passing `None`
/// for that format is [`MerkleError::MissingIndex`].
pub fn leaf_hash(
    format: LeafFormat,
    address: &Address,
    amount: &Amount,
    index: Option<u64>,
) -> Result<[u8; 32], MerkleError> {
    match format {
        LeafFormat::DoubleHashed => {
            let inner = keccak256(&encode_words(None, address, amount));
            Ok(keccak256(&inner))
        }
        LeafFormat::Indexed => {
            let index = index.ok_or(MerkleError::MissingIndex)?;
            Ok(keccak256(&encode_words(Some(index), address, amount)))
        }
        LeafFormat::Packed => Ok(keccak256(&tight_pack(address, amount))),
    }
}

/// Hashes one canonical entry into a leaf, or reports why it cannot be
/// encoded. The entry index is part of the error so the caller can name
/// the offending row.
pub fn entry_leaf(entry: &DistributionEntry, format: LeafFormat) -> Result<[u8; 32], MerkleError> {
    let address = entry
        .address
        .canonical()
        .ok_or_else(|| MerkleError::InvalidEntry {
            index: entry.index,
            reason: format!("address {:?} is not a 20-byte hex value", entry.address.raw()),
        })?;
    let amount = entry
        .amount
        .value()
        .ok_or_else(|| MerkleError::InvalidEntry {
            index: entry.index,
            reason: format!("amount {:?} does not parse", entry.amount.raw()),
        })?;
    leaf_hash(format, &address, &amount, Some(entry.index))
}

/// ABI-style word encoding: each field left-padded to a 32-byte word.
/// 96 bytes with an index, 64 without.
fn encode_words(index: Option<u64>, address: &Address, amount: &Amount) -> Vec<u8> {
    let mut out = Vec::with_capacity(if index.is_some() { 96 } else { 64 });
    if let Some(index) = index {
        let mut word = [0u8; 32];
        word[24..].copy_from_slice(&index.to_be_bytes());
        out.extend_from_slice(&word);
    }
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address.as_bytes());
    out.extend_from_slice(&word);
    out.extend_from_slice(&amount.to_be_bytes());
    out
}

/// `abi.encodePacked` layout: 20 address bytes directly followed by the
/// 32-byte big-endian amount.
fn tight_pack(address: &Address, amount: &Amount) -> [u8; 52] {
    let mut out = [0u8; 52];
    out[..20].copy_from_slice(address.as_bytes());
    out[20..].copy_from_slice(&amount.to_be_bytes());
    out
}
