//! Standalone proof verification.
//!
//! The claim-front-end operation: verify one recipient's claim against a
//! published root without ever materializing the tree. Only the leaf
//! inputs, the sibling path, and the expected root are needed.

use shared_types::{Address, Amount, LeafFormat};

use crate::error::MerkleError;
use crate::leaf::{combine, leaf_hash};

/// Parses a 64-hex-character root, with or without the `0x` prefix, in
/// any letter case.
pub fn parse_root_hex(raw: &str) -> Result<[u8; 32], MerkleError> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.len() != 64 {
        return Err(MerkleError::InvalidRoot {
            reason: format!("expected 64 hex characters, got {}", digits.len()),
        });
    }
    let mut root = [0u8; 32];
    hex::decode_to_slice(digits, &mut root).map_err(|_| MerkleError::InvalidRoot {
        reason: format!("non-hex characters in {trimmed:?}"),
    })?;
    Ok(root)
}

/// Verifies one claim against an expected root.
///
/// Recomputes the leaf under `format`, folds each proof element in with
/// sorted-pair hashing, and compares the final hash to the root parsed
/// case-insensitively. `Ok(false)` is an honest mismatch; `Err` means the
/// inputs themselves are malformed.
pub fn verify_proof(
    address: &str,
    amount: &Amount,
    index: Option<u64>,
    proof: &[[u8; 32]],
    expected_root_hex: &str,
    format: LeafFormat,
) -> Result<bool, MerkleError> {
    let address = Address::parse(address).map_err(|err| MerkleError::InvalidAddress {
        reason: err.to_string(),
    })?;
    let expected = parse_root_hex(expected_root_hex)?;

    let mut node = leaf_hash(format, &address, amount, index)?;
    for sibling in proof {
        node = combine(&node, sibling);
    }
    Ok(node == expected)
}
