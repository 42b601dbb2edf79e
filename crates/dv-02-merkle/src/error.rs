//! Error types for tree construction and proof verification.

use thiserror::Error;

/// Errors from the merkle engine.
///
/// A root mismatch is NOT an error: tree construction and proof
/// verification report mismatches as ordinary boolean outcomes. These
/// variants cover input that cannot be hashed at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MerkleError {
    /// A tree over zero entries has no root. The orchestrator owns the
    /// empty-distribution result shape; the tree refuses to invent one.
    #[error("cannot build a merkle tree over zero entries")]
    EmptyTree,

    /// An entry's address or amount did not parse, so its leaf has no
    /// defined byte encoding.
    #[error("entry {index} cannot be encoded as a leaf: {reason}")]
    InvalidEntry { index: u64, reason: String },

    /// Expected root is not a 32-byte hex string.
    #[error("invalid root hash: {reason}")]
    InvalidRoot { reason: String },

    /// Standalone verification received an unparseable address.
    #[error("invalid address: {reason}")]
    InvalidAddress { reason: String },

    /// The indexed leaf format needs a claim index and none was given.
    #[error("leaf format commits to the claim index, but no index was provided")]
    MissingIndex,

    /// No candidate format reproduced the expected root.
    #[error("no leaf format reproduces the expected root")]
    FormatUndetermined,
}
