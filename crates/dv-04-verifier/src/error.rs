//! Error types for verification orchestration.

use thiserror::Error;

use dv_02_merkle::MerkleError;

/// Errors that prevent a verification run from producing a result.
///
/// Everything recoverable - root mismatch, unencodable entries, empty
/// distributions, inconclusive detection - is reported inside the
/// [`shared_types::VerificationResult`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifierError {
    /// The expected root is not a 32-byte hex string.
    #[error("expected root is unusable: {0}")]
    InvalidExpectedRoot(#[from] MerkleError),
}
