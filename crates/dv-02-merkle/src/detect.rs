//! Leaf format auto-detection.
//!
//! Different DAO tooling hashes leaves differently, and published
//! payloads rarely say which convention they used. Detection tries each
//! format against the expected root over a small sample and takes the
//! first match. The sample keeps each trial O(1) in distribution size,
//! at a cost: when the distribution is larger than the sample window no
//! trial root can match the full root, detection is inconclusive, and
//! the caller falls back to a default format.

use shared_types::{DistributionEntry, LeafFormat};

use crate::error::MerkleError;
use crate::tree::DistributionTree;

/// How many leading entries a detection trial hashes.
pub const DETECTION_SAMPLE: usize = 10;

/// Detects the leaf format that reproduces `expected_root` over the
/// first `min(DETECTION_SAMPLE, n)` entries.
///
/// Formats are tried in [`LeafFormat::DETECTION_ORDER`]; the first match
/// wins. [`MerkleError::FormatUndetermined`] means no trial matched -
/// recoverable by the caller defaulting, not fatal.
pub fn detect_format(
    entries: &[DistributionEntry],
    expected_root: &[u8; 32],
) -> Result<LeafFormat, MerkleError> {
    if entries.is_empty() {
        return Err(MerkleError::EmptyTree);
    }
    let sample = &entries[..entries.len().min(DETECTION_SAMPLE)];

    for format in LeafFormat::DETECTION_ORDER {
        // An unencodable sample row rules the trial out, not the run.
        match DistributionTree::build(sample, format) {
            Ok(tree) if tree.root() == expected_root => {
                tracing::debug!(%format, "leaf format detected");
                return Ok(format);
            }
            Ok(_) | Err(_) => continue,
        }
    }
    Err(MerkleError::FormatUndetermined)
}
