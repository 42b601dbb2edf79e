//! Error types for payload normalization.

use thiserror::Error;

/// Errors that make an entire payload unusable.
///
/// Per-row problems (bad amounts, bad addresses, checksum doubts) are
/// warnings on the normalized output, not errors; see
/// [`crate::domain::NormalizeWarning`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// No structural matcher recognized the payload.
    #[error("unsupported payload shape: no matcher recognizes this {received}")]
    UnsupportedPayload { received: &'static str },

    /// A recognized shape resolved to zero entries.
    #[error("distribution contains no entries")]
    EmptyDistribution,

    /// A record in a recognized sequence has no usable address field.
    #[error("entry {index} has no address field; available fields: [{}]", .available.join(", "))]
    MissingAddress { index: usize, available: Vec<String> },

    /// Container shapes nested past the supported depth.
    #[error("payload nesting exceeds {limit} levels")]
    NestingTooDeep { limit: usize },
}
