//! Normalized output and the per-row warning model.

use std::fmt;

use serde::{Deserialize, Serialize};
use shared_types::DistributionEntry;

/// A payload reduced to canonical entries, plus everything worth flagging.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizedDistribution {
    pub entries: Vec<DistributionEntry>,
    pub warnings: Vec<NormalizeWarning>,
}

impl NormalizedDistribution {
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

/// Per-row findings that do not invalidate the payload.
///
/// Each warning is bound to the index of the entry it describes, so
/// reports can point at the offending row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NormalizeWarning {
    /// Amount field absent, null, or empty; the entry defaulted to zero.
    MissingAmount { index: u64 },

    /// Decimal-point amount scaled into base units; digits past the
    /// configured precision were dropped.
    DecimalTruncation { index: u64, raw: String },

    /// Amount converted through the floating-point path.
    ScientificNotation { index: u64, raw: String },

    /// Amount kept as raw text only; it parses to nothing.
    InvalidAmount { index: u64, raw: String, reason: String },

    /// Mixed-case address whose EIP-55 casing is inconsistent.
    ChecksumMismatch { index: u64, address: String },
}

impl NormalizeWarning {
    /// Index of the entry this warning is bound to.
    pub fn index(&self) -> u64 {
        match self {
            NormalizeWarning::MissingAmount { index }
            | NormalizeWarning::DecimalTruncation { index, .. }
            | NormalizeWarning::ScientificNotation { index, .. }
            | NormalizeWarning::InvalidAmount { index, .. }
            | NormalizeWarning::ChecksumMismatch { index, .. } => *index,
        }
    }
}

impl fmt::Display for NormalizeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizeWarning::MissingAmount { index } => {
                write!(f, "entry {index}: amount missing, defaulted to zero")
            }
            NormalizeWarning::DecimalTruncation { index, raw } => {
                write!(f, "entry {index}: decimal amount {raw:?} scaled with truncation")
            }
            NormalizeWarning::ScientificNotation { index, raw } => {
                write!(
                    f,
                    "entry {index}: amount {raw:?} converted through floating point"
                )
            }
            NormalizeWarning::InvalidAmount { index, raw, reason } => {
                write!(f, "entry {index}: unparseable amount {raw:?} ({reason})")
            }
            NormalizeWarning::ChecksumMismatch { index, address } => {
                write!(f, "entry {index}: address {address} fails its checksum")
            }
        }
    }
}
