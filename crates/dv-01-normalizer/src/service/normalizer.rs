//! The normalization service: matcher dispatch plus the uniform
//! row-conversion pass.

use serde_json::Value;
use tracing::{debug, instrument};

use shared_types::{
    AmountOutcome, AmountWarning, DistributionEntry, EntryAmount, RecipientAddress,
    DEFAULT_DECIMALS,
};

use crate::domain::matcher::{MatchContext, RawEntry};
use crate::domain::shapes::match_payload;
use crate::domain::{NormalizeWarning, NormalizedDistribution};
use crate::error::NormalizeError;
use crate::ports::PayloadNormalizer;

/// Stateless normalization service; construction is configuration.
#[derive(Clone, Copy, Debug)]
pub struct Normalizer {
    decimals: u32,
}

impl Normalizer {
    pub fn new() -> Self {
        Self {
            decimals: DEFAULT_DECIMALS,
        }
    }

    /// Overrides the decimal scaling applied to fractional amounts.
    pub fn with_decimals(decimals: u32) -> Self {
        Self { decimals }
    }

    pub fn decimals(&self) -> u32 {
        self.decimals
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl PayloadNormalizer for Normalizer {
    #[instrument(skip(self, payload), fields(decimals = self.decimals))]
    fn normalize(&self, payload: &Value) -> Result<NormalizedDistribution, NormalizeError> {
        let rows = match_payload(payload, MatchContext::root())?;
        if rows.is_empty() {
            return Err(NormalizeError::EmptyDistribution);
        }
        let normalized = convert_rows(rows, self.decimals);
        debug!(
            entries = normalized.entries.len(),
            warnings = normalized.warnings.len(),
            "normalized distribution payload"
        );
        Ok(normalized)
    }
}

/// Uniform post-processing over matched rows, identical for every shape:
/// amount parsing with warnings bound to the entry index, raw-preserving
/// address handling, and checksum signaling.
fn convert_rows(rows: Vec<RawEntry>, decimals: u32) -> NormalizedDistribution {
    let mut entries = Vec::with_capacity(rows.len());
    let mut warnings = Vec::new();

    for (position, row) in rows.into_iter().enumerate() {
        let index = row.explicit_index.unwrap_or(position as u64);

        let (amount, outcome) = EntryAmount::convert(row.amount.as_ref(), decimals);
        match outcome {
            AmountOutcome::Exact => {}
            AmountOutcome::Missing => warnings.push(NormalizeWarning::MissingAmount { index }),
            AmountOutcome::Flagged(AmountWarning::DecimalTruncated) => {
                warnings.push(NormalizeWarning::DecimalTruncation {
                    index,
                    raw: amount.raw().to_string(),
                });
            }
            AmountOutcome::Flagged(AmountWarning::LossyScientific) => {
                warnings.push(NormalizeWarning::ScientificNotation {
                    index,
                    raw: amount.raw().to_string(),
                });
            }
            AmountOutcome::Invalid(reason) => {
                warnings.push(NormalizeWarning::InvalidAmount {
                    index,
                    raw: amount.raw().to_string(),
                    reason: reason.to_string(),
                });
            }
        }

        let address = RecipientAddress::new(row.address);
        if address.checksum_signal() == Some(false) {
            warnings.push(NormalizeWarning::ChecksumMismatch {
                index,
                address: address.raw().to_string(),
            });
        }

        let mut entry = DistributionEntry::new(address, amount, index);
        entry.extra = row.extra;
        entries.push(entry);
    }

    NormalizedDistribution { entries, warnings }
}
