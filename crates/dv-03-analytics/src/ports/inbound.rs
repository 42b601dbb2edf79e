//! Inbound Ports (Driving Ports)
//!
//! The API external components use to analyze a distribution.

use shared_types::DistributionEntry;

use crate::domain::DistributionAnalysis;

/// Primary analysis API (Driving Port).
pub trait DistributionAnalytics: Send + Sync {
    /// Runs every integrity check and computes the statistics record.
    ///
    /// Pure over its input: entries are never mutated and the analysis
    /// is deterministic for a given entry sequence.
    fn analyze(&self, entries: &[DistributionEntry]) -> DistributionAnalysis;
}
