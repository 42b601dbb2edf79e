//! The analysis service: check dispatch, statistics, and the optional
//! contract-detection oracle.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use shared_types::{AccountBreakdown, DistributionEntry, DistributionStatistics};

use crate::domain::statistics::{compute, parseable_amounts};
use crate::domain::{checks, DistributionAnalysis};
use crate::ports::{ContractDetector, DistributionAnalytics};

/// Stateless analysis service. An optional [`ContractDetector`] enriches
/// the statistics with a contract/EOA breakdown; everything else is pure
/// computation.
#[derive(Clone, Default)]
pub struct DistributionAnalyzer {
    detector: Option<Arc<dyn ContractDetector>>,
}

impl DistributionAnalyzer {
    pub fn new() -> Self {
        Self { detector: None }
    }

    pub fn with_detector(detector: Arc<dyn ContractDetector>) -> Self {
        Self {
            detector: Some(detector),
        }
    }
}

impl std::fmt::Debug for DistributionAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DistributionAnalyzer")
            .field("detector", &self.detector.is_some())
            .finish()
    }
}

impl DistributionAnalytics for DistributionAnalyzer {
    #[instrument(skip(self, entries), fields(entries = entries.len()))]
    fn analyze(&self, entries: &[DistributionEntry]) -> DistributionAnalysis {
        let size = checks::check_size(entries);
        if entries.is_empty() {
            // Nothing else is meaningful over zero entries.
            return DistributionAnalysis {
                checks: vec![size],
                statistics: DistributionStatistics::default(),
            };
        }

        let sorted = parseable_amounts(entries);
        let checks = vec![
            size,
            checks::check_address_format(entries),
            checks::check_duplicates(entries),
            checks::check_problematic(entries),
            checks::check_amount_validity(entries),
            checks::check_outliers(&sorted),
            checks::check_concentration(&sorted),
        ];

        let mut statistics = compute(entries, &sorted);
        statistics.accounts = self.account_breakdown(entries);

        debug!(
            checks = checks.len(),
            gini = statistics.gini,
            total = %statistics.total,
            "analyzed distribution"
        );
        DistributionAnalysis { checks, statistics }
    }
}

impl DistributionAnalyzer {
    /// One batch oracle call over the valid addresses. A detector failure
    /// drops the breakdown, never the analysis.
    fn account_breakdown(&self, entries: &[DistributionEntry]) -> Option<AccountBreakdown> {
        let detector = self.detector.as_ref()?;
        let addresses: Vec<_> = entries
            .iter()
            .filter_map(|entry| entry.address.canonical())
            .collect();
        match detector.classify(&addresses) {
            Ok(flags) => {
                let contracts = flags.iter().filter(|is_contract| **is_contract).count() as u64;
                Some(AccountBreakdown {
                    contracts,
                    eoas: addresses.len() as u64 - contracts,
                })
            }
            Err(err) => {
                warn!(error = %err, "contract detection failed, omitting breakdown");
                None
            }
        }
    }
}
