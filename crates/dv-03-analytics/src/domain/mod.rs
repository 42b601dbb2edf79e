//! Domain Layer - Pure distribution analysis
//!
//! This layer contains:
//! - The seven named integrity checks
//! - The exact-arithmetic statistics (totals, order statistics, Gini)
//!
//! RULES:
//! - No I/O operations
//! - No logging (the service layer owns tracing)
//! - Pure functions over `&[DistributionEntry]`

pub mod checks;
pub mod statistics;

use serde::{Deserialize, Serialize};
use shared_types::{DistributionStatistics, ValidationCheck};

/// The check names, part of the report contract.
pub mod check_names {
    pub const SIZE: &str = "Distribution Size";
    pub const ADDRESS_FORMAT: &str = "Address Format";
    pub const DUPLICATES: &str = "Duplicate Addresses";
    pub const PROBLEMATIC: &str = "Problematic Addresses";
    pub const AMOUNT_VALIDITY: &str = "Amount Validity";
    pub const OUTLIERS: &str = "Outlier Detection";
    pub const CONCENTRATION: &str = "Concentration Risk";
}

/// One analysis run: every check outcome plus the statistics record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DistributionAnalysis {
    pub checks: Vec<ValidationCheck>,
    pub statistics: DistributionStatistics,
}

impl DistributionAnalysis {
    /// Whether any check failed, at any severity.
    pub fn has_failures(&self) -> bool {
        self.checks
            .iter()
            .any(|check| check.status == shared_types::CheckStatus::Failed)
    }
}
