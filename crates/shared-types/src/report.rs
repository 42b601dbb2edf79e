//! # Verification Report Records
//!
//! The structured output of a verification run: the root comparison, the
//! named integrity checks, distribution statistics, and run metadata.
//! Everything here serializes to stable JSON so reports can be archived
//! and diffed across runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::format::LeafFormat;

/// Outcome of one named integrity check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Passed,
    Failed,
    Warning,
    /// The check could not run (too few data points, no detector wired).
    Skipped,
}

/// How much a failed check matters for the overall verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

/// One named integrity check with its outcome and evidence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationCheck {
    pub name: String,
    pub status: CheckStatus,
    pub severity: Severity,
    pub description: String,
    /// Structured evidence: offending indexes, counts, sample values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ValidationCheck {
    pub fn passed(name: impl Into<String>, severity: Severity, description: impl Into<String>) -> Self {
        Self::with_status(name, CheckStatus::Passed, severity, description)
    }

    pub fn failed(name: impl Into<String>, severity: Severity, description: impl Into<String>) -> Self {
        Self::with_status(name, CheckStatus::Failed, severity, description)
    }

    pub fn warning(name: impl Into<String>, severity: Severity, description: impl Into<String>) -> Self {
        Self::with_status(name, CheckStatus::Warning, severity, description)
    }

    pub fn skipped(name: impl Into<String>, severity: Severity, description: impl Into<String>) -> Self {
        Self::with_status(name, CheckStatus::Skipped, severity, description)
    }

    fn with_status(
        name: impl Into<String>,
        status: CheckStatus,
        severity: Severity,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            status,
            severity,
            description: description.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// A critical failure blocks the overall success verdict.
    pub fn is_critical_failure(&self) -> bool {
        self.status == CheckStatus::Failed && self.severity == Severity::Critical
    }
}

/// Concentration of the distribution in its largest recipients.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcentrationRisk {
    Low,
    Medium,
    High,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationReport {
    pub risk: ConcentrationRisk,
    /// Share of the total held by the top decile, in percent.
    pub top_share_percent: f64,
    /// How many recipients the top decile contains (at least one).
    pub top_count: u64,
}

impl Default for ConcentrationReport {
    fn default() -> Self {
        Self {
            risk: ConcentrationRisk::Low,
            top_share_percent: 0.0,
            top_count: 0,
        }
    }
}

/// Contract-versus-EOA split, present only when a detector was wired in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBreakdown {
    pub contracts: u64,
    pub eoas: u64,
}

/// Aggregate statistics over the parseable amounts of a distribution.
///
/// Totals and order statistics are exact decimal strings; only the Gini
/// coefficient and percentage shares are floating presentation values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DistributionStatistics {
    pub recipient_count: u64,
    pub total: String,
    pub mean: String,
    pub median: String,
    pub stdev: String,
    pub min: String,
    pub max: String,
    pub gini: f64,
    pub concentration: ConcentrationReport,
    pub unique_addresses: u64,
    pub duplicate_addresses: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accounts: Option<AccountBreakdown>,
}

impl Default for DistributionStatistics {
    fn default() -> Self {
        Self {
            recipient_count: 0,
            total: "0".to_string(),
            mean: "0".to_string(),
            median: "0".to_string(),
            stdev: "0".to_string(),
            min: "0".to_string(),
            max: "0".to_string(),
            gini: 0.0,
            concentration: ConcentrationReport::default(),
            unique_addresses: 0,
            duplicate_addresses: 0,
            accounts: None,
        }
    }
}

/// Machine-readable failure classes in a verification result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    MerkleRootMismatch,
    EmptyDistribution,
    LeafEncoding,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultError {
    pub code: ErrorCode,
    pub message: String,
}

impl ResultError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// How the leaf format used for the run was chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatSource {
    /// Caller supplied an explicit format hint.
    Hint,
    /// Detection against the expected root was conclusive.
    Detected,
    /// Detection was inconclusive; the engine fell back to the default.
    DefaultFallback,
}

/// The expected root against what the engine computed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleComparison {
    /// Lowercase 0x-prefixed form of the root under verification.
    pub expected_root: String,
    /// Absent when no tree could be built (empty or unencodable input).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub computed_root: Option<String>,
    pub matches: bool,
}

/// Governance proposal the verified root was referenced from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space: Option<String>,
    pub proposal_id: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VerificationMetadata {
    pub verification_id: Uuid,
    pub recipient_count: u64,
    /// Exact decimal total of all parseable amounts.
    pub total_amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leaf_format: Option<LeafFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_source: Option<FormatSource>,
    pub duration_ms: u64,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposal: Option<ProposalRef>,
}

/// The complete outcome of one verification run.
///
/// `success` holds when the computed root matches the expected one, no
/// check failed at critical severity, and no errors were recorded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub success: bool,
    pub merkle: MerkleComparison,
    pub checks: Vec<ValidationCheck>,
    pub statistics: DistributionStatistics,
    pub errors: Vec<ResultError>,
    pub warnings: Vec<String>,
    pub metadata: VerificationMetadata,
}
