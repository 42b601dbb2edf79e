//! The verification service.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, instrument};
use uuid::Uuid;

use dv_01_normalizer::NormalizedDistribution;
use dv_02_merkle::{detect_format, parse_root_hex, DistributionTree};
use dv_03_analytics::{ContractDetector, DistributionAnalytics, DistributionAnalyzer};
use shared_types::{
    CheckStatus, DistributionEntry, ErrorCode, FormatSource, LeafFormat, MerkleComparison,
    ProposalRef, ResultError, VerificationMetadata, VerificationResult,
};

/// Orchestrates one verification run end to end.
///
/// Owns the analytics engine (and through it the optional contract
/// detector); the merkle engine is stateless and used per call.
#[derive(Clone, Debug, Default)]
pub struct VerificationService {
    analyzer: DistributionAnalyzer,
}

impl VerificationService {
    pub fn new() -> Self {
        Self {
            analyzer: DistributionAnalyzer::new(),
        }
    }

    /// Wires a contract-detection oracle into the statistics.
    pub fn with_detector(detector: Arc<dyn ContractDetector>) -> Self {
        Self {
            analyzer: DistributionAnalyzer::with_detector(detector),
        }
    }

    /// Verifies canonical entries against an expected root.
    ///
    /// `format_hint` short-circuits detection; without it the engine
    /// auto-detects and falls back to [`LeafFormat::FALLBACK`] with a
    /// warning when detection is inconclusive.
    #[instrument(skip(self, entries), fields(entries = entries.len()))]
    pub fn verify(
        &self,
        entries: &[DistributionEntry],
        expected_root_hex: &str,
        format_hint: Option<LeafFormat>,
    ) -> Result<VerificationResult, crate::VerifierError> {
        self.run(entries, expected_root_hex, format_hint, Vec::new(), None)
    }

    /// [`Self::verify`] over a normalizer output: payload warnings flow
    /// into the result's warning list.
    pub fn verify_normalized(
        &self,
        normalized: &NormalizedDistribution,
        expected_root_hex: &str,
        format_hint: Option<LeafFormat>,
    ) -> Result<VerificationResult, crate::VerifierError> {
        let payload_warnings = normalized
            .warnings
            .iter()
            .map(ToString::to_string)
            .collect();
        self.run(
            &normalized.entries,
            expected_root_hex,
            format_hint,
            payload_warnings,
            None,
        )
    }

    /// [`Self::verify`] with the governance proposal stamped into the
    /// result metadata.
    pub fn verify_proposal(
        &self,
        entries: &[DistributionEntry],
        expected_root_hex: &str,
        format_hint: Option<LeafFormat>,
        proposal: ProposalRef,
    ) -> Result<VerificationResult, crate::VerifierError> {
        self.run(
            entries,
            expected_root_hex,
            format_hint,
            Vec::new(),
            Some(proposal),
        )
    }

    fn run(
        &self,
        entries: &[DistributionEntry],
        expected_root_hex: &str,
        format_hint: Option<LeafFormat>,
        mut warnings: Vec<String>,
        proposal: Option<ProposalRef>,
    ) -> Result<VerificationResult, crate::VerifierError> {
        let started = Instant::now();
        let expected = parse_root_hex(expected_root_hex)?;
        let expected_hex = format!("0x{}", hex::encode(expected));

        let mut errors = Vec::new();

        // Format selection: hint wins, then detection, then fallback.
        let (format, format_source) = if entries.is_empty() {
            (None, None)
        } else if let Some(hint) = format_hint {
            (Some(hint), Some(FormatSource::Hint))
        } else {
            match detect_format(entries, &expected) {
                Ok(detected) => (Some(detected), Some(FormatSource::Detected)),
                // Inconclusive detection is recoverable: default + warn.
                Err(_) => {
                    warnings.push(format!(
                        "leaf format detection was inconclusive; defaulting to {}",
                        LeafFormat::FALLBACK
                    ));
                    (Some(LeafFormat::FALLBACK), Some(FormatSource::DefaultFallback))
                }
            }
        };

        let computed = match format {
            None => {
                errors.push(ResultError::new(
                    ErrorCode::EmptyDistribution,
                    "distribution contains no entries",
                ));
                None
            }
            Some(format) => match DistributionTree::build(entries, format) {
                Ok(tree) => Some(*tree.root()),
                Err(err) => {
                    errors.push(ResultError::new(ErrorCode::LeafEncoding, err.to_string()));
                    None
                }
            },
        };

        let matches = computed == Some(expected);
        if let Some(computed) = computed {
            if !matches {
                errors.push(ResultError::new(
                    ErrorCode::MerkleRootMismatch,
                    format!(
                        "computed root 0x{} does not match expected root {expected_hex}",
                        hex::encode(computed)
                    ),
                ));
            }
        }

        let analysis = self.analyzer.analyze(entries);
        for check in &analysis.checks {
            if check.status == CheckStatus::Warning {
                warnings.push(format!("{}: {}", check.name, check.description));
            }
        }
        let any_failed = analysis
            .checks
            .iter()
            .any(|check| check.status == CheckStatus::Failed);
        let success = matches && !any_failed;

        let result = VerificationResult {
            success,
            merkle: MerkleComparison {
                expected_root: expected_hex,
                computed_root: computed.map(|root| format!("0x{}", hex::encode(root))),
                matches,
            },
            checks: analysis.checks,
            metadata: VerificationMetadata {
                verification_id: Uuid::new_v4(),
                recipient_count: analysis.statistics.recipient_count,
                total_amount: analysis.statistics.total.clone(),
                leaf_format: format,
                format_source,
                duration_ms: started.elapsed().as_millis() as u64,
                timestamp: Utc::now(),
                proposal,
            },
            statistics: analysis.statistics,
            errors,
            warnings,
        };
        debug!(
            success = result.success,
            matches = result.merkle.matches,
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            "verification run complete"
        );
        Ok(result)
    }
}
