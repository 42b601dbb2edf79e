//! End-to-end acceptance scenarios.
//!
//! Each scenario drives the full pipeline the way the surrounding web
//! application would: raw JSON payload in, one verification result out.

#[cfg(test)]
mod tests {
    use serde_json::json;

    use dv_01_normalizer::{Normalizer, PayloadNormalizer};
    use dv_02_merkle::DistributionTree;
    use dv_04_verifier::VerificationService;
    use shared_types::{Amount, CheckStatus, ErrorCode, LeafFormat};

    use crate::fixtures;

    const ALICE: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1";
    const BOB: &str = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb2";

    /// Scenario A: two fixed recipients under the packed format produce
    /// a deterministic non-zero root; a second run reproduces the root
    /// and every proof bit for bit.
    #[test]
    fn test_scenario_a_deterministic_packed_root() {
        let entries = vec![
            fixtures::entry(ALICE, 1_000_000_000_000_000_000, 0),
            fixtures::entry(BOB, 2_000_000_000_000_000_000, 1),
        ];

        let first = DistributionTree::build(&entries, LeafFormat::Packed).unwrap();
        let second = DistributionTree::build(&entries, LeafFormat::Packed).unwrap();

        assert_ne!(first.root(), &[0u8; 32]);
        assert_eq!(first.root(), second.root());
        assert_eq!(first.proof(ALICE), second.proof(ALICE));
        assert_eq!(first.proof(BOB), second.proof(BOB));
    }

    /// Scenario B: a claims mapping normalizes to one entry carrying the
    /// mapping key as address and the claim's own amount and index.
    #[test]
    fn test_scenario_b_claims_mapping() {
        let payload = json!({
            "claims": {
                ALICE: { "amount": "5000", "index": 0 }
            }
        });
        let normalized = Normalizer::new().normalize(&payload).unwrap();
        assert_eq!(normalized.entries.len(), 1);
        let entry = &normalized.entries[0];
        assert_eq!(entry.address.grouping_key(), ALICE);
        assert_eq!(entry.amount.value(), Some(Amount::from(5_000u64)));
        assert_eq!(entry.index, 0);
    }

    /// Scenario C: an all-zeros expected root against a real
    /// distribution is a mismatch result, not a fault.
    #[test]
    fn test_scenario_c_zero_root_mismatch() {
        let entries = fixtures::entries(5);
        let zero_root = format!("0x{}", "00".repeat(32));
        let result = VerificationService::new()
            .verify(&entries, &zero_root, Some(LeafFormat::Packed))
            .unwrap();

        assert!(!result.success);
        assert!(!result.merkle.matches);
        let mismatches: Vec<_> = result
            .errors
            .iter()
            .filter(|e| e.code == ErrorCode::MerkleRootMismatch)
            .collect();
        assert_eq!(mismatches.len(), 1);
        assert!(mismatches[0].message.contains(&zero_root));
        assert!(mismatches[0]
            .message
            .contains(result.merkle.computed_root.as_ref().unwrap()));
    }

    /// Scenario D: a fractional amount truncates with a recorded
    /// warning; nothing is thrown.
    #[test]
    fn test_scenario_d_decimal_truncation_warns() {
        let payload = json!([{ "address": ALICE, "amount": "1.5" }]);
        let normalized = Normalizer::new().normalize(&payload).unwrap();

        assert_eq!(
            normalized.entries[0].amount.value(),
            Some(Amount::from(1_500_000_000_000_000_000u64))
        );
        assert_eq!(normalized.warnings.len(), 1);
        assert!(normalized.warnings[0].to_string().contains("1.5"));
    }

    /// Scenario E: verifying an empty entry sequence produces a failed
    /// Distribution Size check and empty statistics, without crashing.
    #[test]
    fn test_scenario_e_empty_distribution() {
        let zero_root = format!("0x{}", "00".repeat(32));
        let result = VerificationService::new()
            .verify(&[], &zero_root, None)
            .unwrap();

        assert!(!result.success);
        let size_check = result
            .checks
            .iter()
            .find(|c| c.name == "Distribution Size")
            .unwrap();
        assert_eq!(size_check.status, CheckStatus::Failed);
        assert!(size_check.is_critical_failure());
        assert_eq!(result.statistics.recipient_count, 0);
        assert_eq!(result.statistics.total, "0");
        assert_eq!(result.merkle.computed_root, None);
    }
}
