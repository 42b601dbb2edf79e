//! Full-pipeline flows: every recognized payload shape through
//! normalize → tree → verify, plus the cross-crate properties that only
//! show up when the crates are composed.

#[cfg(test)]
mod tests {
    use serde_json::json;

    use dv_01_normalizer::{NormalizeError, Normalizer, PayloadNormalizer};
    use dv_02_merkle::{verify_proof, DistributionTree};
    use dv_03_analytics::{check_names, DistributionAnalytics, DistributionAnalyzer};
    use dv_04_verifier::VerificationService;
    use shared_types::{Amount, CheckStatus, FormatSource, LeafFormat};

    use crate::fixtures;

    /// Normalize a payload, build its tree, and verify against its own
    /// root: the happy path every shape must survive.
    fn roundtrip(payload: &serde_json::Value, format: LeafFormat) {
        let normalized = Normalizer::new().normalize(payload).unwrap();
        let tree = DistributionTree::build(&normalized.entries, format).unwrap();
        let result = VerificationService::new()
            .verify_normalized(&normalized, &tree.root_hex(), Some(format))
            .unwrap();
        assert!(result.success, "self-verification must succeed");
        assert!(result.merkle.matches);
    }

    #[test]
    fn test_shape1_record_sequence_end_to_end() {
        roundtrip(&fixtures::record_sequence(12), LeafFormat::Packed);
    }

    #[test]
    fn test_shape2_claims_mapping_end_to_end() {
        let payload = json!({
            "claims": {
                (fixtures::address(0)): { "amount": "100", "index": 0 },
                (fixtures::address(1)): { "amount": "200", "index": 1 },
                (fixtures::address(2)): { "amount": "300", "index": 2 },
            }
        });
        roundtrip(&payload, LeafFormat::Indexed);
    }

    #[test]
    fn test_shape3_nested_container_end_to_end() {
        let payload = json!({ "recipients": fixtures::record_sequence(6) });
        roundtrip(&payload, LeafFormat::DoubleHashed);
    }

    #[test]
    fn test_shape4_proof_list_prefers_cumulative_amounts() {
        let payload = json!([
            { "user": fixtures::address(0), "amount": "10", "cumulativeAmount": "100" },
            { "user": fixtures::address(1), "amount": "20", "cumulativeAmount": "200" },
        ]);
        let normalized = Normalizer::new().normalize(&payload).unwrap();
        assert_eq!(
            normalized.entries[0].amount.value(),
            Some(Amount::from(100u64))
        );
        assert_eq!(
            normalized.entries[1].amount.value(),
            Some(Amount::from(200u64))
        );
        // Both spellings survive for downstream disambiguation.
        assert_eq!(
            normalized.entries[0].extra.get("amount").map(String::as_str),
            Some("10")
        );
        roundtrip(&payload, LeafFormat::Packed);
    }

    #[test]
    fn test_shape5_rooted_wrapper_discards_embedded_root() {
        // The wrapper-level root is a lie; the expected root comes from
        // the caller and the embedded one must not override it.
        let inner = fixtures::record_sequence(4);
        let payload = json!({
            "merkleRoot": format!("0x{}", "ff".repeat(32)),
            "recipients": inner,
        });
        let normalized = Normalizer::new().normalize(&payload).unwrap();
        assert_eq!(normalized.entries.len(), 4);

        let tree = DistributionTree::build(&normalized.entries, LeafFormat::Packed).unwrap();
        assert_ne!(tree.root_hex(), format!("0x{}", "ff".repeat(32)));
        roundtrip(&payload, LeafFormat::Packed);
    }

    #[test]
    fn test_shape6_address_keyed_mapping_end_to_end() {
        let payload = json!({
            (fixtures::address(0)): "1000",
            (fixtures::address(1)): "2000",
            (fixtures::address(2)): "3000",
        });
        roundtrip(&payload, LeafFormat::Packed);
    }

    /// Idempotence: re-normalizing serialized entries reproduces the
    /// same (address, amount, index) triples.
    #[test]
    fn test_normalize_is_idempotent_across_crates() {
        let normalized = Normalizer::new()
            .normalize(&fixtures::record_sequence(10))
            .unwrap();
        let reserialized = serde_json::to_value(&normalized.entries).unwrap();
        let again = Normalizer::new().normalize(&reserialized).unwrap();
        assert_eq!(again.entries, normalized.entries);

        // Idempotence extends to the root.
        let before = DistributionTree::build(&normalized.entries, LeafFormat::Indexed).unwrap();
        let after = DistributionTree::build(&again.entries, LeafFormat::Indexed).unwrap();
        assert_eq!(before.root(), after.root());
    }

    /// Every entry of a normalized payload holds a proof that verifies
    /// standalone, the way a claim front-end would check it.
    #[test]
    fn test_claim_front_end_flow() {
        let normalized = Normalizer::new()
            .normalize(&fixtures::record_sequence(9))
            .unwrap();
        let tree = DistributionTree::build(&normalized.entries, LeafFormat::DoubleHashed).unwrap();

        for entry in &normalized.entries {
            let valid = verify_proof(
                entry.address.raw(),
                &entry.amount.value().unwrap(),
                Some(entry.index),
                tree.proof(entry.address.raw()).unwrap(),
                &tree.root_hex(),
                LeafFormat::DoubleHashed,
            )
            .unwrap();
            assert!(valid, "claim for entry {} must verify", entry.index);
        }
    }

    /// Detection recovers the format a small distribution was hashed
    /// with; oversized distributions fall back with a recorded source.
    #[test]
    fn test_format_detection_through_the_orchestrator() {
        let small = Normalizer::new()
            .normalize(&fixtures::record_sequence(8))
            .unwrap();
        let tree = DistributionTree::build(&small.entries, LeafFormat::DoubleHashed).unwrap();
        let result = VerificationService::new()
            .verify(&small.entries, &tree.root_hex(), None)
            .unwrap();
        assert!(result.success);
        assert_eq!(result.metadata.format_source, Some(FormatSource::Detected));

        let large = Normalizer::new()
            .normalize(&fixtures::record_sequence(40))
            .unwrap();
        let tree = DistributionTree::build(&large.entries, LeafFormat::DoubleHashed).unwrap();
        let result = VerificationService::new()
            .verify(&large.entries, &tree.root_hex(), None)
            .unwrap();
        // Fallback picked the wrong format, so the run reports an honest
        // mismatch rather than a guessed success.
        assert_eq!(
            result.metadata.format_source,
            Some(FormatSource::DefaultFallback)
        );
        assert!(!result.merkle.matches);
    }

    /// A payload full of problems still produces one fully-populated
    /// result: warnings for the recoverable rows, failed checks for the
    /// fatal ones, statistics over what parsed.
    #[test]
    fn test_degraded_payload_produces_complete_result() {
        let payload = json!([
            { "address": fixtures::address(0), "amount": "1000" },
            { "address": fixtures::address(0), "amount": "2.5" },
            { "address": "0x0000000000000000000000000000000000000000", "amount": "50" },
            { "address": fixtures::address(2) },
        ]);
        let normalized = Normalizer::new().normalize(&payload).unwrap();
        let tree = DistributionTree::build(&normalized.entries, LeafFormat::Packed).unwrap();
        let result = VerificationService::new()
            .verify_normalized(&normalized, &tree.root_hex(), Some(LeafFormat::Packed))
            .unwrap();

        assert!(result.success, "warnings alone must not block success");
        let status_of = |name: &str| {
            result
                .checks
                .iter()
                .find(|c| c.name == name)
                .unwrap()
                .status
        };
        assert_eq!(status_of(check_names::DUPLICATES), CheckStatus::Warning);
        assert_eq!(status_of(check_names::PROBLEMATIC), CheckStatus::Warning);
        // Payload warnings (truncation, missing amount) made it through.
        assert!(result.warnings.iter().any(|w| w.contains("2.5")));
        assert!(result.warnings.iter().any(|w| w.contains("defaulted to zero")));
        assert_eq!(result.statistics.recipient_count, 4);
    }

    #[test]
    fn test_unsupported_payload_is_fatal() {
        let err = Normalizer::new().normalize(&json!(42)).unwrap_err();
        assert!(matches!(err, NormalizeError::UnsupportedPayload { .. }));
    }
}
