//! Payload builders shared by the integration tests and benchmarks.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};

use shared_types::{Amount, DistributionEntry, EntryAmount, RecipientAddress};

/// Deterministic 40-hex address derived from a counter.
pub fn address(n: u64) -> String {
    format!("0x{:040x}", 0xa11ce_0000u64 + n)
}

/// A canonical entry with an already-parsed amount.
pub fn entry(address: &str, amount: u64, index: u64) -> DistributionEntry {
    DistributionEntry::new(
        RecipientAddress::new(address),
        EntryAmount::from_amount(Amount::from(amount)),
        index,
    )
}

/// `n` clean entries with distinct addresses and varied amounts.
pub fn entries(n: u64) -> Vec<DistributionEntry> {
    (0..n)
        .map(|i| entry(&address(i), (i + 1) * 1_000, i))
        .collect()
}

/// Shape-1 record-sequence payload over the same addresses as
/// [`entries`].
pub fn record_sequence(n: u64) -> Value {
    Value::Array(
        (0..n)
            .map(|i| {
                json!({
                    "address": address(i),
                    "amount": ((i + 1) * 1_000).to_string(),
                })
            })
            .collect(),
    )
}

/// Record-sequence payload with randomized amounts, for benches.
pub fn random_record_sequence(n: u64, seed: u64) -> Value {
    let mut rng = StdRng::seed_from_u64(seed);
    Value::Array(
        (0..n)
            .map(|i| {
                let amount: u64 = rng.gen_range(1..1_000_000_000);
                json!({
                    "address": address(i),
                    "amount": amount.to_string(),
                })
            })
            .collect(),
    )
}
