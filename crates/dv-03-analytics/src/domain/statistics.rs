//! Exact-arithmetic distribution statistics.
//!
//! Everything here runs over the parseable amounts only; entries whose
//! amount failed to parse still count as recipients but contribute no
//! value. Accumulators are 512-bit so sums, squared deviations, and the
//! Gini weighted sum stay exact well past any realistic distribution.

use std::collections::HashMap;

use primitive_types::{U256, U512};
use shared_types::{
    ConcentrationReport, ConcentrationRisk, DistributionEntry, DistributionStatistics,
};

/// Fixed-point scale for the Gini computation: six decimal places.
const GINI_SCALE: u64 = 1_000_000;

/// IQR outlier bounds and the count of amounts outside them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutlierSummary {
    pub q1: U256,
    pub q3: U256,
    /// Q1 − 3·IQR/2, saturated at zero.
    pub lower: U512,
    /// Q3 + 3·IQR/2.
    pub upper: U512,
    pub outliers: u64,
}

/// The parseable amounts of a distribution, sorted ascending.
pub fn parseable_amounts(entries: &[DistributionEntry]) -> Vec<U256> {
    let mut amounts: Vec<U256> = entries
        .iter()
        .filter_map(|entry| entry.amount.value())
        .map(|amount| amount.value())
        .collect();
    amounts.sort_unstable();
    amounts
}

/// Unique-address and duplicated-address counts over lowercase keys.
pub fn address_counts(entries: &[DistributionEntry]) -> (u64, u64) {
    let mut groups: HashMap<String, u64> = HashMap::with_capacity(entries.len());
    for entry in entries {
        *groups.entry(entry.grouping_key()).or_insert(0) += 1;
    }
    let unique = groups.len() as u64;
    let duplicated = groups.values().filter(|count| **count > 1).count() as u64;
    (unique, duplicated)
}

/// One-pass statistics over a distribution. `sorted` must be the output
/// of [`parseable_amounts`] for the same entries.
pub fn compute(entries: &[DistributionEntry], sorted: &[U256]) -> DistributionStatistics {
    if entries.is_empty() {
        return DistributionStatistics::default();
    }
    let (unique_addresses, duplicate_addresses) = address_counts(entries);
    if sorted.is_empty() {
        return DistributionStatistics {
            recipient_count: entries.len() as u64,
            unique_addresses,
            duplicate_addresses,
            ..DistributionStatistics::default()
        };
    }

    let n = U512::from(sorted.len());
    let total: U512 = sorted
        .iter()
        .fold(U512::zero(), |acc, x| acc.saturating_add(U512::from(*x)));
    let mean = total / n;

    DistributionStatistics {
        recipient_count: entries.len() as u64,
        total: total.to_string(),
        mean: mean.to_string(),
        median: median(sorted).to_string(),
        stdev: stdev(sorted, mean).to_string(),
        min: sorted[0].to_string(),
        max: sorted[sorted.len() - 1].to_string(),
        gini: gini(sorted, total),
        concentration: concentration(sorted, total),
        unique_addresses,
        duplicate_addresses,
        accounts: None,
    }
}

/// Floor-averaged midpoint for even counts, the middle value otherwise.
pub fn median(sorted: &[U256]) -> U512 {
    let n = sorted.len();
    if n == 0 {
        return U512::zero();
    }
    if n % 2 == 1 {
        U512::from(sorted[n / 2])
    } else {
        (U512::from(sorted[n / 2 - 1]) + U512::from(sorted[n / 2])) / U512::from(2u8)
    }
}

/// Integer square root of the floor population variance.
fn stdev(sorted: &[U256], mean: U512) -> U512 {
    let n = U512::from(sorted.len());
    if n <= U512::one() {
        return U512::zero();
    }
    let sum_sq = sorted.iter().fold(U512::zero(), |acc, x| {
        let x = U512::from(*x);
        let diff = if x >= mean { x - mean } else { mean - x };
        acc.saturating_add(diff.saturating_mul(diff))
    });
    isqrt(sum_sq / n)
}

/// Gini coefficient over ascending amounts, in [0, 1].
///
/// With S = Σ amount[i]·(i+1) (1-indexed): gini = 2S/(n·total) − (n+1)/n,
/// evaluated in 512-bit fixed point at six decimal places and clamped.
/// Zero for n ≤ 1 or an all-zero total.
pub fn gini(sorted: &[U256], total: U512) -> f64 {
    let n = sorted.len() as u64;
    if n <= 1 || total.is_zero() {
        return 0.0;
    }

    let weighted = sorted
        .iter()
        .enumerate()
        .fold(U512::zero(), |acc, (i, x)| {
            acc.saturating_add(U512::from(*x).saturating_mul(U512::from(i as u64 + 1)))
        });

    let scale = U512::from(GINI_SCALE);
    // 2S·scale / (n·total), then subtract (n+1)·scale / n.
    let lorenz = weighted
        .saturating_mul(U512::from(2u8))
        .saturating_mul(scale)
        / total
        / U512::from(n);
    let offset = U512::from(n + 1).saturating_mul(scale) / U512::from(n);

    let fixed = lorenz.saturating_sub(offset).min(scale);
    fixed.as_u64() as f64 / GINI_SCALE as f64
}

/// Share of the total held by the top ceil(10%) (at least one) of
/// recipients, in integer basis points.
pub fn concentration(sorted: &[U256], total: U512) -> ConcentrationReport {
    let n = sorted.len();
    if n == 0 || total.is_zero() {
        return ConcentrationReport::default();
    }
    let top_count = n.div_ceil(10).max(1);
    let top_sum = sorted[n - top_count..]
        .iter()
        .fold(U512::zero(), |acc, x| acc.saturating_add(U512::from(*x)));

    let basis_points = (top_sum.saturating_mul(U512::from(10_000u64)) / total).as_u64();
    let risk = if basis_points > 8_000 {
        ConcentrationRisk::High
    } else if basis_points > 5_000 {
        ConcentrationRisk::Medium
    } else {
        ConcentrationRisk::Low
    };

    ConcentrationReport {
        risk,
        top_share_percent: basis_points as f64 / 100.0,
        top_count: top_count as u64,
    }
}

/// IQR outlier bounds over ascending amounts. `None` below four values.
pub fn outlier_summary(sorted: &[U256]) -> Option<OutlierSummary> {
    let n = sorted.len();
    if n < 4 {
        return None;
    }
    let q1 = sorted[n / 4];
    let q3 = sorted[3 * n / 4];
    let spread = U512::from(q3 - q1) * U512::from(3u8) / U512::from(2u8);

    let lower = U512::from(q1).saturating_sub(spread);
    let upper = U512::from(q3).saturating_add(spread);
    let outliers = sorted
        .iter()
        .filter(|x| {
            let x = U512::from(**x);
            x < lower || x > upper
        })
        .count() as u64;

    Some(OutlierSummary {
        q1,
        q3,
        lower,
        upper,
        outliers,
    })
}

/// Integer square root by Newton's method; exact floor for any input.
fn isqrt(value: U512) -> U512 {
    if value <= U512::one() {
        return value;
    }
    let mut x = U512::one() << ((value.bits() + 1) / 2);
    loop {
        let y = (x + value / x) >> 1;
        if y >= x {
            return x;
        }
        x = y;
    }
}
