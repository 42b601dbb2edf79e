//! The seven named integrity checks.
//!
//! Each check yields exactly one [`ValidationCheck`]; names are part of
//! the report contract. Only address syntax and amount validity can fail
//! a distribution - duplicates, problematic addresses, outliers, and
//! concentration are warnings, since each has legitimate explanations
//! (tranches, treasury burns, founder allocations).

use std::collections::BTreeMap;

use primitive_types::U256;
use serde_json::json;
use shared_types::{DistributionEntry, ProblematicKind, Severity, ValidationCheck};

use crate::domain::check_names;
use crate::domain::statistics::{concentration, outlier_summary};
use shared_types::ConcentrationRisk;

/// Failed/Critical on zero entries; the caller short-circuits the rest.
pub fn check_size(entries: &[DistributionEntry]) -> ValidationCheck {
    if entries.is_empty() {
        ValidationCheck::failed(
            check_names::SIZE,
            Severity::Critical,
            "distribution contains no entries",
        )
    } else {
        ValidationCheck::passed(
            check_names::SIZE,
            Severity::Critical,
            format!("{} entries", entries.len()),
        )
    }
}

/// Every address must parse to the canonical 20-byte form.
pub fn check_address_format(entries: &[DistributionEntry]) -> ValidationCheck {
    let invalid: Vec<u64> = entries
        .iter()
        .filter(|entry| !entry.address.is_valid())
        .map(|entry| entry.index)
        .collect();
    if invalid.is_empty() {
        return ValidationCheck::passed(
            check_names::ADDRESS_FORMAT,
            Severity::Critical,
            "all addresses are well-formed",
        );
    }
    ValidationCheck::failed(
        check_names::ADDRESS_FORMAT,
        Severity::Critical,
        format!("{} malformed address(es)", invalid.len()),
    )
    .with_details(json!({ "count": invalid.len(), "indexes": invalid }))
}

/// Duplicate addresses are a warning, not a failure - several tranches
/// for one recipient are legitimate.
pub fn check_duplicates(entries: &[DistributionEntry]) -> ValidationCheck {
    let mut groups: BTreeMap<String, u64> = BTreeMap::new();
    for entry in entries {
        *groups.entry(entry.grouping_key()).or_insert(0) += 1;
    }
    let duplicated: Vec<(&String, &u64)> =
        groups.iter().filter(|(_, count)| **count > 1).collect();
    if duplicated.is_empty() {
        return ValidationCheck::passed(
            check_names::DUPLICATES,
            Severity::Medium,
            "no duplicate addresses",
        );
    }
    ValidationCheck::warning(
        check_names::DUPLICATES,
        Severity::Medium,
        format!("{} address(es) appear more than once", duplicated.len()),
    )
    .with_details(json!({
        "addresses": duplicated
            .iter()
            .map(|(address, count)| json!({ "address": address, "occurrences": count }))
            .collect::<Vec<_>>(),
    }))
}

/// Deny-list membership: zero, burn, and precompile addresses typically
/// cannot receive or usefully hold tokens.
pub fn check_problematic(entries: &[DistributionEntry]) -> ValidationCheck {
    let flagged: Vec<(u64, String, ProblematicKind)> = entries
        .iter()
        .filter_map(|entry| {
            let kind = entry.address.canonical()?.problematic_kind()?;
            Some((entry.index, entry.address.grouping_key(), kind))
        })
        .collect();
    if flagged.is_empty() {
        return ValidationCheck::passed(
            check_names::PROBLEMATIC,
            Severity::High,
            "no problematic addresses",
        );
    }
    ValidationCheck::warning(
        check_names::PROBLEMATIC,
        Severity::High,
        format!("{} problematic address(es)", flagged.len()),
    )
    .with_details(json!({
        "addresses": flagged
            .iter()
            .map(|(index, address, kind)| json!({
                "index": index,
                "address": address,
                "kind": kind,
            }))
            .collect::<Vec<_>>(),
    }))
}

/// Every amount must have parsed; zero is valid, absence of a value is not.
pub fn check_amount_validity(entries: &[DistributionEntry]) -> ValidationCheck {
    let invalid: Vec<u64> = entries
        .iter()
        .filter(|entry| !entry.amount.is_parseable())
        .map(|entry| entry.index)
        .collect();
    if invalid.is_empty() {
        return ValidationCheck::passed(
            check_names::AMOUNT_VALIDITY,
            Severity::Critical,
            "all amounts parse to non-negative integers",
        );
    }
    ValidationCheck::failed(
        check_names::AMOUNT_VALIDITY,
        Severity::Critical,
        format!("{} unparseable amount(s)", invalid.len()),
    )
    .with_details(json!({ "count": invalid.len(), "indexes": invalid }))
}

/// IQR outliers over the parseable amounts; skipped below four values.
pub fn check_outliers(sorted: &[U256]) -> ValidationCheck {
    let Some(summary) = outlier_summary(sorted) else {
        return ValidationCheck::skipped(
            check_names::OUTLIERS,
            Severity::Medium,
            "fewer than four parseable amounts",
        )
        .with_details(json!({ "bounds": {} }));
    };
    let bounds = json!({
        "q1": summary.q1.to_string(),
        "q3": summary.q3.to_string(),
        "lower": summary.lower.to_string(),
        "upper": summary.upper.to_string(),
    });
    if summary.outliers == 0 {
        return ValidationCheck::passed(
            check_names::OUTLIERS,
            Severity::Medium,
            "no amounts outside the IQR bounds",
        )
        .with_details(json!({ "bounds": bounds }));
    }
    ValidationCheck::warning(
        check_names::OUTLIERS,
        Severity::Medium,
        format!("{} amount(s) outside the IQR bounds", summary.outliers),
    )
    .with_details(json!({ "count": summary.outliers, "bounds": bounds }))
}

/// Concentration of the top decile; only the High bucket warns.
pub fn check_concentration(sorted: &[U256]) -> ValidationCheck {
    let total = sorted
        .iter()
        .fold(primitive_types::U512::zero(), |acc, x| {
            acc.saturating_add(primitive_types::U512::from(*x))
        });
    let report = concentration(sorted, total);
    let description = format!(
        "top {} recipient(s) hold {:.2}% of the total",
        report.top_count, report.top_share_percent
    );
    let details = json!({
        "risk": report.risk,
        "top_share_percent": report.top_share_percent,
        "top_count": report.top_count,
    });
    match report.risk {
        ConcentrationRisk::High => {
            ValidationCheck::warning(check_names::CONCENTRATION, Severity::Medium, description)
                .with_details(details)
        }
        _ => ValidationCheck::passed(check_names::CONCENTRATION, Severity::Medium, description)
            .with_details(details),
    }
}
