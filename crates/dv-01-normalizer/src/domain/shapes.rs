//! # Payload Shape Matchers
//!
//! The ordered matcher list. Order is part of the contract: the first
//! structural claim wins, so a malformed record sequence is reported as a
//! malformed record sequence instead of sliding into a weaker reading.
//!
//! Shapes, in priority order:
//!
//! 1. Record sequence - array of objects with address + amount fields
//! 2. Claims mapping - `{"claims": {addr: {amount, ...}}}` or a bare
//!    mapping of keys to amount-bearing objects
//! 3. Nested container - `{"recipients": ...}` / `{"distribution": ...}`
//! 4. Proof list - claim-export records (`user` + cumulative amounts)
//! 5. Rooted wrapper - an embedded root hash next to the real payload
//! 6. Address-keyed mapping - flat `{addr: amount}` object

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use shared_types::Address;

use crate::domain::matcher::{MatchContext, RawEntry, ShapeMatcher, MAX_NESTING_DEPTH};
use crate::error::NormalizeError;

/// Field names that can hold the recipient address in record sequences.
pub const ADDRESS_FIELDS: [&str; 5] = ["address", "recipient", "account", "wallet", "to"];

/// Field names that can hold the amount in record sequences and mappings.
pub const AMOUNT_FIELDS: [&str; 5] = ["amount", "value", "balance", "quantity", "tokens"];

/// Address aliases used by claim/proof export tools.
pub const PROOF_ADDRESS_FIELDS: [&str; 4] = ["user", "account", "address", "recipient"];

/// Cumulative-claimable fields. Detected once on the first record and
/// authoritative over the plain amount for the whole sequence.
pub const CUMULATIVE_FIELDS: [&str; 4] = [
    "cumulativeAmount",
    "cumulative_amount",
    "cumulativeClaimable",
    "claimable",
];

/// Plain amount fields in proof lists.
pub const PLAIN_AMOUNT_FIELDS: [&str; 4] = ["amount", "earnings", "reward", "value"];

/// Wrapper keys that nest the true payload.
pub const CONTAINER_FIELDS: [&str; 2] = ["recipients", "distribution"];

/// Wrapper keys that carry an embedded (untrusted) root hash.
pub const ROOT_FIELDS: [&str; 3] = ["merkleRoot", "merkle_root", "root"];

const CLAIMS_FIELD: &str = "claims";
const INDEX_FIELD: &str = "index";

/// Matchers in priority order.
pub const MATCHERS: [ShapeMatcher; 6] = [
    match_record_sequence,
    match_claims_mapping,
    match_nested_container,
    match_proof_list,
    match_rooted_wrapper,
    match_address_mapping,
];

/// Runs the matcher list over one payload level.
pub fn match_payload(
    payload: &Value,
    ctx: MatchContext,
) -> Result<Vec<RawEntry>, NormalizeError> {
    if ctx.exhausted() {
        return Err(NormalizeError::NestingTooDeep {
            limit: MAX_NESTING_DEPTH,
        });
    }
    for matcher in MATCHERS {
        if let Some(outcome) = matcher(payload, ctx) {
            return outcome;
        }
    }
    Err(NormalizeError::UnsupportedPayload {
        received: json_type_name(payload),
    })
}

/// Shape 1: array of objects carrying an address-like and an amount-like
/// field. The empty array belongs to this shape and is the explicit
/// empty-distribution error.
fn match_record_sequence(
    payload: &Value,
    _ctx: MatchContext,
) -> Option<Result<Vec<RawEntry>, NormalizeError>> {
    let rows = payload.as_array()?;
    if rows.is_empty() {
        return Some(Err(NormalizeError::EmptyDistribution));
    }
    let first = rows.first()?.as_object()?;
    find_field(first, &ADDRESS_FIELDS)?;
    find_field(first, &AMOUNT_FIELDS)?;
    Some(collect_records(rows, &ADDRESS_FIELDS, true, |record| {
        find_field(record, &AMOUNT_FIELDS).map(|(key, value)| (key, value.clone()))
    }))
}

/// Shape 2: `{"claims": ...}` wrappers and bare mappings of keys to
/// amount-bearing objects. Map keys are the addresses.
fn match_claims_mapping(
    payload: &Value,
    ctx: MatchContext,
) -> Option<Result<Vec<RawEntry>, NormalizeError>> {
    let object = payload.as_object()?;
    if let Some(inner) = object.get(CLAIMS_FIELD) {
        return match inner {
            Value::Object(claims) if claims.is_empty() => {
                Some(Err(NormalizeError::EmptyDistribution))
            }
            Value::Object(claims) => Some(Ok(collect_mapping(claims))),
            Value::Array(_) => Some(match_payload(inner, ctx.deeper())),
            _ => None,
        };
    }
    let first_record = object.values().next()?.as_object()?;
    find_field(first_record, &AMOUNT_FIELDS)?;
    Some(Ok(collect_mapping(object)))
}

/// Shape 3: the true payload nested under a well-known container key.
/// Any shape may nest, so this recurses into the full matcher list.
fn match_nested_container(
    payload: &Value,
    ctx: MatchContext,
) -> Option<Result<Vec<RawEntry>, NormalizeError>> {
    let object = payload.as_object()?;
    for key in CONTAINER_FIELDS {
        if let Some(inner @ (Value::Array(_) | Value::Object(_))) = object.get(key) {
            return Some(match_payload(inner, ctx.deeper()));
        }
    }
    None
}

/// Shape 4: claim/proof export lists. A cumulative-claimable field on the
/// first record is authoritative for every record; both raw amount fields
/// stay in the row extras for downstream disambiguation.
fn match_proof_list(
    payload: &Value,
    _ctx: MatchContext,
) -> Option<Result<Vec<RawEntry>, NormalizeError>> {
    let rows = payload.as_array()?;
    let first = rows.first()?.as_object()?;
    find_field(first, &PROOF_ADDRESS_FIELDS)?;
    let cumulative = find_field(first, &CUMULATIVE_FIELDS).map(|(key, _)| key);
    Some(collect_records(
        rows,
        &PROOF_ADDRESS_FIELDS,
        false,
        move |record| match cumulative {
            Some(key) => record.get(key).map(|value| (key, value.clone())),
            None => find_field(record, &PLAIN_AMOUNT_FIELDS)
                .map(|(key, value)| (key, value.clone())),
        },
    ))
}

/// Shape 5: an embedded root hash alongside the real payload. The wrapper
/// root is discarded; expected roots arrive out of band and embedded ones
/// are untrusted.
fn match_rooted_wrapper(
    payload: &Value,
    ctx: MatchContext,
) -> Option<Result<Vec<RawEntry>, NormalizeError>> {
    let object = payload.as_object()?;
    let has_root = ROOT_FIELDS
        .iter()
        .any(|key| object.get(*key).is_some_and(looks_like_root));
    if !has_root {
        return None;
    }
    let remaining: Map<String, Value> = object
        .iter()
        .filter(|(key, value)| !(ROOT_FIELDS.contains(&key.as_str()) && looks_like_root(value)))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    if remaining.is_empty() {
        return Some(Err(NormalizeError::EmptyDistribution));
    }
    if remaining.len() == 1 {
        if let Some(inner) = remaining.values().next() {
            if inner.is_array() || inner.is_object() {
                return Some(match_payload(inner, ctx.deeper()));
            }
        }
    }
    Some(match_payload(&Value::Object(remaining), ctx.deeper()))
}

/// Shape 6: a flat object whose keys are mostly addresses. Every pair
/// becomes an entry; non-address keys surface through the address checks
/// instead of being silently skipped.
fn match_address_mapping(
    payload: &Value,
    _ctx: MatchContext,
) -> Option<Result<Vec<RawEntry>, NormalizeError>> {
    let object = payload.as_object()?;
    if object.is_empty() {
        return None;
    }
    let address_keys = object
        .keys()
        .filter(|key| Address::parse(key).is_ok())
        .count();
    if address_keys * 2 <= object.len() {
        return None;
    }
    Some(Ok(collect_mapping(object)))
}

/// Walks an array of record objects into raw rows.
///
/// `consume_amount` controls whether the matched amount field is removed
/// from the extras (record sequences) or kept there as well (proof lists,
/// where both amount spellings are preserved).
fn collect_records(
    rows: &[Value],
    address_aliases: &[&'static str],
    consume_amount: bool,
    amount_for: impl Fn(&Map<String, Value>) -> Option<(&'static str, Value)>,
) -> Result<Vec<RawEntry>, NormalizeError> {
    let mut entries = Vec::with_capacity(rows.len());
    for (position, row) in rows.iter().enumerate() {
        let record = row.as_object().ok_or(NormalizeError::MissingAddress {
            index: position,
            available: Vec::new(),
        })?;
        let (address_key, address_value) = find_field(record, address_aliases)
            .filter(|(_, value)| !value.is_null())
            .ok_or_else(|| NormalizeError::MissingAddress {
                index: position,
                available: record.keys().cloned().collect(),
            })?;
        let amount = amount_for(record);
        let explicit_index = record.get(INDEX_FIELD).and_then(Value::as_u64);

        let mut consumed = vec![address_key];
        if consume_amount {
            if let Some((amount_key, _)) = &amount {
                consumed.push(*amount_key);
            }
        }
        if explicit_index.is_some() {
            consumed.push(INDEX_FIELD);
        }

        entries.push(RawEntry {
            address: raw_text(address_value),
            amount: amount.map(|(_, value)| value),
            explicit_index,
            extra: leftover_fields(record, &consumed),
        });
    }
    Ok(entries)
}

/// Walks a key-to-value mapping into raw rows. Object values contribute
/// their amount field plus extras; scalar values are the amount itself.
fn collect_mapping(mapping: &Map<String, Value>) -> Vec<RawEntry> {
    mapping
        .iter()
        .map(|(key, value)| match value.as_object() {
            Some(record) => {
                let amount = find_field(record, &AMOUNT_FIELDS);
                let explicit_index = record.get(INDEX_FIELD).and_then(Value::as_u64);
                let mut consumed = Vec::new();
                if let Some((amount_key, _)) = &amount {
                    consumed.push(*amount_key);
                }
                if explicit_index.is_some() {
                    consumed.push(INDEX_FIELD);
                }
                RawEntry {
                    address: key.clone(),
                    amount: amount.map(|(_, value)| value.clone()),
                    explicit_index,
                    extra: leftover_fields(record, &consumed),
                }
            }
            None => RawEntry {
                address: key.clone(),
                amount: Some(value.clone()),
                explicit_index: None,
                extra: BTreeMap::new(),
            },
        })
        .collect()
}

fn find_field<'a>(
    record: &'a Map<String, Value>,
    aliases: &[&'static str],
) -> Option<(&'static str, &'a Value)> {
    aliases
        .iter()
        .find_map(|key| record.get(*key).map(|value| (*key, value)))
}

fn leftover_fields(record: &Map<String, Value>, consumed: &[&str]) -> BTreeMap<String, String> {
    record
        .iter()
        .filter(|(key, _)| !consumed.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), raw_text(value)))
        .collect()
}

fn raw_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn looks_like_root(value: &Value) -> bool {
    let Some(text) = value.as_str() else {
        return false;
    };
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    digits.len() == 64 && digits.bytes().all(|b| b.is_ascii_hexdigit())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
