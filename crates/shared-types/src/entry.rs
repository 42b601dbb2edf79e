//! # Canonical Distribution Entries
//!
//! One entry per recipient row, with the raw payload spellings preserved
//! alongside the parse outcomes. Entries that fail to parse are NOT
//! dropped here; the integrity checks downstream decide what a malformed
//! address or amount means for the whole distribution.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::address::{Address, RecipientAddress};
use crate::amount::{Amount, AmountWarning, DEFAULT_DECIMALS};
use crate::errors::AmountError;

/// How a raw payload scalar became an [`EntryAmount`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AmountOutcome {
    /// Parsed exactly, nothing to report.
    Exact,
    /// Parsed through a truncating or lossy path.
    Flagged(AmountWarning),
    /// Field was absent, null, or an empty string; the entry defaults to
    /// a valid zero amount.
    Missing,
    /// Value did not parse; the entry keeps the raw text and no value.
    Invalid(AmountError),
}

/// An entry amount as it appeared in the payload, paired with the parse
/// outcome. A missing field is a valid zero; an unparseable field keeps
/// its raw text with no value.
#[derive(Clone, PartialEq, Eq)]
pub struct EntryAmount {
    raw: String,
    value: Option<Amount>,
}

impl EntryAmount {
    /// Wraps an already-parsed amount, keeping its decimal form as raw.
    pub fn from_amount(amount: Amount) -> Self {
        Self {
            raw: amount.to_string(),
            value: Some(amount),
        }
    }

    /// The missing-field default: a valid zero with empty raw text.
    pub fn zero_missing() -> Self {
        Self {
            raw: String::new(),
            value: Some(Amount::ZERO),
        }
    }

    /// Converts the amount field of one payload row.
    ///
    /// `field` is `None` when the row had no amount key at all; JSON null
    /// and empty strings are treated the same way.
    pub fn convert(field: Option<&Value>, decimals: u32) -> (Self, AmountOutcome) {
        let value = match field {
            None | Some(Value::Null) => return (Self::zero_missing(), AmountOutcome::Missing),
            Some(value) => value,
        };
        match value {
            Value::String(s) => {
                if s.trim().is_empty() {
                    return (
                        Self {
                            raw: s.clone(),
                            value: Some(Amount::ZERO),
                        },
                        AmountOutcome::Missing,
                    );
                }
                match Amount::parse(s, decimals) {
                    Ok(parsed) => (
                        Self {
                            raw: s.clone(),
                            value: Some(parsed.amount),
                        },
                        match parsed.warning {
                            Some(warning) => AmountOutcome::Flagged(warning),
                            None => AmountOutcome::Exact,
                        },
                    ),
                    Err(err) => (
                        Self {
                            raw: s.clone(),
                            value: None,
                        },
                        AmountOutcome::Invalid(err),
                    ),
                }
            }
            Value::Number(n) => {
                let raw = n.to_string();
                if let Some(exact) = n.as_u64() {
                    return (
                        Self {
                            raw,
                            value: Some(Amount::from(exact)),
                        },
                        AmountOutcome::Exact,
                    );
                }
                if n.as_i64().is_some() {
                    return (
                        Self {
                            raw: raw.clone(),
                            value: None,
                        },
                        AmountOutcome::Invalid(AmountError::Negative { raw }),
                    );
                }
                // Non-integer or beyond-u64 JSON numbers arrive as f64.
                match n.as_f64().map(Amount::from_f64_floor) {
                    Some(Ok(amount)) => (
                        Self {
                            raw,
                            value: Some(amount),
                        },
                        AmountOutcome::Flagged(AmountWarning::LossyScientific),
                    ),
                    Some(Err(err)) => (
                        Self { raw, value: None },
                        AmountOutcome::Invalid(err),
                    ),
                    None => (
                        Self {
                            raw: raw.clone(),
                            value: None,
                        },
                        AmountOutcome::Invalid(AmountError::InvalidDigits { raw }),
                    ),
                }
            }
            other => {
                let received = json_type_name(other);
                (
                    Self {
                        raw: other.to_string(),
                        value: None,
                    },
                    AmountOutcome::Invalid(AmountError::UnsupportedType { received }),
                )
            }
        }
    }

    /// The payload spelling, preserved verbatim.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The parsed base-unit value, when the raw spelling parsed.
    pub fn value(&self) -> Option<Amount> {
        self.value
    }

    pub fn is_parseable(&self) -> bool {
        self.value.is_some()
    }
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

impl std::fmt::Display for EntryAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl std::fmt::Debug for EntryAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.value {
            Some(amount) => write!(f, "EntryAmount({} => {})", self.raw, amount),
            None => write!(f, "EntryAmount({} => invalid)", self.raw),
        }
    }
}

impl Serialize for EntryAmount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for EntryAmount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        let (amount, _) = EntryAmount::convert(Some(&raw), DEFAULT_DECIMALS);
        Ok(amount)
    }
}

/// One canonical recipient row.
///
/// `index` is the claim index used by index-bearing leaf encodings:
/// either the row's explicit index field or its zero-based position in
/// the payload. Unrecognized row fields ride along in `extra` as raw
/// text and are flattened back out on serialization, so serializing
/// entries yields a payload that re-normalizes to the same entries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionEntry {
    pub address: RecipientAddress,
    pub amount: EntryAmount,
    pub index: u64,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl DistributionEntry {
    pub fn new(address: RecipientAddress, amount: EntryAmount, index: u64) -> Self {
        Self {
            address,
            amount,
            index,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// The canonical (address, amount) pair, when both halves parsed.
    /// Leaf encoding requires this; reporting does not.
    pub fn canonical_pair(&self) -> Option<(Address, Amount)> {
        Some((self.address.canonical()?, self.amount.value()?))
    }

    /// Case-insensitive key for duplicate detection and proof lookup.
    pub fn grouping_key(&self) -> String {
        self.address.grouping_key()
    }
}
