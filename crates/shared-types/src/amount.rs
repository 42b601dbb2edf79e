//! # Amount Model
//!
//! Exact non-negative token amounts in base units.
//!
//! Distribution payloads spell amounts in several ways: already-scaled
//! integer strings, 0x-prefixed hex strings, human-readable decimals
//! ("1.5"), scientific notation, and plain JSON numbers. [`Amount::parse`]
//! normalizes all of them to a single 256-bit base-unit value and reports
//! when a truncating or lossy path was taken.
//!
//! ## Parse rules
//!
//! | Input shape            | Path                                   | Flag |
//! |------------------------|----------------------------------------|------|
//! | `"1500000000000000000"`| exact decimal                          | none |
//! | `"0x14d1120d7b160000"` | exact hex                              | none |
//! | `"1.5"`                | scaled by 10^decimals, truncated       | [`AmountWarning::DecimalTruncated`] |
//! | `"2e18"`               | floating parse, floored                | [`AmountWarning::LossyScientific`]  |
//! | `-…` / garbage / >2^256| rejected with [`AmountError`]          | —    |
//!
//! Truncation is always toward zero; nothing is ever rounded up.

use std::fmt;

use primitive_types::U256;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::AmountError;

/// Default decimal scaling for human-readable amounts ("1.5" → 1.5 × 10^18).
pub const DEFAULT_DECIMALS: u32 = 18;

/// A non-negative token amount in base units.
///
/// Wraps a 256-bit unsigned integer so that on-chain balances are always
/// representable. All arithmetic exposed here is checked or saturating;
/// there is no panicking operator path.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(U256);

/// Flagged conversion applied while parsing an amount.
///
/// These are warnings, not errors: the parse succeeded, but the input was
/// reshaped in a way callers must surface to their own reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountWarning {
    /// Input carried a decimal point and was scaled; fractional digits
    /// beyond the configured precision are dropped, never rounded.
    DecimalTruncated,
    /// Input went through the floating-point path (scientific notation or
    /// a JSON float); magnitudes beyond 2^53 lose precision.
    LossyScientific,
}

/// Outcome of parsing one raw amount: the value plus an optional flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParsedAmount {
    pub amount: Amount,
    pub warning: Option<AmountWarning>,
}

impl ParsedAmount {
    fn exact(amount: Amount) -> Self {
        Self {
            amount,
            warning: None,
        }
    }

    fn flagged(amount: Amount, warning: AmountWarning) -> Self {
        Self {
            amount,
            warning: Some(warning),
        }
    }
}

impl Amount {
    /// The zero amount. Zero is a valid amount, distinct from a missing one.
    pub const ZERO: Amount = Amount(U256::zero());

    /// Wraps an already-scaled base-unit value.
    pub fn new(value: U256) -> Self {
        Amount(value)
    }

    /// Parses an exact base-10 integer string. No scaling, no flags.
    pub fn from_dec_str(raw: &str) -> Result<Self, AmountError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AmountError::Empty);
        }
        if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AmountError::InvalidDigits {
                raw: trimmed.to_string(),
            });
        }
        // All-digit input can only fail by exceeding 256 bits.
        U256::from_dec_str(trimmed)
            .map(Amount)
            .map_err(|_| AmountError::Overflow {
                raw: trimmed.to_string(),
            })
    }

    /// Parses a raw amount string into base units.
    ///
    /// `decimals` only applies to inputs with a decimal point; integer,
    /// hex, and scientific inputs are taken as already-scaled base units.
    pub fn parse(raw: &str, decimals: u32) -> Result<ParsedAmount, AmountError> {
        let s = raw.trim();
        if s.is_empty() {
            return Err(AmountError::Empty);
        }
        if s.starts_with('-') {
            return Err(AmountError::Negative { raw: s.to_string() });
        }
        if let Some(hex_digits) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            return Self::parse_hex(s, hex_digits).map(ParsedAmount::exact);
        }
        if s.bytes().all(|b| b.is_ascii_digit()) {
            return Self::from_dec_str(s).map(ParsedAmount::exact);
        }
        if s.contains(['e', 'E']) {
            return Self::parse_scientific(s);
        }
        if s.contains('.') {
            return Self::parse_decimal(s, decimals);
        }
        Err(AmountError::InvalidDigits { raw: s.to_string() })
    }

    fn parse_hex(raw: &str, hex_digits: &str) -> Result<Self, AmountError> {
        if hex_digits.is_empty() || !hex_digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(AmountError::InvalidDigits {
                raw: raw.to_string(),
            });
        }
        let significant = hex_digits.trim_start_matches('0');
        if significant.len() > 64 {
            return Err(AmountError::Overflow {
                raw: raw.to_string(),
            });
        }
        if significant.is_empty() {
            return Ok(Amount::ZERO);
        }
        significant
            .parse::<U256>()
            .map(Amount)
            .map_err(|_| AmountError::InvalidDigits {
                raw: raw.to_string(),
            })
    }

    /// Scientific notation goes through the one sanctioned floating-point
    /// path in the workspace: parse as f64, floor, convert exactly.
    fn parse_scientific(raw: &str) -> Result<ParsedAmount, AmountError> {
        let parsed: f64 = raw.parse().map_err(|_| AmountError::InvalidDigits {
            raw: raw.to_string(),
        })?;
        Self::from_f64_floor(parsed)
            .map(|amount| ParsedAmount::flagged(amount, AmountWarning::LossyScientific))
            .map_err(|err| match err {
                // Re-attach the original text, the f64 lost it.
                AmountError::Negative { .. } => AmountError::Negative {
                    raw: raw.to_string(),
                },
                AmountError::Overflow { .. } => AmountError::Overflow {
                    raw: raw.to_string(),
                },
                AmountError::NonFinite { .. } => AmountError::NonFinite {
                    raw: raw.to_string(),
                },
                other => other,
            })
    }

    /// Decimal-point input: scale the integer part by 10^decimals and keep
    /// at most `decimals` fractional digits. `"1.5"` with 18 decimals is
    /// 1_500_000_000_000_000_000; `"1.123456789012345678999"` drops the
    /// digits past position 18.
    fn parse_decimal(raw: &str, decimals: u32) -> Result<ParsedAmount, AmountError> {
        let invalid = || AmountError::InvalidDigits {
            raw: raw.to_string(),
        };
        let overflow = || AmountError::Overflow {
            raw: raw.to_string(),
        };

        let (int_part, frac_part) = match raw.split_once('.') {
            Some(parts) => parts,
            None => return Err(invalid()),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let scale = U256::from(10u8)
            .checked_pow(U256::from(decimals))
            .ok_or_else(overflow)?;
        let whole = if int_part.is_empty() {
            U256::zero()
        } else {
            U256::from_dec_str(int_part).map_err(|_| overflow())?
        };
        let scaled_whole = whole.checked_mul(scale).ok_or_else(overflow)?;

        let kept = &frac_part[..frac_part.len().min(decimals as usize)];
        let fraction = if kept.is_empty() {
            U256::zero()
        } else {
            let digits = U256::from_dec_str(kept).map_err(|_| overflow())?;
            let pad = U256::from(10u8)
                .checked_pow(U256::from(decimals - kept.len() as u32))
                .ok_or_else(overflow)?;
            digits.checked_mul(pad).ok_or_else(overflow)?
        };

        let value = scaled_whole.checked_add(fraction).ok_or_else(overflow)?;
        Ok(ParsedAmount::flagged(
            Amount(value),
            AmountWarning::DecimalTruncated,
        ))
    }

    /// Converts a float to base units exactly: floor toward zero, then
    /// decompose the IEEE-754 bits so no second rounding step occurs.
    pub fn from_f64_floor(value: f64) -> Result<Self, AmountError> {
        if !value.is_finite() {
            return Err(AmountError::NonFinite {
                raw: value.to_string(),
            });
        }
        if value < 0.0 {
            return Err(AmountError::Negative {
                raw: value.to_string(),
            });
        }
        let floored = value.floor();
        if floored == 0.0 {
            return Ok(Amount::ZERO);
        }

        let bits = floored.to_bits();
        let exponent = ((bits >> 52) & 0x7ff) as i64;
        let mantissa = (bits & 0x000f_ffff_ffff_ffff) | (1u64 << 52);
        // floored >= 1.0, so the exponent is biased-normal and the shift
        // never drops below -52.
        let shift = exponent - 1075;
        if shift <= 0 {
            Ok(Amount(U256::from(mantissa >> (-shift) as u32)))
        } else if shift > 203 {
            // 53 mantissa bits shifted past 203 no longer fit in 256.
            Err(AmountError::Overflow {
                raw: value.to_string(),
            })
        } else {
            Ok(Amount(U256::from(mantissa) << shift as usize))
        }
    }

    /// The wrapped base-unit value.
    pub fn value(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn checked_add(&self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    pub fn checked_sub(&self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }

    pub fn saturating_add(&self, other: Amount) -> Amount {
        Amount(self.0.saturating_add(other.0))
    }

    /// Big-endian 32-byte form, as the amount appears inside leaf preimages.
    pub fn to_be_bytes(&self) -> [u8; 32] {
        let mut buf = [0u8; 32];
        self.0.to_big_endian(&mut buf);
        buf
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Amount(U256::from(value))
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Amount(U256::from(value))
    }
}

impl From<U256> for Amount {
    fn from(value: U256) -> Self {
        Amount(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Amount({})", self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct AmountVisitor;

        impl<'de> de::Visitor<'de> for AmountVisitor {
            type Value = Amount;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a base-unit integer as a decimal string, hex string, or number")
            }

            fn visit_str<E>(self, value: &str) -> Result<Amount, E>
            where
                E: de::Error,
            {
                if let Some(hex_digits) = value
                    .strip_prefix("0x")
                    .or_else(|| value.strip_prefix("0X"))
                {
                    return Amount::parse_hex(value, hex_digits).map_err(de::Error::custom);
                }
                Amount::from_dec_str(value).map_err(de::Error::custom)
            }

            fn visit_u64<E>(self, value: u64) -> Result<Amount, E>
            where
                E: de::Error,
            {
                Ok(Amount::from(value))
            }
        }

        deserializer.deserialize_any(AmountVisitor)
    }
}
