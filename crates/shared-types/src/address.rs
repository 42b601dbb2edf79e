//! # Address Model
//!
//! Canonical 20-byte account identifiers with checksum-aware parsing.
//!
//! Equality and grouping are case-insensitive: two spellings of the same
//! account compare equal once parsed. Mixed-case inputs additionally carry
//! an EIP-55 checksum signal that callers can verify without failing the
//! parse, and a small registry of problematic addresses (zero, burn,
//! precompiles) backs the integrity checks.

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};

use crate::errors::AddressError;

/// A canonical 20-byte account address.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; 20]);

/// Why an address belongs to the problematic registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblematicKind {
    /// The all-zero address; tokens sent here are unrecoverable.
    Zero,
    /// The conventional burn sink `0x…dEaD`.
    Burn,
    /// A protocol precompile (0x1 through 0x9).
    Precompile,
}

impl Address {
    /// The all-zero address.
    pub const ZERO: Address = Address([0u8; 20]);

    /// The conventional burn address `0x000000000000000000000000000000000000dEaD`.
    pub const BURN: Address = Address([
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0xde, 0xad,
    ]);

    pub fn new(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }

    /// Parses a 40-hex-character address, with or without the `0x` prefix,
    /// in any letter case. Checksum casing is NOT enforced here; use
    /// [`Address::checksum_signal`] on the raw text to inspect it.
    pub fn parse(raw: &str) -> Result<Self, AddressError> {
        let trimmed = raw.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if digits.len() != 40 {
            return Err(AddressError::InvalidLength {
                raw: trimmed.to_string(),
                length: digits.len(),
            });
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes).map_err(|_| AddressError::InvalidHex {
            raw: trimmed.to_string(),
        })?;
        Ok(Address(bytes))
    }

    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != 20 {
            return None;
        }
        let mut buf = [0u8; 20];
        buf.copy_from_slice(bytes);
        Some(Address(buf))
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Lowercase `0x`-prefixed form, the canonical comparison spelling.
    pub fn to_lowercase_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// EIP-55 mixed-case form: a letter is uppercased when the matching
    /// nibble of keccak256(lowercase_hex_without_prefix) is >= 8.
    pub fn to_checksum_hex(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = Keccak256::digest(lower.as_bytes());
        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, ch) in lower.chars().enumerate() {
            if ch.is_ascii_alphabetic() && checksum_nibble(&hash, i) >= 8 {
                out.push(ch.to_ascii_uppercase());
            } else {
                out.push(ch);
            }
        }
        out
    }

    /// Reports whether a raw spelling carries a checksum signal, and if so
    /// whether it is consistent.
    ///
    /// Returns `None` for all-lowercase, all-uppercase, or digits-only
    /// spellings (no signal to check), `Some(true)` when the mixed casing
    /// matches EIP-55, and `Some(false)` when it does not.
    pub fn checksum_signal(raw: &str) -> Option<bool> {
        let trimmed = raw.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
        let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
        if !has_upper || !has_lower {
            return None;
        }
        let address = Address::parse(trimmed).ok()?;
        Some(address.to_checksum_hex()[2..] == *digits)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    pub fn is_burn(&self) -> bool {
        *self == Address::BURN
    }

    /// Precompile addresses 0x1 through 0x9: first 19 bytes zero, final
    /// byte in 1..=9.
    pub fn is_precompile(&self) -> bool {
        self.0[..19] == [0u8; 19] && (1..=9).contains(&self.0[19])
    }

    /// Membership in the problematic-address registry, if any.
    pub fn problematic_kind(&self) -> Option<ProblematicKind> {
        if self.is_zero() {
            Some(ProblematicKind::Zero)
        } else if self.is_burn() {
            Some(ProblematicKind::Burn)
        } else if self.is_precompile() {
            Some(ProblematicKind::Precompile)
        } else {
            None
        }
    }
}

fn checksum_nibble(hash: &[u8], index: usize) -> u8 {
    let byte = hash[index / 2];
    if index % 2 == 0 {
        byte >> 4
    } else {
        byte & 0x0f
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_lowercase_hex())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_lowercase_hex())
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_lowercase_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Address::parse(&raw).map_err(de::Error::custom)
    }
}

/// A recipient address as it appeared in the payload, paired with the
/// parse outcome.
///
/// Malformed addresses survive normalization so the integrity checks can
/// count and report them; only leaf encoding requires the canonical form.
#[derive(Clone, PartialEq, Eq)]
pub struct RecipientAddress {
    raw: String,
    parsed: Option<Address>,
}

impl RecipientAddress {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into().trim().to_string();
        let parsed = Address::parse(&raw).ok();
        Self { raw, parsed }
    }

    pub fn from_address(address: Address) -> Self {
        Self {
            raw: address.to_lowercase_hex(),
            parsed: Some(address),
        }
    }

    /// The payload spelling, preserved verbatim (minus surrounding space).
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The canonical form, when the raw spelling parsed.
    pub fn canonical(&self) -> Option<Address> {
        self.parsed
    }

    pub fn is_valid(&self) -> bool {
        self.parsed.is_some()
    }

    /// Case-insensitive key for duplicate detection and proof lookup.
    pub fn grouping_key(&self) -> String {
        self.raw.to_ascii_lowercase()
    }

    /// EIP-55 signal of the raw spelling; `None` when the spelling carries
    /// no signal or did not parse.
    pub fn checksum_signal(&self) -> Option<bool> {
        if self.parsed.is_none() {
            return None;
        }
        Address::checksum_signal(&self.raw)
    }
}

impl fmt::Display for RecipientAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl fmt::Debug for RecipientAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecipientAddress({})", self.raw)
    }
}

impl Serialize for RecipientAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for RecipientAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(RecipientAddress::new(raw))
    }
}
