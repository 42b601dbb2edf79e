//! # Leaf Encoding Formats
//!
//! The three leaf conventions seen in deployed distributor contracts.
//! Format selection is a closed decision: a distribution is either built
//! with an explicit format hint or the engine detects one of these three.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How one (index, address, amount) triple becomes a 32-byte leaf.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeafFormat {
    /// `keccak256(keccak256(abi.encode(address, amount)))`. The inner
    /// digest keeps leaves out of the internal-node preimage space.
    DoubleHashed,
    /// `keccak256(abi.encode(index, address, amount))`; the claim index
    /// is part of the leaf.
    Indexed,
    /// `keccak256(abi.encodePacked(address, amount))`: 20 address bytes
    /// directly followed by the 32-byte big-endian amount.
    Packed,
}

impl LeafFormat {
    /// Trial order used by format detection; first conclusive match wins.
    pub const DETECTION_ORDER: [LeafFormat; 3] =
        [LeafFormat::DoubleHashed, LeafFormat::Indexed, LeafFormat::Packed];

    /// Fallback when detection is inconclusive and no hint was given.
    pub const FALLBACK: LeafFormat = LeafFormat::Packed;

    pub fn as_str(&self) -> &'static str {
        match self {
            LeafFormat::DoubleHashed => "double_hashed",
            LeafFormat::Indexed => "indexed",
            LeafFormat::Packed => "packed",
        }
    }

    /// Whether the encoding commits to the claim index.
    pub fn uses_index(&self) -> bool {
        matches!(self, LeafFormat::Indexed)
    }
}

impl fmt::Display for LeafFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeafFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "double_hashed" | "double-hashed" | "doublehashed" => Ok(LeafFormat::DoubleHashed),
            "indexed" => Ok(LeafFormat::Indexed),
            "packed" => Ok(LeafFormat::Packed),
            other => Err(format!(
                "unknown leaf format {other:?}, expected double_hashed, indexed, or packed"
            )),
        }
    }
}
