//! # Error Types
//!
//! Defines the parse errors shared across the pipeline crates. Pipeline
//! crates layer their own error enums on top of these (normalization,
//! tree construction, orchestration) and convert with `#[from]`.

use thiserror::Error;

/// Errors that can occur while parsing a raw amount into base units.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// Negative amounts are rejected outright, never clamped to zero.
    #[error("amount cannot be negative: {raw}")]
    Negative { raw: String },

    /// Input matched none of the recognized numeric spellings.
    #[error("amount is not a recognized numeric form: {raw}")]
    InvalidDigits { raw: String },

    /// Value does not fit in 256 bits.
    #[error("amount exceeds 256 bits: {raw}")]
    Overflow { raw: String },

    /// Scientific-notation input parsed to NaN or infinity.
    #[error("amount is not a finite number: {raw}")]
    NonFinite { raw: String },

    /// Empty string where a numeric value was required.
    #[error("empty amount string")]
    Empty,

    /// Amount field held a JSON type no parse rule applies to.
    #[error("unsupported JSON type for amount: {received}")]
    UnsupportedType { received: &'static str },
}

/// Errors that can occur while parsing a raw address string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Address must be exactly 40 hex characters after the optional prefix.
    #[error("address must be 40 hex characters, got {length}: {raw}")]
    InvalidLength { raw: String, length: usize },

    /// Address contains characters outside [0-9a-fA-F].
    #[error("address contains non-hex characters: {raw}")]
    InvalidHex { raw: String },
}
