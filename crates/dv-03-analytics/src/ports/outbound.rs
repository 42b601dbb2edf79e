//! Outbound Ports (Driven Ports)
//!
//! The contract-detection oracle is the one external dependency the
//! analytics engine may consult. It answers, per address, whether code
//! is deployed there. Without a wired detector the contract/EOA
//! breakdown stays absent from the statistics - never guessed.

use shared_types::Address;
use thiserror::Error;

/// Contract detection failed as a whole; the breakdown is omitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetectorError {
    #[error("contract detection unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Contract-versus-EOA classifier (Driven Port).
///
/// Invoked at most once per analysis run, with every syntactically valid
/// address in the distribution. The returned vector is positional:
/// `result[i]` is `true` when `addresses[i]` hosts contract code.
pub trait ContractDetector: Send + Sync {
    fn classify(&self, addresses: &[Address]) -> Result<Vec<bool>, DetectorError>;
}
