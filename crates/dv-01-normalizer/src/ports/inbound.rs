//! Inbound Ports (Driving Ports)
//!
//! The API external components use to normalize distribution payloads.

use serde_json::Value;

use crate::domain::NormalizedDistribution;
use crate::error::NormalizeError;

/// Primary normalization API (Driving Port).
pub trait PayloadNormalizer: Send + Sync {
    /// Reduces a raw payload to canonical entries plus warnings.
    ///
    /// Structural failure of the whole payload is the only error path;
    /// imperfect rows degrade to warnings on the output.
    fn normalize(&self, payload: &Value) -> Result<NormalizedDistribution, NormalizeError>;
}
