//! Ports Layer - API boundaries
//!
//! - `inbound` - the analysis API external components drive
//! - `outbound` - the optional contract-detection oracle this crate drives

pub mod inbound;
pub mod outbound;

pub use inbound::DistributionAnalytics;
pub use outbound::{ContractDetector, DetectorError};
