//! Ports Layer
//!
//! Defines the interfaces (traits) for:
//! - Driving Ports (inbound) - API for external callers
//!
//! The normalizer has no outbound dependencies.

pub mod inbound;

pub use inbound::PayloadNormalizer;
