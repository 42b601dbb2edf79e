//! # Distribution Normalizer
//!
//! Reduces raw untyped JSON payloads to canonical distribution entries.
//!
//! Published distributions arrive in many shapes: record sequences, claims
//! mappings, nested containers, proof-export lists, rooted wrappers, and
//! flat address-keyed mappings. An ordered list of structural matchers
//! recognizes the shape; a single post-processing pass then converts rows
//! into [`shared_types::DistributionEntry`] values, accumulating per-entry
//! warnings instead of dropping imperfect rows.
//!
//! ## Layers
//!
//! - `domain` - shape matchers and the warning model (pure, no I/O)
//! - `ports` - the `PayloadNormalizer` driving port
//! - `service` - the `Normalizer` implementation
//!
//! ## Invariants
//!
//! - Matcher order is fixed; the first structural claim wins and a claimed
//!   shape never falls through to a weaker interpretation.
//! - Only whole-payload structural failures are errors. A malformed
//!   address or amount inside a recognized shape survives normalization
//!   and is flagged downstream.
//! - Entry indexes follow payload order unless a row carries an explicit
//!   `index` field.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use domain::{NormalizeWarning, NormalizedDistribution};
pub use error::NormalizeError;
pub use ports::PayloadNormalizer;
pub use service::Normalizer;
