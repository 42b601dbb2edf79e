//! # Verification Orchestrator
//!
//! Composes the merkle engine and the analytics engine into a single
//! verification call: given canonical entries and an expected root, pick
//! a leaf format (hint, detection, or fallback), build the tree, run
//! every integrity check, and emit one fully-populated
//! [`shared_types::VerificationResult`].
//!
//! A root mismatch is a normal outcome (`success = false` with a
//! `MERKLE_ROOT_MISMATCH` error), never an `Err`. The only error path is
//! input the orchestrator cannot work with at all: a malformed expected
//! root. The service performs no I/O of its own; the optional contract
//! detector is the analytics engine's concern.

pub mod error;
pub mod service;

pub use error::VerifierError;
pub use service::VerificationService;
