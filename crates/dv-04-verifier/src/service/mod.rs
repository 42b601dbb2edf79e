//! Service Layer - Verification orchestration

pub mod verifier;

pub use verifier::VerificationService;
