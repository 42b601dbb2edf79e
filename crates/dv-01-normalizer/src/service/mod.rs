//! Service Layer
//!
//! Wires the shape matchers and the conversion pass behind the
//! `PayloadNormalizer` port.

pub mod normalizer;

pub use normalizer::Normalizer;
