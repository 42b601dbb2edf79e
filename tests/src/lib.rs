//! # Drop-Verify Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Payload builders shared by tests and benches
//! └── integration/      # Cross-crate pipeline flows
//!     ├── pipeline.rs   # normalize → verify, all payload shapes
//!     └── scenarios.rs  # End-to-end acceptance scenarios
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p dv-tests
//!
//! # By category
//! cargo test -p dv-tests integration::
//!
//! # Benchmarks
//! cargo bench -p dv-tests
//! ```

pub mod fixtures;
pub mod integration;
