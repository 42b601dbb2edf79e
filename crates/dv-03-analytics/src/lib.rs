//! # Validation & Statistics Engine
//!
//! Integrity checks and distributional statistics over canonical entries.
//!
//! The engine is a pure function of its input: it never mutates entries,
//! performs no I/O of its own, and produces one [`ValidationCheck`] per
//! named check plus one [`DistributionStatistics`] record per run. All
//! amount arithmetic is 256-bit exact with 512-bit intermediates; the
//! Gini coefficient and percentage shares are the only floating-point
//! presentation values.
//!
//! [`ValidationCheck`]: shared_types::ValidationCheck
//! [`DistributionStatistics`]: shared_types::DistributionStatistics
//!
//! ## Layers
//!
//! - `domain` - the checks and the statistics math (pure)
//! - `ports` - the `DistributionAnalytics` driving port and the optional
//!   `ContractDetector` oracle (driven port)
//! - `service` - the `DistributionAnalyzer` implementation

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{check_names, DistributionAnalysis};
pub use ports::{ContractDetector, DetectorError, DistributionAnalytics};
pub use service::DistributionAnalyzer;
