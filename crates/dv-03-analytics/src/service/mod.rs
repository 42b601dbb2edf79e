//! Service Layer - Analysis orchestration

pub mod analyzer;

pub use analyzer::DistributionAnalyzer;
