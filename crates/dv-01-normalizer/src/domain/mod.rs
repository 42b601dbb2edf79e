//! Domain Layer - Pure payload analysis
//!
//! This layer contains:
//! - The structural shape matchers and their priority order
//! - The raw-row representation matchers produce
//! - The normalized output and per-row warning model
//!
//! RULES:
//! - No I/O operations
//! - No logging (the service layer owns tracing)
//! - Pure functions over `serde_json::Value`

pub mod distribution;
pub mod matcher;
pub mod shapes;

pub use distribution::{NormalizeWarning, NormalizedDistribution};
pub use matcher::{MatchContext, RawEntry, ShapeMatcher, MAX_NESTING_DEPTH};
pub use shapes::{match_payload, MATCHERS};
