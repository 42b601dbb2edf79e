//! Cross-crate integration flows.

pub mod pipeline;
pub mod scenarios;
