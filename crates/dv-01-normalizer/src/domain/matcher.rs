//! Matcher plumbing: the shape-function signature, the recursion context,
//! and the raw rows matchers hand to the conversion pass.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::NormalizeError;

/// Container shapes unwrap at most this many levels before the payload is
/// rejected. Real distributions nest once or twice.
pub const MAX_NESTING_DEPTH: usize = 8;

/// One recognized row before address/amount conversion.
#[derive(Clone, Debug, PartialEq)]
pub struct RawEntry {
    /// Address text exactly as the payload spelled it.
    pub address: String,
    /// The amount scalar, if the row carried one.
    pub amount: Option<Value>,
    /// Explicit claim index from the row, overriding its position.
    pub explicit_index: Option<u64>,
    /// Unconsumed row fields as raw text, preserved for downstream
    /// heuristics.
    pub extra: BTreeMap<String, String>,
}

/// Recursion state threaded through matching.
#[derive(Clone, Copy, Debug, Default)]
pub struct MatchContext {
    depth: usize,
}

impl MatchContext {
    pub fn root() -> Self {
        Self { depth: 0 }
    }

    /// Context for one unwrapped container level.
    pub fn deeper(self) -> Self {
        Self {
            depth: self.depth + 1,
        }
    }

    pub fn depth(self) -> usize {
        self.depth
    }

    pub fn exhausted(self) -> bool {
        self.depth > MAX_NESTING_DEPTH
    }
}

/// A structural matcher over one payload level.
///
/// `None` means "not my shape", and the next matcher is tried.
/// `Some(Err)` means the matcher claimed the shape but the payload is
/// unusable; a claimed shape never falls through.
pub type ShapeMatcher =
    fn(&Value, MatchContext) -> Option<Result<Vec<RawEntry>, NormalizeError>>;
