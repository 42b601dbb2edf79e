//! # Shared Types Crate
//!
//! This crate contains the amount and address models, canonical
//! distribution entries, leaf-encoding formats, and the verification
//! report records shared across the pipeline crates.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: all cross-crate types are defined here.
//! - **Exact Arithmetic**: amounts are 256-bit integers end to end; the
//!   only floating-point conversion in the workspace is the flagged
//!   scientific-notation parse path.
//! - **Raw-Preserving Entries**: entries keep the payload spelling next
//!   to the parse outcome, so integrity checks can report malformed rows
//!   instead of the normalizer silently dropping them.

pub mod address;
pub mod amount;
pub mod entry;
pub mod errors;
pub mod format;
pub mod report;

pub use address::{Address, ProblematicKind, RecipientAddress};
pub use amount::{Amount, AmountWarning, ParsedAmount, DEFAULT_DECIMALS};
pub use entry::{AmountOutcome, DistributionEntry, EntryAmount};
pub use errors::{AddressError, AmountError};
pub use format::LeafFormat;
pub use report::*;

// Re-export the big-integer primitives used across the pipeline crates.
pub use primitive_types::{U256, U512};
