//! # Merkle Engine
//!
//! Deterministic merkle trees over canonical distribution entries.
//!
//! Three leaf conventions are supported (see [`shared_types::LeafFormat`]),
//! covering the encodings deployed distributor contracts actually use.
//! Above the leaves the rules are fixed: Keccak-256 throughout, sibling
//! pairs sorted byte-wise ascending before hashing, and a lone node at any
//! level promoted unchanged. Sorted pairs make proof verification
//! independent of left/right position, so a proof is just an ordered list
//! of sibling hashes.
//!
//! ## Modules
//!
//! - [`leaf`] - per-format leaf encoding and hashing
//! - [`tree`] - tree construction, root, and proof generation
//! - [`proof`] - standalone proof verification (no tree held)
//! - [`detect`] - format auto-detection against an expected root
//!
//! ## Invariants
//!
//! - `combine(a, b) == combine(b, a)` for all node pairs.
//! - A tree is built once per (entries, format) pair and never mutated.
//! - Entries whose address or amount failed to parse cannot be encoded;
//!   building a tree over them fails with the entry index.

pub mod detect;
pub mod error;
pub mod leaf;
pub mod proof;
pub mod tree;

pub use detect::{detect_format, DETECTION_SAMPLE};
pub use error::MerkleError;
pub use leaf::{combine, entry_leaf, keccak256, leaf_hash};
pub use proof::{parse_root_hex, verify_proof};
pub use tree::DistributionTree;
