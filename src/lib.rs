//! ZKP Commitment Tree
//!
//! This library maintains a fixed-depth, append-only MiMC commitment tree over
//! the BN254 scalar field and produces the Merkle membership witnesses a
//! zero-knowledge circuit needs to prove that a secret commitment belongs to a
//! published root, without revealing which one.
//!
//! # Components
//!
//! - [`FieldElement`]: BN254 scalar, with exact decimal/hex codecs
//! - [`HashOracle`]: the compression function, implemented by [`MimcSponge`]
//! - [`ZeroTable`]: zero-subtree values per level
//! - [`CommitmentRecord`]: nullifier, secret, commitment and nullifier hash
//! - [`Accumulator`]: root and authentication path from a leaf snapshot
//! - [`PathVerifier`]: independent root recomputation from a path
//! - [`ledger`]: the ordered commit log the leaves come from
//! - [`proof`]: the boundary to an external proof generator
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use zkp_commitment_tree::{Accumulator, FieldElement, MimcSponge};
//!
//! let accumulator = Accumulator::new(4, Arc::new(MimcSponge::new())).unwrap();
//! let leaves: Vec<FieldElement> = (1..=3u64).map(FieldElement::from).collect();
//!
//! let root = accumulator.root(&leaves).unwrap();
//! let path = accumulator.path_for(&leaves, &FieldElement::from(3)).unwrap();
//! let recomputed = accumulator.verifier().recompute(&FieldElement::from(3), &path).unwrap();
//! assert_eq!(recomputed, root);
//! ```
//!
//! # Deployment precondition
//!
//! Every party deriving roots must use the same field, the same oracle and
//! the same depth. A mismatch produces different roots silently; nothing in
//! this crate can detect it at runtime.

pub mod accumulator;
pub mod commitment;
pub mod config;
pub mod error;
pub mod field;
pub mod hash;
pub mod ledger;
pub mod mimc;
pub mod path;
pub mod proof;
pub mod types;
pub mod utils;
pub mod zeros;

#[cfg(test)]
mod accumulator_tests;

pub use accumulator::{Accumulator, MembershipWitness, MAX_TREE_DEPTH};
pub use commitment::CommitmentRecord;
pub use error::{AccumulatorError, PathDefect};
pub use field::{FieldElement, FieldParseError};
pub use hash::{HashOracle, OracleError};
pub use mimc::MimcSponge;
pub use path::{AuthenticationPath, PathVerifier};
pub use types::WitnessOutput;
pub use zeros::ZeroTable;

/// Default tree depth.
///
/// The value `20` matches the membership circuit, which is compiled for
/// exactly this many path levels, giving a capacity of 2^20 = 1,048,576
/// commitments.
///
/// # Compatibility
///
/// Changing the depth changes every root. The witness generator, the circuit
/// and the on-chain tree must all use the same value, or proofs will not
/// verify against published roots.
pub const DEFAULT_TREE_DEPTH: usize = 20;
