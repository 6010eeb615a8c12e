//! Zero-subtree table.
//!
//! `Z[0]` is the empty-leaf constant and `Z[i] = hash2(Z[i-1], Z[i-1])` is the
//! root of an all-empty subtree of height `i`. The table is a pure function of
//! the depth and the oracle, so it can be rebuilt anywhere or shared read-only.

use crate::field::FieldElement;
use crate::hash::{HashOracle, OracleError};
use sha3::{Digest, Keccak256};

/// Domain string whose Keccak-256 digest, reduced modulo the prime, is the
/// empty-leaf value.
pub const EMPTY_LEAF_DOMAIN: &str = "tornado";

/// `keccak256("tornado") mod P`, in decimal.
pub const EMPTY_LEAF_DECIMAL: &str =
    "21663839004416932945382355908790599225266501822907911457504978515578255421292";

/// Derives the empty-leaf value `Z[0]` from [`EMPTY_LEAF_DOMAIN`].
#[must_use]
pub fn empty_leaf() -> FieldElement {
    let digest = Keccak256::digest(EMPTY_LEAF_DOMAIN.as_bytes());
    FieldElement::from_be_bytes_mod_order(&digest)
}

/// Precomputed zero-subtree values `Z[0..=depth]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZeroTable {
    values: Vec<FieldElement>,
}

impl ZeroTable {
    /// Computes the table for `depth` levels using `depth` calls to `hash2`.
    ///
    /// # Errors
    ///
    /// Propagates oracle failures unchanged.
    pub fn build<H: HashOracle + ?Sized>(depth: usize, oracle: &H) -> Result<Self, OracleError> {
        let mut values = Vec::with_capacity(depth + 1);
        let mut current = empty_leaf();
        values.push(current);
        for _ in 0..depth {
            current = oracle.hash2(&current, &current)?;
            values.push(current);
        }
        Ok(Self { values })
    }

    /// Number of levels above the leaves.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.values.len() - 1
    }

    /// Zero value at `level`, or `None` past the table's depth.
    #[must_use]
    pub fn get(&self, level: usize) -> Option<&FieldElement> {
        self.values.get(level)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[FieldElement] {
        &self.values
    }

    /// Callers index only levels `0..=depth`.
    pub(crate) fn at(&self, level: usize) -> FieldElement {
        self.values[level]
    }
}
