//! Hash oracle abstraction.
//!
//! The accumulator only ever sees a fixed-arity compression function over the
//! field. Both the witness generator and any party that re-derives roots must
//! use the same oracle; a mismatch is not detectable here and silently yields
//! different roots.

use crate::field::FieldElement;
use std::error::Error as StdError;
use thiserror::Error;

/// Failure reported by a hash oracle.
///
/// Local oracles never fail. Remote ones wrap their transport error here and
/// it is propagated to the caller unchanged; nothing in this crate retries.
#[derive(Debug, Error)]
#[error("hash oracle failure: {source}")]
pub struct OracleError {
    #[source]
    source: Box<dyn StdError + Send + Sync + 'static>,
}

impl OracleError {
    pub fn new(source: impl Into<Box<dyn StdError + Send + Sync + 'static>>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

/// A 1-ary and 2-ary compression function over [`FieldElement`].
pub trait HashOracle: Send + Sync {
    /// Hashes a single element (used for nullifier hashes).
    fn hash1(&self, x: &FieldElement) -> Result<FieldElement, OracleError>;

    /// Hashes an ordered pair (used for tree nodes and commitments).
    fn hash2(&self, left: &FieldElement, right: &FieldElement)
        -> Result<FieldElement, OracleError>;
}

impl<H: HashOracle + ?Sized> HashOracle for std::sync::Arc<H> {
    fn hash1(&self, x: &FieldElement) -> Result<FieldElement, OracleError> {
        (**self).hash1(x)
    }

    fn hash2(
        &self,
        left: &FieldElement,
        right: &FieldElement,
    ) -> Result<FieldElement, OracleError> {
        (**self).hash2(left, right)
    }
}
