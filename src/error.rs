//! Error kinds of the accumulator core.

use crate::field::FieldElement;
use crate::hash::OracleError;
use thiserror::Error;

/// Why an authentication path was rejected before any hashing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathDefect {
    #[error("expected {expected} levels, got {siblings} siblings and {directions} directions")]
    LengthMismatch {
        expected: usize,
        siblings: usize,
        directions: usize,
    },
    #[error("direction bit at level {level} is {value}, expected 0 or 1")]
    InvalidDirection { level: usize, value: u8 },
}

/// Errors returned by the accumulator, zero table and path verifier.
///
/// All failures are local and synchronous; no partial layers are ever
/// observable after an error.
#[derive(Debug, Error)]
pub enum AccumulatorError {
    #[error("invalid tree depth {depth}: must be between 1 and {max}")]
    InvalidDepth { depth: usize, max: usize },

    #[error("tree is full: {len} leaves exceed capacity {capacity}")]
    CapacityExceeded { len: usize, capacity: u64 },

    #[error("element {0} not found in leaf sequence")]
    ElementNotFound(FieldElement),

    #[error("malformed authentication path: {0}")]
    MalformedPath(#[from] PathDefect),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}
