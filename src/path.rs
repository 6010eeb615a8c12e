//! Authentication paths and the independent root recomputation.

use crate::error::{AccumulatorError, PathDefect};
use crate::field::FieldElement;
use crate::hash::HashOracle;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::sync::Arc;

/// Sibling values and side indicators from a leaf up to the root.
///
/// Index 0 is the leaf level. `directions[i] == 0` means the running node is
/// the left child at level `i`, `1` means it is the right child. Directions
/// are kept as raw bytes so out-of-range values can be rejected instead of
/// being reinterpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationPath {
    #[serde(rename = "pathElements")]
    pub siblings: Vec<FieldElement>,
    #[serde(rename = "pathIndices", deserialize_with = "deserialize_directions")]
    pub directions: Vec<u8>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DirectionRepr {
    Number(u64),
    Text(String),
}

/// Reads `pathIndices` written either as numbers or as decimal strings, the
/// way circuit input files commonly carry them. Anything but 0 or 1 is
/// rejected.
pub(crate) fn deserialize_directions<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<DirectionRepr>::deserialize(deserializer)?
        .into_iter()
        .enumerate()
        .map(|(level, repr)| {
            let value = match repr {
                DirectionRepr::Number(value) => value,
                DirectionRepr::Text(text) => text.trim().parse::<u64>().map_err(|_| {
                    <D::Error as de::Error>::custom(format!(
                        "pathIndices[{level}] is not a decimal integer: '{text}'"
                    ))
                })?,
            };
            match value {
                0 | 1 => Ok(value as u8),
                _ => Err(<D::Error as de::Error>::custom(format!(
                    "pathIndices[{level}] must be 0 or 1, got {value}"
                ))),
            }
        })
        .collect()
}

impl AuthenticationPath {
    #[must_use]
    pub fn new(siblings: Vec<FieldElement>, directions: Vec<u8>) -> Self {
        Self {
            siblings,
            directions,
        }
    }

    /// Checks the path has exactly `depth` levels and only 0/1 directions.
    ///
    /// # Errors
    ///
    /// Returns [`AccumulatorError::MalformedPath`] describing the first defect.
    pub fn check_shape(&self, depth: usize) -> Result<(), AccumulatorError> {
        if self.siblings.len() != depth || self.directions.len() != depth {
            return Err(PathDefect::LengthMismatch {
                expected: depth,
                siblings: self.siblings.len(),
                directions: self.directions.len(),
            }
            .into());
        }
        if let Some((level, &value)) = self
            .directions
            .iter()
            .enumerate()
            .find(|&(_, &bit)| bit > 1)
        {
            return Err(PathDefect::InvalidDirection { level, value }.into());
        }
        Ok(())
    }

    /// Leaf index encoded by the direction bits (least significant first).
    ///
    /// # Errors
    ///
    /// Returns [`AccumulatorError::MalformedPath`] for a direction outside
    /// `{0, 1}` or a path too long to index into `u64`.
    pub fn leaf_index(&self) -> Result<u64, AccumulatorError> {
        self.check_shape(self.siblings.len())?;
        if self.directions.len() > 64 {
            return Err(PathDefect::LengthMismatch {
                expected: 64,
                siblings: self.siblings.len(),
                directions: self.directions.len(),
            }
            .into());
        }
        Ok(self
            .directions
            .iter()
            .enumerate()
            .fold(0u64, |acc, (level, &bit)| acc | (u64::from(bit) << level)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.siblings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.siblings.is_empty()
    }
}

impl fmt::Display for AuthenticationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "AuthenticationPath ({} levels):", self.siblings.len())?;
        for (level, (sibling, direction)) in
            self.siblings.iter().zip(self.directions.iter()).enumerate()
        {
            writeln!(f, "  [{level}] dir={direction} sibling={}", sibling.to_hex())?;
        }
        Ok(())
    }
}

/// Re-derives a root from a leaf and a path.
///
/// This needs nothing from the accumulator but the depth and the oracle, and
/// mirrors what a circuit or on-chain verifier computes from a witness.
#[derive(Debug)]
pub struct PathVerifier<H> {
    depth: usize,
    oracle: Arc<H>,
}

impl<H> Clone for PathVerifier<H> {
    fn clone(&self) -> Self {
        Self {
            depth: self.depth,
            oracle: Arc::clone(&self.oracle),
        }
    }
}

impl<H: HashOracle> PathVerifier<H> {
    #[must_use]
    pub fn new(depth: usize, oracle: Arc<H>) -> Self {
        Self { depth, oracle }
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Folds `leaf` up through `path` and returns the claimed root.
    ///
    /// The shape is validated before the first hash, so a malformed path
    /// never costs an oracle call.
    ///
    /// # Errors
    ///
    /// Returns [`AccumulatorError::MalformedPath`] for a wrong length or bad
    /// direction bit, and propagates oracle failures.
    pub fn recompute(
        &self,
        leaf: &FieldElement,
        path: &AuthenticationPath,
    ) -> Result<FieldElement, AccumulatorError> {
        path.check_shape(self.depth)?;

        let mut current = *leaf;
        for (sibling, &direction) in path.siblings.iter().zip(path.directions.iter()) {
            current = if direction == 0 {
                self.oracle.hash2(&current, sibling)?
            } else {
                self.oracle.hash2(sibling, &current)?
            };
        }
        Ok(current)
    }

    /// Returns whether `path` takes `leaf` to `expected_root`.
    ///
    /// # Errors
    ///
    /// Same as [`PathVerifier::recompute`]; a well-formed path to a different
    /// root is `Ok(false)`, not an error.
    pub fn verify(
        &self,
        leaf: &FieldElement,
        path: &AuthenticationPath,
        expected_root: &FieldElement,
    ) -> Result<bool, AccumulatorError> {
        Ok(self.recompute(leaf, path)? == *expected_root)
    }
}
