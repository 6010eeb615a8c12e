//! Fixed-depth commitment tree over a caller-supplied leaf snapshot.
//!
//! The accumulator keeps no leaves. Every call receives one fixed snapshot of
//! the leaf sequence and rebuilds all layers from it, so `root` and
//! `path_for` on the same snapshot always agree. There is no live-update or
//! streaming guarantee: if the authoritative log grows between two calls,
//! each call simply reflects the snapshot it was given.
//!
//! Incomplete layers are padded on the right with the zero-subtree value for
//! that level. A trailing odd node is never hashed with itself.

use crate::error::AccumulatorError;
use crate::field::FieldElement;
use crate::hash::HashOracle;
use crate::path::{AuthenticationPath, PathVerifier};
use crate::zeros::ZeroTable;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Largest supported depth (2^32 leaves).
pub const MAX_TREE_DEPTH: usize = 32;

/// Root and authentication path for one leaf of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipWitness {
    pub root: FieldElement,
    pub leaf: FieldElement,
    pub leaf_index: usize,
    pub path: AuthenticationPath,
}

/// A fixed-depth append-only accumulator.
///
/// Holds only the depth (through its [`ZeroTable`]) and a shared oracle
/// handle, so it is cheap to clone and safe to use from many threads.
pub struct Accumulator<H> {
    zeros: ZeroTable,
    oracle: Arc<H>,
}

impl<H> Clone for Accumulator<H> {
    fn clone(&self) -> Self {
        Self {
            zeros: self.zeros.clone(),
            oracle: Arc::clone(&self.oracle),
        }
    }
}

impl<H> fmt::Debug for Accumulator<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accumulator")
            .field("depth", &self.zeros.depth())
            .finish_non_exhaustive()
    }
}

type Layers = Vec<Vec<FieldElement>>;

impl<H: HashOracle> Accumulator<H> {
    /// Creates an accumulator of the given depth and precomputes its zero table.
    ///
    /// # Arguments
    /// * `depth` - Number of levels above the leaves, in `1..=MAX_TREE_DEPTH`
    /// * `oracle` - Shared hash oracle; must be the one every verifier uses
    ///
    /// # Errors
    /// Returns [`AccumulatorError::InvalidDepth`] for an unsupported depth and
    /// propagates oracle failures from the zero-table build.
    pub fn new(depth: usize, oracle: Arc<H>) -> Result<Self, AccumulatorError> {
        if depth == 0 || depth > MAX_TREE_DEPTH {
            return Err(AccumulatorError::InvalidDepth {
                depth,
                max: MAX_TREE_DEPTH,
            });
        }
        let zeros = ZeroTable::build(depth, oracle.as_ref())?;
        debug!("Accumulator ready: depth={depth}, capacity={}", 1u64 << depth);
        Ok(Self { zeros, oracle })
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.zeros.depth()
    }

    /// Maximum number of leaves, `2^depth`.
    #[must_use]
    pub fn capacity(&self) -> u64 {
        1u64 << self.depth()
    }

    #[must_use]
    pub fn zeros(&self) -> &ZeroTable {
        &self.zeros
    }

    #[must_use]
    pub fn oracle(&self) -> &Arc<H> {
        &self.oracle
    }

    /// A verifier sharing this accumulator's depth and oracle.
    #[must_use]
    pub fn verifier(&self) -> PathVerifier<H> {
        PathVerifier::new(self.depth(), Arc::clone(&self.oracle))
    }

    /// Root of the tree whose leaves are `leaves`, in order.
    ///
    /// An empty sequence yields the zero value of level `depth - 1`, matching
    /// the deployed contract's empty-tree root.
    ///
    /// # Errors
    /// Returns [`AccumulatorError::CapacityExceeded`] if `leaves` holds more
    /// than `2^depth` elements.
    pub fn root(&self, leaves: &[FieldElement]) -> Result<FieldElement, AccumulatorError> {
        let layers = self.build_layers(leaves)?;
        Ok(self.root_of(&layers))
    }

    /// Authentication path for the first leaf equal to `target`.
    ///
    /// Lookup is exact equality over reduced field elements. If `target`
    /// occurs more than once, the lowest index wins and later copies cannot
    /// be reached through this call.
    ///
    /// # Errors
    /// Returns [`AccumulatorError::ElementNotFound`] if `target` is absent and
    /// [`AccumulatorError::CapacityExceeded`] for an oversized snapshot.
    pub fn path_for(
        &self,
        leaves: &[FieldElement],
        target: &FieldElement,
    ) -> Result<AuthenticationPath, AccumulatorError> {
        Ok(self.root_and_path(leaves, target)?.path)
    }

    /// Root and path for `target` from a single layer build.
    ///
    /// # Errors
    /// Same as [`Accumulator::path_for`].
    pub fn root_and_path(
        &self,
        leaves: &[FieldElement],
        target: &FieldElement,
    ) -> Result<MembershipWitness, AccumulatorError> {
        self.check_capacity(leaves.len())?;
        let leaf_index =
            index_of(leaves, target).ok_or(AccumulatorError::ElementNotFound(*target))?;
        debug!("Leaf found at index {leaf_index} of {}", leaves.len());

        let layers = self.build_layers(leaves)?;
        Ok(MembershipWitness {
            root: self.root_of(&layers),
            leaf: *target,
            leaf_index,
            path: self.path_of(&layers, leaf_index),
        })
    }

    fn check_capacity(&self, len: usize) -> Result<(), AccumulatorError> {
        let capacity = self.capacity();
        if u64::try_from(len).map_or(true, |len| len > capacity) {
            return Err(AccumulatorError::CapacityExceeded { len, capacity });
        }
        Ok(())
    }

    fn build_layers(&self, leaves: &[FieldElement]) -> Result<Layers, AccumulatorError> {
        self.check_capacity(leaves.len())?;
        let depth = self.depth();
        debug!("Building {depth} layers over {} leaves", leaves.len());

        let mut layers: Layers = Vec::with_capacity(depth + 1);
        layers.push(leaves.to_vec());
        for level in 1..=depth {
            let zero = self.zeros.at(level - 1);
            let next = layers[level - 1]
                .chunks(2)
                .map(|pair| {
                    let right = pair.get(1).unwrap_or(&zero);
                    self.oracle.hash2(&pair[0], right)
                })
                .collect::<Result<Vec<_>, _>>()?;
            layers.push(next);
        }
        Ok(layers)
    }

    fn root_of(&self, layers: &Layers) -> FieldElement {
        let depth = self.depth();
        layers[depth]
            .first()
            .copied()
            .unwrap_or_else(|| self.zeros.at(depth - 1))
    }

    fn path_of(&self, layers: &Layers, leaf_index: usize) -> AuthenticationPath {
        let depth = self.depth();
        let mut siblings = Vec::with_capacity(depth);
        let mut directions = Vec::with_capacity(depth);
        let mut index = leaf_index;
        for (level, layer) in layers.iter().take(depth).enumerate() {
            directions.push(u8::from(index & 1 == 1));
            let sibling = layer
                .get(index ^ 1)
                .copied()
                .unwrap_or_else(|| self.zeros.at(level));
            siblings.push(sibling);
            index >>= 1;
        }
        AuthenticationPath::new(siblings, directions)
    }
}

/// Index of the first leaf equal to `target`.
#[must_use]
pub fn index_of(leaves: &[FieldElement], target: &FieldElement) -> Option<usize> {
    leaves.iter().position(|leaf| leaf == target)
}
