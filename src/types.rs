//! Type definitions for witness files exchanged between the tools.

use crate::config::SecurityConfig;
use crate::field::FieldElement;
use crate::hash::HashOracle;
use crate::path::{AuthenticationPath, PathVerifier};
use crate::proof::{ProofInputs, PublicSignals};
use crate::utils::current_unix_timestamp;
use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Output of the witness generator.
///
/// Holds everything an external prover needs (`input`, serialized with the
/// circuit's names) plus the public values the resulting proof must expose.
///
/// # Public Input Consistency
///
/// `root` and `nullifier_hash` are what the circuit outputs as public signals
/// `[nullifierHash, root]`. They are stored next to the private input so the
/// verifier tool can re-derive both from `input` and reject a file whose
/// halves disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WitnessOutput {
    /// Tree root the path leads to.
    pub root: FieldElement,
    /// `hash1(nullifier)`; revealed at spend time.
    pub nullifier_hash: FieldElement,
    /// The leaf, `hash2(nullifier, secret)`.
    pub commitment: FieldElement,
    /// Position of `commitment` in the ledger snapshot.
    pub leaf_index: u64,
    /// Tree depth; every path vector has exactly this length.
    pub depth: usize,
    /// Unix timestamp when the witness was generated.
    pub timestamp: u64,
    /// Private circuit input.
    pub input: ProofInputs,
}

impl WitnessOutput {
    #[must_use]
    pub fn public_signals(&self) -> PublicSignals {
        PublicSignals {
            nullifier_hash: self.nullifier_hash,
            root: self.root,
        }
    }

    #[must_use]
    pub fn path(&self) -> AuthenticationPath {
        AuthenticationPath::new(
            self.input.path_elements.clone(),
            self.input.path_indices.clone(),
        )
    }

    /// Validates the witness structure and cryptographic consistency.
    ///
    /// Performs:
    /// - Timestamp validation (not too old or in future)
    /// - Path shape checks against `depth`
    /// - Commitment and nullifier hash re-derivation from the secrets
    /// - Root recomputation from the commitment and path
    /// - Leaf index consistency with the path directions
    ///
    /// # Errors
    /// Returns an error describing the first failed check.
    pub fn validate<H: HashOracle>(
        &self,
        oracle: &Arc<H>,
        security: &SecurityConfig,
    ) -> Result<()> {
        debug!("Starting witness validation");
        debug!("Depth: {}", self.depth);
        debug!("Leaf index: {}", self.leaf_index);
        debug!("Timestamp: {}", self.timestamp);

        let current_timestamp = current_unix_timestamp()?;
        debug!("Current timestamp: {}", current_timestamp);

        if self.timestamp > current_timestamp.saturating_add(security.timestamp_tolerance_secs) {
            return Err(anyhow::anyhow!(
                "Timestamp is too far in the future: {} (current: {}, tolerance: {}s). Please check system clock and witness timestamp.",
                self.timestamp,
                current_timestamp,
                security.timestamp_tolerance_secs
            ));
        }

        if current_timestamp > self.timestamp.saturating_add(security.timestamp_max_age_secs) {
            return Err(anyhow::anyhow!(
                "Timestamp is too old: {} (current: {}, max age: {}s). The ledger may have moved on. Please generate a fresh witness.",
                self.timestamp,
                current_timestamp,
                security.timestamp_max_age_secs
            ));
        }

        let path = self.path();
        path.check_shape(self.depth)
            .context("Witness path does not match its declared depth")?;

        let commitment = oracle
            .hash2(&self.input.nullifier, &self.input.secret)
            .context("Failed to recompute commitment")?;
        if commitment != self.commitment {
            return Err(anyhow::anyhow!(
                "Commitment mismatch: expected {}, got {}. The commitment must equal H(nullifier, secret).",
                commitment,
                self.commitment
            ));
        }

        let nullifier_hash = oracle
            .hash1(&self.input.nullifier)
            .context("Failed to recompute nullifier hash")?;
        if nullifier_hash != self.nullifier_hash {
            return Err(anyhow::anyhow!(
                "Nullifier hash mismatch: expected {}, got {}. This indicates corrupted or tampered witness data.",
                nullifier_hash,
                self.nullifier_hash
            ));
        }

        let verifier = PathVerifier::new(self.depth, Arc::clone(oracle));
        let root = verifier
            .recompute(&self.commitment, &path)
            .context("Failed to recompute root from witness path")?;
        if root != self.root {
            return Err(anyhow::anyhow!(
                "Root mismatch: path recomputes {}, witness claims {}",
                root,
                self.root
            ));
        }

        let leaf_index = path.leaf_index()?;
        if leaf_index != self.leaf_index {
            return Err(anyhow::anyhow!(
                "Leaf index mismatch: path directions encode {}, witness claims {}",
                leaf_index,
                self.leaf_index
            ));
        }

        Ok(())
    }
}
