//! MiMCSponge over the BN254 scalar field.
//!
//! This is the circomlib construction (220 rounds, `x^5`, key 0) with round
//! constants derived from the seed `"mimcsponge"` by iterated Keccak-256. It
//! is bit-compatible with the circuit's `MiMCSponge(2, 220, 1)` template and
//! with the on-chain hasher generated from the same seed, which is what lets
//! an off-chain root match a trust-anchored one.

use crate::field::FieldElement;
use crate::hash::{HashOracle, OracleError};
use ark_bn254::Fr;
use ark_ff::{Field, PrimeField};
use sha3::{Digest, Keccak256};

/// Seed the round constants are derived from.
pub const MIMC_SEED: &str = "mimcsponge";

/// Number of Feistel rounds.
pub const MIMC_ROUNDS: usize = 220;

/// MiMCSponge hasher with precomputed round constants.
///
/// Build it once and share it (e.g. behind an `Arc`) with every component
/// that hashes; construction costs 219 Keccak-256 calls.
#[derive(Clone)]
pub struct MimcSponge {
    constants: Vec<Fr>,
    key: Fr,
}

impl std::fmt::Debug for MimcSponge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MimcSponge")
            .field("seed", &MIMC_SEED)
            .field("rounds", &self.constants.len())
            .finish()
    }
}

impl Default for MimcSponge {
    fn default() -> Self {
        Self::new()
    }
}

fn round_constants(seed: &str, rounds: usize) -> Vec<Fr> {
    let mut constants = vec![Fr::from(0u64); rounds];
    let mut digest: [u8; 32] = Keccak256::digest(seed.as_bytes()).into();
    for constant in constants.iter_mut().take(rounds.saturating_sub(1)).skip(1) {
        digest = Keccak256::digest(digest).into();
        *constant = Fr::from_be_bytes_mod_order(&digest);
    }
    constants
}

impl MimcSponge {
    #[must_use]
    pub fn new() -> Self {
        Self {
            constants: round_constants(MIMC_SEED, MIMC_ROUNDS),
            key: Fr::from(0u64),
        }
    }

    /// One full Feistel permutation of `(xl, xr)` under key `k`.
    fn permute(&self, mut xl: Fr, mut xr: Fr, k: Fr) -> (Fr, Fr) {
        let last = self.constants.len() - 1;
        for (i, c) in self.constants.iter().enumerate() {
            let t = xl + k + c;
            let t5 = t.square().square() * t;
            if i < last {
                let next_xl = xr + t5;
                xr = xl;
                xl = next_xl;
            } else {
                xr += t5;
            }
        }
        (xl, xr)
    }

    /// Absorbs `inputs` one at a time and squeezes a single element.
    #[must_use]
    pub fn multi_hash(&self, inputs: &[FieldElement]) -> FieldElement {
        let mut r = Fr::from(0u64);
        let mut c = Fr::from(0u64);
        for input in inputs {
            r += input.inner();
            (r, c) = self.permute(r, c, self.key);
        }
        FieldElement::from_inner(r)
    }
}

impl HashOracle for MimcSponge {
    fn hash1(&self, x: &FieldElement) -> Result<FieldElement, OracleError> {
        Ok(self.multi_hash(std::slice::from_ref(x)))
    }

    fn hash2(
        &self,
        left: &FieldElement,
        right: &FieldElement,
    ) -> Result<FieldElement, OracleError> {
        Ok(self.multi_hash(&[*left, *right]))
    }
}
