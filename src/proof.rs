//! Boundary to the external zero-knowledge prover.
//!
//! The membership circuit takes `{ nullifier, secret, pathElements,
//! pathIndices }` as private inputs and exposes `[nullifierHash, root]` as
//! public signals, in that order. This module assembles the inputs, checks the
//! path locally before anything is sent to the prover, and checks the public
//! signals that come back.

use crate::accumulator::Accumulator;
use crate::commitment::CommitmentRecord;
use crate::field::FieldElement;
use crate::hash::HashOracle;
use crate::path::deserialize_directions;
use crate::utils::validate_decimal_string;
use anyhow::{Context, Result};
use ark_bn254::Fq;
use ark_ff::{BigInteger, PrimeField};
use log::{debug, info};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

/// Private inputs of the membership circuit, serialized with the circuit's
/// input names.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofInputs {
    pub nullifier: FieldElement,
    pub secret: FieldElement,
    pub path_elements: Vec<FieldElement>,
    #[serde(deserialize_with = "deserialize_directions")]
    pub path_indices: Vec<u8>,
}

impl std::fmt::Debug for ProofInputs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProofInputs")
            .field("path_elements", &self.path_elements.len())
            .field("path_indices", &self.path_indices)
            .finish_non_exhaustive()
    }
}

/// Public outputs of the membership circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicSignals {
    pub nullifier_hash: FieldElement,
    pub root: FieldElement,
}

impl PublicSignals {
    /// Position 0 is the nullifier hash, position 1 the root.
    #[must_use]
    pub fn to_vec(&self) -> Vec<FieldElement> {
        vec![self.nullifier_hash, self.root]
    }

    /// Reads the fixed two-signal layout.
    ///
    /// # Errors
    /// Fails unless exactly two signals are given.
    pub fn from_slice(signals: &[FieldElement]) -> Result<Self> {
        match signals {
            [nullifier_hash, root] => Ok(Self {
                nullifier_hash: *nullifier_hash,
                root: *root,
            }),
            _ => Err(anyhow::anyhow!(
                "Expected 2 public signals [nullifierHash, root], got {}",
                signals.len()
            )),
        }
    }
}

/// What an external prover hands back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedProof {
    /// Prover-specific proof object, passed through untouched.
    pub proof: serde_json::Value,
    pub public_signals: Vec<FieldElement>,
}

/// External succinct-proof generator for the membership circuit.
pub trait ProofGenerator {
    fn prove(&self, inputs: &ProofInputs) -> Result<GeneratedProof>;
}

/// A proof ready to submit together with its public signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipProof {
    pub public_signals: PublicSignals,
    pub proof: serde_json::Value,
}

impl MembershipProof {
    /// Lays the proof out as on-chain verifier arguments.
    ///
    /// # Errors
    /// Fails as [`SolidityCallData::from_groth16`] does.
    pub fn solidity_call_data(&self) -> Result<SolidityCallData> {
        SolidityCallData::from_groth16(&self.proof, &self.public_signals.to_vec())
    }
}

/// A Groth16 proof and its public signals as the arguments of the generated
/// Solidity verifier's `verifyProof(a, b, c, input)`.
///
/// Curve coordinates live in the BN254 base field, which is larger than the
/// scalar field, so they are kept as canonical decimal strings rather than
/// [`FieldElement`]s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolidityCallData {
    pub a: [String; 2],
    pub b: [[String; 2]; 2],
    pub c: [String; 2],
    pub input: Vec<FieldElement>,
}

impl SolidityCallData {
    /// Converts a snarkjs-style Groth16 proof object (`pi_a`, `pi_b`, `pi_c`
    /// in projective form) plus its public signals.
    ///
    /// Each G2 coordinate pair of `pi_b` is swapped, since the precompile
    /// expects the imaginary part first.
    ///
    /// # Errors
    /// Fails if the proof names a protocol other than `groth16`, a coordinate
    /// is missing or not a decimal string, or a coordinate is not below the
    /// base field modulus.
    pub fn from_groth16(
        proof: &serde_json::Value,
        public_signals: &[FieldElement],
    ) -> Result<Self> {
        if let Some(protocol) = proof.get("protocol").and_then(serde_json::Value::as_str) {
            if protocol != "groth16" {
                return Err(anyhow::anyhow!(
                    "Expected a groth16 proof, got protocol '{}'",
                    protocol
                ));
            }
        }

        let modulus = BigUint::from_bytes_be(&Fq::MODULUS.to_bytes_be());
        let coordinate = |pointer: &str| base_field_coordinate(proof, pointer, &modulus);

        let call_data = Self {
            a: [coordinate("/pi_a/0")?, coordinate("/pi_a/1")?],
            b: [
                [coordinate("/pi_b/0/1")?, coordinate("/pi_b/0/0")?],
                [coordinate("/pi_b/1/1")?, coordinate("/pi_b/1/0")?],
            ],
            c: [coordinate("/pi_c/0")?, coordinate("/pi_c/1")?],
            input: public_signals.to_vec(),
        };
        debug!(
            "Solidity call data built with {} public inputs",
            call_data.input.len()
        );
        Ok(call_data)
    }
}

fn base_field_coordinate(
    proof: &serde_json::Value,
    pointer: &str,
    modulus: &BigUint,
) -> Result<String> {
    let text = proof
        .pointer(pointer)
        .and_then(serde_json::Value::as_str)
        .with_context(|| format!("Groth16 proof has no coordinate at {pointer}"))?;
    let trimmed = text.trim();
    if !validate_decimal_string(trimmed) {
        return Err(anyhow::anyhow!(
            "Coordinate {} is not a decimal integer: '{}'",
            pointer,
            text
        ));
    }
    let value = BigUint::parse_bytes(trimmed.as_bytes(), 10)
        .with_context(|| format!("Coordinate {pointer} is not a decimal integer"))?;
    if &value >= modulus {
        return Err(anyhow::anyhow!(
            "Coordinate {} is not below the base field modulus",
            pointer
        ));
    }
    Ok(value.to_str_radix(10))
}

/// Builds the circuit inputs for `record` and the public signals a correct
/// proof must expose.
///
/// The path is recomputed with an independent [`crate::path::PathVerifier`]
/// before returning, so an inconsistent witness never reaches a prover.
///
/// # Errors
/// Fails if the commitment is not in `leaves`, the snapshot is too large, or
/// the recomputed root disagrees with the built one.
pub fn prepare_inputs<H: HashOracle>(
    accumulator: &Accumulator<H>,
    leaves: &[FieldElement],
    record: &CommitmentRecord,
) -> Result<(ProofInputs, PublicSignals)> {
    let witness = accumulator
        .root_and_path(leaves, &record.commitment)
        .context("Failed to compute Merkle root and path for commitment")?;
    debug!("Commitment located at leaf index {}", witness.leaf_index);

    let recomputed = accumulator
        .verifier()
        .recompute(&record.commitment, &witness.path)
        .context("Failed to recompute root from authentication path")?;
    if recomputed != witness.root {
        return Err(anyhow::anyhow!(
            "Authentication path does not reproduce the root: built {}, recomputed {}",
            witness.root,
            recomputed
        ));
    }

    let inputs = ProofInputs {
        nullifier: record.nullifier,
        secret: record.secret,
        path_elements: witness.path.siblings,
        path_indices: witness.path.directions,
    };
    let signals = PublicSignals {
        nullifier_hash: record.nullifier_hash,
        root: witness.root,
    };
    Ok((inputs, signals))
}

/// Prepares inputs, runs `generator`, and checks the returned public signals
/// equal `[record.nullifier_hash, root]`.
///
/// # Errors
/// Fails as [`prepare_inputs`] does, if the generator fails, or if the
/// generator's public signals disagree with the locally computed ones.
pub fn prove_membership<H, G>(
    accumulator: &Accumulator<H>,
    leaves: &[FieldElement],
    record: &CommitmentRecord,
    generator: &G,
) -> Result<MembershipProof>
where
    H: HashOracle,
    G: ProofGenerator + ?Sized,
{
    let (inputs, expected) = prepare_inputs(accumulator, leaves, record)?;

    info!("Generating membership proof for root {}", expected.root);
    let generated = generator
        .prove(&inputs)
        .context("External proof generation failed")?;

    let returned = PublicSignals::from_slice(&generated.public_signals)
        .context("Prover returned malformed public signals")?;
    if returned != expected {
        return Err(anyhow::anyhow!(
            "Prover public signals mismatch: expected [{}, {}], got [{}, {}]",
            expected.nullifier_hash,
            expected.root,
            returned.nullifier_hash,
            returned.root
        ));
    }

    Ok(MembershipProof {
        public_signals: returned,
        proof: generated.proof,
    })
}
