//! Commitment records: the secret note behind a leaf.

use crate::field::FieldElement;
use crate::hash::{HashOracle, OracleError};
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Byte width of each random secret. 31 bytes stays below the ~254-bit prime,
/// so the drawn integer needs no reduction and carries no modular bias.
pub const SECRET_BYTES: usize = 31;

/// `{ nullifier, secret, commitment, nullifierHash }` for one deposit.
///
/// `commitment = hash2(nullifier, secret)` is the public leaf;
/// `nullifier_hash = hash1(nullifier)` is revealed only when the note is
/// spent. The nullifier and secret are private witness material.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitmentRecord {
    pub nullifier: FieldElement,
    pub secret: FieldElement,
    pub commitment: FieldElement,
    pub nullifier_hash: FieldElement,
}

fn random_secret<R: RngCore + CryptoRng>(rng: &mut R) -> FieldElement {
    let mut bytes = [0u8; SECRET_BYTES];
    rng.fill_bytes(&mut bytes);
    FieldElement::from_be_bytes_mod_order(&bytes)
}

impl CommitmentRecord {
    /// Draws a fresh nullifier and secret and derives the public values.
    ///
    /// # Errors
    /// Propagates oracle failures.
    pub fn generate<R, H>(rng: &mut R, oracle: &H) -> Result<Self, OracleError>
    where
        R: RngCore + CryptoRng,
        H: HashOracle + ?Sized,
    {
        let nullifier = random_secret(rng);
        let secret = random_secret(rng);
        Self::from_secrets(nullifier, secret, oracle)
    }

    /// Derives a record from known secrets (e.g. an imported note).
    ///
    /// # Errors
    /// Propagates oracle failures.
    pub fn from_secrets<H: HashOracle + ?Sized>(
        nullifier: FieldElement,
        secret: FieldElement,
        oracle: &H,
    ) -> Result<Self, OracleError> {
        Ok(Self {
            commitment: oracle.hash2(&nullifier, &secret)?,
            nullifier_hash: oracle.hash1(&nullifier)?,
            nullifier,
            secret,
        })
    }

    /// Recomputes both public values and compares them with the stored ones.
    ///
    /// # Errors
    /// Propagates oracle failures.
    pub fn check<H: HashOracle + ?Sized>(&self, oracle: &H) -> Result<bool, OracleError> {
        let expected = Self::from_secrets(self.nullifier, self.secret, oracle)?;
        Ok(expected == *self)
    }
}

impl fmt::Debug for CommitmentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommitmentRecord")
            .field("commitment", &self.commitment)
            .field("nullifier_hash", &self.nullifier_hash)
            .finish_non_exhaustive()
    }
}
