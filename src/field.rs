//! BN254 scalar field elements and their text and byte encodings.
//!
//! Every value crossing a component boundary is a [`FieldElement`], which is
//! always reduced modulo the field prime. Text input is normalized on the way
//! in: decimal and hex forms of the same integer parse to the same element, so
//! equality never depends on how a value was written down.

use crate::utils::{has_hex_prefix, is_valid_hex_string, strip_hex_prefix, validate_decimal_string};
use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};
use num_bigint::BigUint;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The BN254 scalar field prime, in decimal.
pub const FIELD_MODULUS: &str =
    "21888242871839275222246405745257275088548364400416034343698204186575808495617";

/// Width of the big-endian byte encoding.
pub const FIELD_BYTES: usize = 32;

/// Width of the canonical hex encoding, excluding the `0x` prefix.
pub const FIELD_HEX_DIGITS: usize = 2 * FIELD_BYTES;

/// Errors produced while parsing field element text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldParseError {
    #[error("field element text is empty")]
    Empty,
    #[error("invalid decimal field element '{0}'")]
    InvalidDecimal(String),
    #[error("invalid hex field element '{0}': contains non-hex characters")]
    InvalidHex(String),
    #[error("hex field element has {len} digits (max {max})")]
    HexTooLong { len: usize, max: usize },
}

/// An element of the BN254 scalar field.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FieldElement(Fr);

impl FieldElement {
    #[must_use]
    pub fn zero() -> Self {
        Self(Fr::from(0u64))
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    pub(crate) fn from_inner(inner: Fr) -> Self {
        Self(inner)
    }

    pub(crate) fn inner(&self) -> Fr {
        self.0
    }

    /// Interprets `bytes` as a big-endian integer and reduces it modulo the
    /// field prime. Any length is accepted.
    #[must_use]
    pub fn from_be_bytes_mod_order(bytes: &[u8]) -> Self {
        Self(Fr::from_be_bytes_mod_order(bytes))
    }

    /// Canonical 32-byte big-endian encoding.
    #[must_use]
    pub fn to_be_bytes(&self) -> [u8; FIELD_BYTES] {
        let bytes = self.0.into_bigint().to_bytes_be();
        let mut out = [0u8; FIELD_BYTES];
        let offset = FIELD_BYTES.saturating_sub(bytes.len());
        let start = bytes.len().saturating_sub(FIELD_BYTES);
        out[offset..].copy_from_slice(&bytes[start..]);
        out
    }

    /// Parses base-10 text, reducing values at or above the prime.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is empty or contains anything other than
    /// ASCII digits (surrounding whitespace is ignored).
    pub fn from_decimal(input: &str) -> Result<Self, FieldParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(FieldParseError::Empty);
        }
        if !validate_decimal_string(trimmed) {
            return Err(FieldParseError::InvalidDecimal(trimmed.to_string()));
        }
        let value = BigUint::parse_bytes(trimmed.as_bytes(), 10)
            .ok_or_else(|| FieldParseError::InvalidDecimal(trimmed.to_string()))?;
        Ok(Self::from_be_bytes_mod_order(&value.to_bytes_be()))
    }

    /// Parses hex text with an optional `0x`/`0X` prefix, in either case,
    /// with at most 64 digits. Values at or above the prime are reduced.
    ///
    /// # Errors
    ///
    /// Returns an error for empty input, non-hex characters, or more than 64
    /// digits.
    pub fn from_hex(input: &str) -> Result<Self, FieldParseError> {
        let stripped = strip_hex_prefix(input);
        if stripped.is_empty() {
            return Err(FieldParseError::Empty);
        }
        if stripped.len() > FIELD_HEX_DIGITS {
            return Err(FieldParseError::HexTooLong {
                len: stripped.len(),
                max: FIELD_HEX_DIGITS,
            });
        }
        if !is_valid_hex_string(stripped) {
            return Err(FieldParseError::InvalidHex(stripped.to_string()));
        }

        let padded = format!("{stripped:0>width$}", width = FIELD_HEX_DIGITS);
        let mut bytes = [0u8; FIELD_BYTES];
        hex::decode_to_slice(&padded, &mut bytes)
            .map_err(|_| FieldParseError::InvalidHex(stripped.to_string()))?;
        Ok(Self::from_be_bytes_mod_order(&bytes))
    }

    /// Canonical decimal form, without leading zeros.
    #[must_use]
    pub fn to_decimal(&self) -> String {
        BigUint::from_bytes_be(&self.to_be_bytes()).to_str_radix(10)
    }

    /// Canonical hex form: `0x` followed by 64 lowercase digits.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_be_bytes()))
    }
}

impl From<u64> for FieldElement {
    fn from(value: u64) -> Self {
        Self(Fr::from(value))
    }
}

impl FromStr for FieldElement {
    type Err = FieldParseError;

    /// `0x`-prefixed text is read as hex, anything else as decimal.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if has_hex_prefix(s) {
            Self::from_hex(s)
        } else {
            Self::from_decimal(s)
        }
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal())
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement({})", self.to_decimal())
    }
}

impl Serialize for FieldElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FieldElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modulus_constant_matches_curve() {
        let modulus = BigUint::from_bytes_be(&Fr::MODULUS.to_bytes_be());
        assert_eq!(modulus.to_str_radix(10), FIELD_MODULUS);
    }

    #[test]
    fn test_modulus_reduces_to_zero() {
        let fe = FieldElement::from_decimal(FIELD_MODULUS).unwrap();
        assert!(fe.is_zero());
    }

    #[test]
    fn test_modulus_plus_one_reduces_to_one() {
        let p_plus_one = (BigUint::from_bytes_be(&Fr::MODULUS.to_bytes_be()) + 1u32).to_string();
        let fe = FieldElement::from_decimal(&p_plus_one).unwrap();
        assert_eq!(fe, FieldElement::from(1));
    }

    #[test]
    fn test_decimal_round_trip() {
        let text = "21663839004416932945382355908790599225266501822907911457504978515578255421292";
        let fe = FieldElement::from_decimal(text).unwrap();
        assert_eq!(fe.to_decimal(), text);
        assert_eq!(fe.to_string(), text);
    }

    #[test]
    fn test_decimal_leading_zeros_normalized() {
        let fe = FieldElement::from_decimal("000042").unwrap();
        assert_eq!(fe.to_decimal(), "42");
    }

    #[test]
    fn test_zero_decimal_and_hex() {
        assert_eq!(FieldElement::zero().to_decimal(), "0");
        assert_eq!(
            FieldElement::zero().to_hex(),
            "0x0000000000000000000000000000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn test_hex_matches_decimal() {
        let from_hex = FieldElement::from_hex(
            "0x2fe54c60d3acabf3343a35b6eba15db4821b340f76e741e2249685ed4899af6c",
        )
        .unwrap();
        let from_dec = FieldElement::from_decimal(
            "21663839004416932945382355908790599225266501822907911457504978515578255421292",
        )
        .unwrap();
        assert_eq!(from_hex, from_dec);
    }

    #[test]
    fn test_hex_case_and_padding_normalized() {
        let short = FieldElement::from_hex("0XAbC").unwrap();
        assert_eq!(short, FieldElement::from(0xabc));
        assert_eq!(
            short.to_hex(),
            "0x0000000000000000000000000000000000000000000000000000000000000abc"
        );
        assert_eq!(FieldElement::from_hex(&short.to_hex()).unwrap(), short);
    }

    #[test]
    fn test_hex_too_long_rejected() {
        let too_long = format!("0x{}", "1".repeat(65));
        assert_eq!(
            FieldElement::from_hex(&too_long),
            Err(FieldParseError::HexTooLong { len: 65, max: 64 })
        );
    }

    #[test]
    fn test_invalid_text_rejected() {
        assert!(matches!(
            FieldElement::from_hex("0x12zz"),
            Err(FieldParseError::InvalidHex(_))
        ));
        assert!(matches!(
            FieldElement::from_decimal("12.5"),
            Err(FieldParseError::InvalidDecimal(_))
        ));
        assert_eq!(FieldElement::from_decimal("  "), Err(FieldParseError::Empty));
        assert_eq!(FieldElement::from_hex("0x"), Err(FieldParseError::Empty));
    }

    #[test]
    fn test_from_str_dispatches_on_prefix() {
        let a: FieldElement = "0x10".parse().unwrap();
        let b: FieldElement = "16".parse().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_bytes_round_trip() {
        let fe = FieldElement::from(0x0102_0304_0506_0708);
        let bytes = fe.to_be_bytes();
        assert_eq!(bytes[24..], [1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(FieldElement::from_be_bytes_mod_order(&bytes), fe);
    }

    #[test]
    fn test_serde_uses_decimal_strings() {
        let fe = FieldElement::from(255);
        let json = serde_json::to_string(&fe).unwrap();
        assert_eq!(json, "\"255\"");

        let from_hex: FieldElement = serde_json::from_str("\"0xff\"").unwrap();
        assert_eq!(from_hex, fe);
    }

    #[test]
    fn test_serde_rejects_garbage() {
        let result: Result<FieldElement, _> = serde_json::from_str("\"not a number\"");
        assert!(result.is_err());
    }
}
