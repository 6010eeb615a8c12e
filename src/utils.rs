//! Utility functions for text validation and timestamps.

use anyhow::Result;
use std::time::{SystemTime, UNIX_EPOCH};

pub(crate) fn is_valid_hex_string(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_hexdigit())
}

/// Returns `true` if the trimmed input starts with `0x` or `0X`.
#[must_use]
pub fn has_hex_prefix(input: &str) -> bool {
    let trimmed = input.trim();
    trimmed.starts_with("0x") || trimmed.starts_with("0X")
}

/// Trims whitespace and strips an optional `0x`/`0X` prefix.
///
/// # Examples
///
/// ```
/// use zkp_commitment_tree::utils::strip_hex_prefix;
///
/// assert_eq!(strip_hex_prefix("  0xABcd "), "ABcd");
/// assert_eq!(strip_hex_prefix("1234"), "1234");
/// ```
#[must_use]
pub fn strip_hex_prefix(input: &str) -> &str {
    let trimmed = input.trim();
    trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed)
}

/// Validates that a string contains only hex digits (prefix optional).
///
/// Returns `false` for empty input.
#[must_use]
pub fn validate_hex_string(input: &str) -> bool {
    let stripped = strip_hex_prefix(input);

    if stripped.is_empty() {
        return false;
    }

    is_valid_hex_string(stripped)
}

/// Validates that a string is a non-empty run of ASCII decimal digits.
#[must_use]
pub fn validate_decimal_string(input: &str) -> bool {
    let trimmed = input.trim();
    !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit())
}

/// Current wall-clock time as seconds since the Unix epoch.
///
/// # Errors
/// Returns an error if the system clock is set before the epoch.
pub fn current_unix_timestamp() -> Result<u64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| anyhow::anyhow!("System clock unavailable: {}", e))
}
