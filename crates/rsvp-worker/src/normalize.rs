//! Canonical identity keys derived from guest input.
//!
//! Both functions are pure and idempotent. Case folding is plain `to_lowercase`;
//! no Unicode normalization is attempted.

/// Trim surrounding whitespace and lower-case.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Trim, lower-case, and collapse every whitespace run to a single space.
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}
