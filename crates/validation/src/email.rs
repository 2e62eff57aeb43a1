//! Email format check.

use std::sync::LazyLock;

use regex::Regex;

/// `local@domain.tld` with no whitespace; the identity provider does the rest.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex"));

pub fn is_valid_email(candidate: &str) -> bool {
    EMAIL_RE.is_match(candidate.trim())
}
