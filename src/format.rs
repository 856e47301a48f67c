//! Format predicates for string constraints
//!
//! Syntax checks behind the `email()`, `url()` and `uuid()` constraints.
//! The grammars are deliberately permissive where real-world data is messy
//! and strict where tests depend on rejection:
//!
//! - email: local part, exactly one `@`, dotted domain, no whitespace
//! - url: absolute URL with an explicit scheme
//! - uuid: hyphenated version-4 shape with a valid variant nibble

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Failed to compile email regex")
});

static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://[^\s]+$").expect("Failed to compile url regex")
});

static UUID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-4[0-9a-fA-F]{3}-[89abAB][0-9a-fA-F]{3}-[0-9a-fA-F]{12}$",
    )
    .expect("Failed to compile uuid regex")
});

/// Whether the value has a plausible email shape
pub fn is_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

/// Whether the value is an absolute URL with an explicit scheme
pub fn is_url(value: &str) -> bool {
    URL_REGEX.is_match(value)
}

/// Whether the value has the hyphenated UUID v4 shape
pub fn is_uuid(value: &str) -> bool {
    UUID_REGEX.is_match(value)
}
