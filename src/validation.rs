use once_cell::sync::Lazy;
use regex::Regex;

use crate::common::errors::ValidationError;

pub const MAX_EMAIL_LEN: usize = 254;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Normalizes `email` and checks it has the `local@domain.tld` shape within
/// [`MAX_EMAIL_LEN`] characters. Returns the normalized address.
pub fn validate_email(email: &str) -> Result<String, ValidationError> {
    let email = normalize_email(email);
    if email.is_empty() || email.chars().count() > MAX_EMAIL_LEN || !EMAIL_PATTERN.is_match(&email) {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(email)
}

/// Trims an optional free-text field, dropping it when nothing is left.
pub fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

/// Drops an optional field that was sent empty, keeping anything else verbatim.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|val| !val.is_empty())
}
