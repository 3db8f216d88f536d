//! Field validation shared by the submission surfaces and the registration
//! endpoint.
//!
//! The rules mirror the intake contract: package codes start with 6 and
//! carry 13 digits, phones normalize to exactly 9 digits.

use regex::Regex;
use thiserror::Error;

use crate::registration::RegistrationInput;

/// A registration input that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("package code {code:?} must start with 6 and contain exactly 13 digits")]
    InvalidPackageCode { code: String },
    #[error("phone {phone:?} must contain exactly 9 digits")]
    InvalidPhone { phone: String },
    #[error("no delivery location selected")]
    MissingLocation,
}

/// Whether `code` is a well-formed package code.
///
/// The check is exact: no whitespace, no separators, no other prefix.
#[must_use]
pub fn is_valid_package_code(code: &str) -> bool {
    let re = Regex::new(r"^6\d{12}$").expect("valid package code regex");
    re.is_match(code)
}

/// Strips everything but ASCII digits from a phone number.
///
/// Idempotent: normalizing an already normalized phone is a no-op.
#[must_use]
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

/// Whether `phone` normalizes to a well-formed phone number.
#[must_use]
pub fn is_valid_phone(phone: &str) -> bool {
    let re = Regex::new(r"^\d{9}$").expect("valid phone regex");
    re.is_match(&normalize_phone(phone))
}

/// Checks a full registration input against the submission rules.
///
/// The package code is trimmed before the check, matching what the
/// submission path persists.
///
/// # Errors
///
/// Returns the first failing rule: [`ValidationError::InvalidPackageCode`],
/// then [`ValidationError::InvalidPhone`], then
/// [`ValidationError::MissingLocation`].
pub fn validate_registration(input: &RegistrationInput) -> Result<(), ValidationError> {
    let code = input.package_code.trim();
    if !is_valid_package_code(code) {
        return Err(ValidationError::InvalidPackageCode {
            code: code.to_string(),
        });
    }
    if !is_valid_phone(&input.phone) {
        return Err(ValidationError::InvalidPhone {
            phone: input.phone.clone(),
        });
    }
    if !input.selection.is_set() {
        return Err(ValidationError::MissingLocation);
    }
    Ok(())
}

#[cfg(test)]
#[path = "validation_test.rs"]
mod tests;
