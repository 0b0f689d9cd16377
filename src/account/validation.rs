//! Input validation for account and drive forms.
//!
//! This module provides validation functions for display names, file and
//! folder names, email addresses and passwords.

use thiserror::Error;

/// Default minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum password length.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for user, file and folder names.
pub const MAX_NAME_LENGTH: usize = 255;

/// Maximum email length.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Name is empty or whitespace.
    #[error("name cannot be empty")]
    NameEmpty,

    /// Name is too long.
    #[error("name must be at most {MAX_NAME_LENGTH} characters")]
    NameTooLong,

    /// Name contains control characters.
    #[error("name contains invalid characters")]
    NameInvalidChars,

    /// Email is empty.
    #[error("email cannot be empty")]
    EmailEmpty,

    /// Email is too long.
    #[error("email must be at most {MAX_EMAIL_LENGTH} characters")]
    EmailTooLong,

    /// Email format is invalid.
    #[error("invalid email format")]
    EmailInvalidFormat,

    /// Email collides with a key the store uses for its own entries.
    #[error("email is reserved")]
    EmailReserved,

    /// Password is empty.
    #[error("password cannot be empty")]
    PasswordEmpty,

    /// Password is too short.
    #[error("password must be at least {0} characters")]
    PasswordTooShort(usize),

    /// Password is too long.
    #[error("password must be at most {MAX_PASSWORD_LENGTH} characters")]
    PasswordTooLong,

    /// New password equals the current one.
    #[error("new password must differ from the current password")]
    PasswordUnchanged,
}

/// Validate a user, file or folder name and return it trimmed.
///
/// Requirements:
/// - Not empty after trimming
/// - At most 255 characters
/// - No control characters
///
/// # Examples
///
/// ```
/// use clouddrive::account::validation::validate_name;
///
/// assert_eq!(validate_name("  Ada  ").unwrap(), "Ada");
/// assert!(validate_name("   ").is_err());
/// ```
pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::NameEmpty);
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::NameTooLong);
    }

    if name.chars().any(|c| c.is_control()) {
        return Err(ValidationError::NameInvalidChars);
    }

    Ok(name.to_string())
}

/// Validate an email address.
///
/// Accepts `local@domain.tld` shapes: exactly one `@`, no whitespace, a
/// non-empty local part, and a domain with a dot that is neither its first
/// nor its last character.
///
/// # Examples
///
/// ```
/// use clouddrive::account::validation::validate_email;
///
/// assert!(validate_email("user@example.com").is_ok());
/// assert!(validate_email("user@localhost").is_err());
/// ```
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::EmailEmpty);
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::EmailTooLong);
    }

    if email.chars().any(|c| c.is_whitespace()) {
        return Err(ValidationError::EmailInvalidFormat);
    }

    let (local, domain) = email
        .split_once('@')
        .ok_or(ValidationError::EmailInvalidFormat)?;

    if local.is_empty() || domain.contains('@') {
        return Err(ValidationError::EmailInvalidFormat);
    }

    let has_inner_dot = domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len());
    if !has_inner_dot {
        return Err(ValidationError::EmailInvalidFormat);
    }

    if crate::store::keys::is_reserved(email) {
        return Err(ValidationError::EmailReserved);
    }

    Ok(())
}

/// Validate a password against the configured minimum length.
pub fn validate_password(password: &str, min_length: usize) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::PasswordEmpty);
    }

    let length = password.chars().count();
    if length < min_length {
        return Err(ValidationError::PasswordTooShort(min_length));
    }
    if length > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooLong);
    }

    Ok(())
}

/// Validate a password change request.
///
/// The new password has to meet the length rules and differ from the
/// current one. Whether `current` is correct is checked against the store.
pub fn validate_password_change(
    current: &str,
    new: &str,
    min_length: usize,
) -> Result<(), ValidationError> {
    if current.is_empty() {
        return Err(ValidationError::PasswordEmpty);
    }
    validate_password(new, min_length)?;
    if current == new {
        return Err(ValidationError::PasswordUnchanged);
    }
    Ok(())
}

/// Validate all registration fields at once.
///
/// Returns the first validation error encountered, or Ok if all fields are valid.
pub fn validate_registration(
    name: &str,
    email: &str,
    password: &str,
    min_password_length: usize,
) -> Result<(), ValidationError> {
    validate_name(name)?;
    validate_email(email)?;
    validate_password(password, min_password_length)?;
    Ok(())
}
