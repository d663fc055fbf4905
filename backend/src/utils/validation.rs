//! Field-level validation rules shared by the account DTOs.
//!
//! Both functions plug into `validator` through `#[validate(custom(...))]`.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;
use validator::ValidationError;

/// Minimum number of characters in an administrator password.
pub const MIN_PASSWORD_LENGTH: usize = 6;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email regex is valid")
});

/// Accepts `local@domain.tld` addresses with a TLD of at least two letters.
pub fn validate_email_format(email: &str) -> Result<(), ValidationError> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(ValidationError::new("email").with_message(Cow::Borrowed("Invalid email")))
    }
}

/// Requires at least six characters, one ASCII letter and one digit.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::new("password_length").with_message(Cow::Owned(
            format!("Password must be at least {MIN_PASSWORD_LENGTH} characters long"),
        )));
    }
    if !password.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::new("password_letter")
            .with_message(Cow::Borrowed("Password must contain at least one letter")));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new("password_digit")
            .with_message(Cow::Borrowed("Password must contain at least one number")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_format() {
        assert!(validate_email_format("admin@example.com").is_ok());
        assert!(validate_email_format("first.last+tag@mail.example.co").is_ok());

        assert!(validate_email_format("").is_err());
        assert!(validate_email_format("admin").is_err());
        assert!(validate_email_format("admin@example").is_err());
        assert!(validate_email_format("admin@example.c").is_err());
        assert!(validate_email_format("@example.com").is_err());
        assert!(validate_email_format("ad min@example.com").is_err());
    }

    #[test]
    fn test_password_strength() {
        assert!(validate_password_strength("Test1234").is_ok());
        assert!(validate_password_strength("abc123").is_ok());

        let err = validate_password_strength("ab1").unwrap_err();
        assert_eq!(err.code, "password_length");

        let err = validate_password_strength("abcdefgh").unwrap_err();
        assert_eq!(err.code, "password_digit");

        let err = validate_password_strength("12345678").unwrap_err();
        assert_eq!(err.code, "password_letter");
    }
}
