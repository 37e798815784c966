//! Common validation utilities.

use validator::ValidationError;

lazy_static::lazy_static! {
    static ref EMAIL_REGEX: regex::Regex =
        regex::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// Normalizes an email for lookups: trims surrounding whitespace and lower-cases.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validates the basic shape of an email address (`local@domain.tld`).
///
/// Leading and trailing whitespace is ignored.
pub fn validate_email_format(email: &str) -> Result<(), ValidationError> {
    if EMAIL_REGEX.is_match(email.trim()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("email_format");
        err.message = Some("Please enter a valid email address".into());
        Err(err)
    }
}

/// Validates that an optional usage cap is positive.
pub fn validate_max_uses(max_uses: i32) -> Result<(), ValidationError> {
    if max_uses >= 1 {
        Ok(())
    } else {
        let mut err = ValidationError::new("max_uses_range");
        err.message = Some("max_uses must be a positive number".into());
        Err(err)
    }
}

/// Longest lifetime an invitation may be given, in days.
pub const MAX_EXPIRES_IN_DAYS: i64 = 3650;

/// Validates an invitation lifetime: between one day and ten years.
pub fn validate_expires_in_days(days: i64) -> Result<(), ValidationError> {
    if (1..=MAX_EXPIRES_IN_DAYS).contains(&days) {
        Ok(())
    } else {
        let mut err = ValidationError::new("expires_in_days_range");
        err.message = Some(
            format!("expires_in_days must be between 1 and {}", MAX_EXPIRES_IN_DAYS).into(),
        );
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::internet::en::SafeEmail;
    use fake::Fake;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
        assert_eq!(normalize_email("bob@example.com"), "bob@example.com");
        assert_eq!(normalize_email(""), "");
    }

    #[test]
    fn test_validate_email_format_valid() {
        assert!(validate_email_format("alice@example.com").is_ok());
        assert!(validate_email_format(" alice@example.com ").is_ok());
        assert!(validate_email_format("a.b+c@sub.example.co").is_ok());
    }

    #[test]
    fn test_validate_email_format_generated() {
        for _ in 0..20 {
            let email: String = SafeEmail().fake();
            assert!(validate_email_format(&email).is_ok(), "{}", email);
        }
    }

    #[test]
    fn test_validate_email_format_invalid() {
        assert!(validate_email_format("").is_err());
        assert!(validate_email_format("alice").is_err());
        assert!(validate_email_format("alice@example").is_err());
        assert!(validate_email_format("al ice@example.com").is_err());
        assert!(validate_email_format("@example.com").is_err());
        let err = validate_email_format("nope").unwrap_err();
        assert_eq!(err.code, "email_format");
    }

    #[test]
    fn test_validate_max_uses() {
        assert!(validate_max_uses(1).is_ok());
        assert!(validate_max_uses(100).is_ok());
        assert!(validate_max_uses(0).is_err());
        assert!(validate_max_uses(-3).is_err());
    }

    #[test]
    fn test_validate_expires_in_days() {
        assert!(validate_expires_in_days(1).is_ok());
        assert!(validate_expires_in_days(MAX_EXPIRES_IN_DAYS).is_ok());
        assert!(validate_expires_in_days(0).is_err());
        assert!(validate_expires_in_days(MAX_EXPIRES_IN_DAYS + 1).is_err());
        let err = validate_expires_in_days(100_000_000).unwrap_err();
        assert_eq!(err.code, "expires_in_days_range");
    }
}
