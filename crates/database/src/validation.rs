//! Input validation for account fields.

use thiserror::Error;

/// Why an account field was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid email: {0}")]
    InvalidEmail(&'static str),

    #[error("{field} exceeds {max} characters (got {actual})")]
    TooLong {
        field: String,
        max: usize,
        actual: usize,
    },

    #[error("{0} is required")]
    Empty(String),
}

/// Maximum allowed length for email addresses.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum allowed length for display names.
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum allowed length for tutor free-text fields.
pub const MAX_TUTOR_FIELD_LENGTH: usize = 2000;

/// Basic shape check for an email address: one `@`, a non-empty local
/// part and a dotted domain with no empty labels.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    validate_text("email", email, MAX_EMAIL_LENGTH)?;

    let (local, domain) = match email.split_once('@') {
        Some((local, domain)) if !domain.contains('@') => (local, domain),
        _ => return Err(ValidationError::InvalidEmail("expected a single @")),
    };

    if local.is_empty() {
        return Err(ValidationError::InvalidEmail("nothing before @"));
    }
    if !domain.contains('.') {
        return Err(ValidationError::InvalidEmail("domain has no dot"));
    }
    if domain.split('.').any(str::is_empty) {
        return Err(ValidationError::InvalidEmail("domain has an empty label"));
    }

    Ok(())
}

/// Validate a required free-text field against a length cap.
pub fn validate_text(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Empty(field.to_string()));
    }

    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
            actual,
        });
    }

    Ok(())
}

/// Validate a display name.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    validate_text("name", name, MAX_NAME_LENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_ordinary_addresses() {
        for good in ["grace@navy.mil", "first.last@school.ac.uk", "x@y.z", "  padded@example.org "] {
            assert!(validate_email(good).is_ok(), "{good} should be accepted");
        }
    }

    #[test]
    fn test_rejects_malformed_addresses() {
        assert!(matches!(validate_email(""), Err(ValidationError::Empty(_))));

        for bad in [
            "no-at-sign.com",
            "two@at@signs.com",
            "@missing-local.com",
            "missing-domain@",
            "tutor@localhost",
            "lead@.dot.com",
            "trail@dot.com.",
            "double@dot..com",
        ] {
            assert!(
                matches!(validate_email(bad), Err(ValidationError::InvalidEmail(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_overlong_address() {
        let email = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(
            validate_email(&email),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Ada Lovelace").is_ok());
        assert!(matches!(validate_name("   "), Err(ValidationError::Empty(_))));
        assert!(matches!(
            validate_name(&"x".repeat(101)),
            Err(ValidationError::TooLong { max: 100, .. })
        ));
    }

    #[test]
    fn test_error_messages() {
        let err = ValidationError::TooLong {
            field: "email".to_string(),
            max: 254,
            actual: 300,
        };
        assert_eq!(err.to_string(), "email exceeds 254 characters (got 300)");
        assert_eq!(
            ValidationError::Empty("expertise".to_string()).to_string(),
            "expertise is required"
        );
    }
}
