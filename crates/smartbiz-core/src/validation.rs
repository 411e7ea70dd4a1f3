//! Input validation for feedback submissions and logins

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

/// Minimum feedback length in characters, after trimming
pub const MIN_FEEDBACK_CHARS: usize = 10;
/// Maximum feedback length in characters, after trimming
pub const MAX_FEEDBACK_CHARS: usize = 5000;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email pattern is valid")
});

/// A rejected input field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Feedback content is required")]
    ContentRequired,

    #[error("Feedback must be at least 10 characters")]
    ContentTooShort,

    #[error("Feedback must not exceed 5000 characters")]
    ContentTooLong,

    #[error("Please provide a valid email")]
    InvalidEmail,

    #[error("Password is required")]
    PasswordRequired,
}

impl ValidationError {
    /// Name of the request field the error refers to
    pub fn field(&self) -> &'static str {
        match self {
            Self::ContentRequired | Self::ContentTooShort | Self::ContentTooLong => "content",
            Self::InvalidEmail => "email",
            Self::PasswordRequired => "password",
        }
    }

    pub fn to_field_error(&self) -> FieldError {
        FieldError {
            field: self.field().to_string(),
            message: self.to_string(),
        }
    }
}

/// Wire form of a validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Validate submitted feedback and return the trimmed text.
///
/// Lengths are counted in characters, not bytes.
pub fn validate_feedback_content(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    let chars = trimmed.chars().count();

    if chars == 0 {
        Err(ValidationError::ContentRequired)
    } else if chars < MIN_FEEDBACK_CHARS {
        Err(ValidationError::ContentTooShort)
    } else if chars > MAX_FEEDBACK_CHARS {
        Err(ValidationError::ContentTooLong)
    } else {
        Ok(trimmed.to_string())
    }
}

/// HTML-escape feedback for storage
pub fn escape_content(content: &str) -> String {
    html_escape::encode_safe(content).into_owned()
}

/// Validate login input, reporting every failing field.
pub fn validate_login(email: &str, password: &str) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    if !EMAIL_PATTERN.is_match(email.trim()) {
        errors.push(ValidationError::InvalidEmail);
    }
    if password.is_empty() {
        errors.push(ValidationError::PasswordRequired);
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", ValidationError::ContentRequired)]
    #[case("     \n\t ", ValidationError::ContentRequired)]
    #[case("too short", ValidationError::ContentTooShort)]
    #[case("  123456789  ", ValidationError::ContentTooShort)]
    fn test_feedback_rejected(#[case] raw: &str, #[case] expected: ValidationError) {
        assert_eq!(validate_feedback_content(raw), Err(expected));
    }

    #[test]
    fn test_feedback_bounds() {
        assert_eq!(
            validate_feedback_content("  0123456789  ").unwrap(),
            "0123456789"
        );

        let max = "a".repeat(MAX_FEEDBACK_CHARS);
        assert!(validate_feedback_content(&max).is_ok());

        let over = "a".repeat(MAX_FEEDBACK_CHARS + 1);
        assert_eq!(
            validate_feedback_content(&over),
            Err(ValidationError::ContentTooLong)
        );
    }

    #[test]
    fn test_feedback_counts_chars_not_bytes() {
        // 10 multi-byte characters
        assert!(validate_feedback_content("éééééééééé").is_ok());
        let long = "é".repeat(MAX_FEEDBACK_CHARS);
        assert!(validate_feedback_content(&long).is_ok());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ValidationError::ContentTooShort.to_string(),
            "Feedback must be at least 10 characters"
        );
        let field = ValidationError::InvalidEmail.to_field_error();
        assert_eq!(field.field, "email");
        assert_eq!(field.message, "Please provide a valid email");
    }

    #[test]
    fn test_escape_content() {
        assert_eq!(
            escape_content("<script>alert('x')</script> & \"more\""),
            "&lt;script&gt;alert(&#x27;x&#x27;)&lt;&#x2F;script&gt; &amp; &quot;more&quot;"
        );
        assert_eq!(escape_content("plain text"), "plain text");
    }

    #[rstest]
    #[case("demo@smartbiz.com", "123456", Ok(()))]
    #[case(" demo@smartbiz.com ", "x", Ok(()))]
    #[case("not-an-email", "123456", Err(vec![ValidationError::InvalidEmail]))]
    #[case("demo@smartbiz.com", "", Err(vec![ValidationError::PasswordRequired]))]
    #[case("", "", Err(vec![ValidationError::InvalidEmail, ValidationError::PasswordRequired]))]
    fn test_login_validation(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: Result<(), Vec<ValidationError>>,
    ) {
        assert_eq!(validate_login(email, password), expected);
    }
}
