//! Common validation utilities.

use std::borrow::Cow;

use validator::ValidationError;

lazy_static::lazy_static! {
    /// Lowercase alphanumeric words joined by single hyphens or underscores.
    pub static ref SLUG_REGEX: regex::Regex =
        regex::Regex::new(r"^[a-z0-9]+(?:[-_][a-z0-9]+)*$").unwrap();
}

/// Validates a role slug.
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if SLUG_REGEX.is_match(slug) {
        Ok(())
    } else {
        Err(ValidationError::new("slug_format").with_message(Cow::Borrowed(
            "Slug must be lowercase alphanumeric words separated by '-' or '_'",
        )))
    }
}

/// Validates that a string is not only whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value cannot be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("editor").is_ok());
        assert!(validate_slug("content-editor").is_ok());
        assert!(validate_slug("super_admin").is_ok());
        assert!(validate_slug("level-2").is_ok());
    }

    #[test]
    fn test_validate_slug_rejects_bad_format() {
        assert!(validate_slug("").is_err());
        assert!(validate_slug("Editor").is_err());
        assert!(validate_slug("-editor").is_err());
        assert!(validate_slug("editor-").is_err());
        assert!(validate_slug("content--editor").is_err());
        assert!(validate_slug("content editor").is_err());
    }

    #[test]
    fn test_validate_slug_error_message() {
        let err = validate_slug("Bad Slug").unwrap_err();
        assert_eq!(err.code, "slug_format");
        assert!(err.message.unwrap().contains("lowercase"));
    }

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("Editor").is_ok());
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("").is_err());
    }
}
