//! Knowledge content-field validation.
//!
//! Length limits match the column widths in the knowledge table. These run
//! in the API layer before any row is written; the status workflow itself
//! lives in [`crate::workflow`].

use crate::error::CoreError;

/// Maximum length for a knowledge item's title.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum length for the info category label.
pub const MAX_CATEGORY_LENGTH: usize = 100;

/// Maximum length for the comma-separated keywords field.
pub const MAX_KEYWORDS_LENGTH: usize = 500;

/// Maximum length for the target-audience field.
pub const MAX_TARGET_LENGTH: usize = 200;

/// Validate a knowledge title: required, non-blank, within the column width.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title must not be empty".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title exceeds maximum length of {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate the optional short text fields against their column widths.
pub fn validate_optional_fields(
    info_category: Option<&str>,
    keywords: Option<&str>,
    target: Option<&str>,
) -> Result<(), CoreError> {
    check_len("info_category", info_category, MAX_CATEGORY_LENGTH)?;
    check_len("keywords", keywords, MAX_KEYWORDS_LENGTH)?;
    check_len("target", target, MAX_TARGET_LENGTH)?;
    Ok(())
}

fn check_len(field: &str, value: Option<&str>, max: usize) -> Result<(), CoreError> {
    if let Some(v) = value {
        if v.chars().count() > max {
            return Err(CoreError::Validation(format!(
                "Field '{field}' exceeds maximum length of {max} characters"
            )));
        }
    }
    Ok(())
}
