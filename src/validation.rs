// Validation utilities module
// Custom validator functions for request DTOs

use validator::ValidationError;

/// Rejects strings made only of whitespace
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("Value must not be blank".into());
        Err(error)
    } else {
        Ok(())
    }
}

/// Splits a comma-separated query string value into trimmed, non-empty items
pub fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}
