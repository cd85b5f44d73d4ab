use crate::error::AppError;

/// Trims `value`; blank strings count as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Builds the `Validation` error naming every field whose flag is `false`.
pub fn missing_fields(fields: &[(&str, bool)]) -> AppError {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| *name)
        .collect();
    AppError::Validation(format!(
        "All fields required (missing: {})",
        missing.join(", ")
    ))
}
