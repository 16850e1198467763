//! Validation helpers for command line and configuration values

use crate::core::error_handling::ContextualError;

/// A value supplied by the user failed validation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl ContextualError for ValidationError {
    fn is_user_actionable(&self) -> bool {
        true
    }

    fn user_message(&self) -> Option<String> {
        Some(self.message.clone())
    }
}

/// Validate positive integer value
pub fn validate_positive_int(value: &str) -> Result<usize, String> {
    match value.trim().parse::<usize>() {
        Ok(0) => Err("Value must be greater than 0".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("'{}' is not a valid positive integer", value)),
    }
}

/// Validate a TOML integer as a positive count
pub fn validate_positive_toml(key: &str, value: &toml::Value) -> Result<usize, ValidationError> {
    let raw = value.as_integer().ok_or_else(|| {
        ValidationError::new(format!("'{}' must be an integer, got {}", key, value.type_str()))
    })?;
    usize::try_from(raw)
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| ValidationError::new(format!("'{}' must be greater than 0, got {}", key, raw)))
}

/// Validate an item identifier: non-empty and free of separators
pub fn validate_item_id(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("User id cannot be empty".to_string());
    }
    if trimmed.contains(|c: char| c == ',' || c.is_whitespace()) {
        return Err(format!("'{}' is not a valid user id", trimmed));
    }
    Ok(trimmed.to_string())
}
