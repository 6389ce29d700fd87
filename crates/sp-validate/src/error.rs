//! Validation findings

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Mandatory field left empty
    Required,
    /// Field skipped because it is hidden; a non-finding kept for callers
    /// that need to tell "hidden" from "valid"
    Visibility,
    /// A validation rule failed
    ValidationRule,
}

impl ErrorKind {
    /// Wire name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Visibility => "visibility",
            Self::ValidationRule => "validation_rule",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One finding at one field path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dotted and bracketed path, e.g. `steps[2].timeout`
    pub field: String,
    /// Human-readable message
    pub message: String,
    /// Finding kind
    pub kind: ErrorKind,
}

impl ValidationError {
    /// Create finding
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            kind,
        }
    }

    /// `required` finding
    #[inline]
    #[must_use]
    pub fn required(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, message, ErrorKind::Required)
    }

    /// `validation_rule` finding
    #[inline]
    #[must_use]
    pub fn rule(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, message, ErrorKind::ValidationRule)
    }

    /// `visibility` non-finding
    #[inline]
    #[must_use]
    pub fn hidden(field: impl Into<String>) -> Self {
        Self::new(field, "hidden by visibility condition", ErrorKind::Visibility)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn displays_path_and_message() {
        let err = ValidationError::required("auth.token", "Token is required");
        assert_eq!(err.to_string(), "auth.token: Token is required");
    }

    #[test]
    fn serializes_kind_in_snake_case() {
        let err = ValidationError::rule("steps[0].timeout", "must be at least 1");
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"field": "steps[0].timeout", "message": "must be at least 1", "kind": "validation_rule"})
        );
        assert_eq!(ErrorKind::Visibility.to_string(), "visibility");
    }
}
