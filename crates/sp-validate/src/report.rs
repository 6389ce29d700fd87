//! Validation reports and per-field queries

use serde::{Deserialize, Serialize};
use sp_schema::matches_field;

use crate::error::ValidationError;

/// Errors for `field` and everything nested under it
///
/// A parent reflects its descendants: `auth` matches `auth.token`, `steps`
/// matches `steps[1].timeout`.
#[must_use]
pub fn errors_for_field<'a>(errors: &'a [ValidationError], field: &str) -> Vec<&'a ValidationError> {
    errors
        .iter()
        .filter(|e| matches_field(&e.field, field))
        .collect()
}

/// Check if `field` or anything nested under it has an error
#[must_use]
pub fn has_field_error(errors: &[ValidationError], field: &str) -> bool {
    errors.iter().any(|e| matches_field(&e.field, field))
}

/// First error in schema order, where a form would draw attention
#[inline]
#[must_use]
pub fn first_error(errors: &[ValidationError]) -> Option<&ValidationError> {
    errors.first()
}

/// Full result of one validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// `required` and `validation_rule` findings, in schema order
    pub errors: Vec<ValidationError>,
    /// `visibility` non-findings: fields skipped because they are hidden
    pub hidden: Vec<ValidationError>,
}

impl ValidationReport {
    /// Check if no errors were found
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors for a field and its descendants
    #[inline]
    #[must_use]
    pub fn errors_for(&self, field: &str) -> Vec<&ValidationError> {
        errors_for_field(&self.errors, field)
    }

    /// Check if a field or its descendants have errors
    #[inline]
    #[must_use]
    pub fn has_error(&self, field: &str) -> bool {
        has_field_error(&self.errors, field)
    }

    /// Check if a field path was skipped as hidden
    #[must_use]
    pub fn is_hidden(&self, path: &str) -> bool {
        self.hidden.iter().any(|h| h.field == path)
    }

    /// Errors and visibility findings together
    pub fn findings(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter().chain(self.hidden.iter())
    }

    /// Drop visibility findings and keep the errors
    #[inline]
    #[must_use]
    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }
}
