//! Error paths for nested fields
//!
//! Objects nest with `.`, list elements with `[index]`, so the `timeout`
//! key of the third step is `steps[2].timeout`.

use std::fmt;

/// Path of a field inside a value tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(String);

impl FieldPath {
    /// Top-level path (no prefix)
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Path of a named child
    #[must_use]
    pub fn child(&self, name: &str) -> Self {
        if self.0.is_empty() {
            Self(name.to_string())
        } else {
            Self(format!("{}.{name}", self.0))
        }
    }

    /// Path of a list element
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{index}]", self.0))
    }

    /// Check if this is the top level
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of nesting steps (children and list indices)
    #[must_use]
    pub fn depth(&self) -> usize {
        if self.0.is_empty() {
            return 0;
        }
        1 + self.0.matches('.').count() + self.0.matches('[').count()
    }

    /// Borrow as string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the owned string
    #[inline]
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FieldPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Whether an error at `path` belongs to `field` or one of its descendants
///
/// # Examples
/// ```
/// # use sp_schema::matches_field;
/// assert!(matches_field("auth.token", "auth"));
/// assert!(matches_field("steps[1].timeout", "steps"));
/// assert!(!matches_field("authority", "auth"));
/// ```
#[must_use]
pub fn matches_field(path: &str, field: &str) -> bool {
    match path.strip_prefix(field) {
        Some(rest) => rest.is_empty() || rest.starts_with('.') || rest.starts_with('['),
        None => false,
    }
}
