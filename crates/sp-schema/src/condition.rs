//! Visibility and required conditions
//!
//! A condition is a predicate over the sibling values of the field that
//! declares it. Conditions never see values from an ancestor or another
//! branch of the tree: the caller hands in the map for the field's own level.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::value::{is_empty_value, ValueMap};

/// Wildcard accepted by [`Condition::OneOf`]: matches any non-empty value
pub const ANY_VALUE: &str = "*";

/// Predicate over a sibling value map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Condition {
    /// Sibling equals the given value
    Equals {
        /// Sibling field name
        field: String,
        /// Expected value
        value: Value,
    },

    /// Sibling differs from the given value
    NotEquals {
        /// Sibling field name
        field: String,
        /// Rejected value
        value: Value,
    },

    /// Sibling equals one of the values (`"*"` matches any non-empty value)
    OneOf {
        /// Sibling field name
        field: String,
        /// Accepted values
        values: Vec<Value>,
    },

    /// Sibling is filled in
    NotEmpty {
        /// Sibling field name
        field: String,
    },

    /// Sibling is not filled in
    Empty {
        /// Sibling field name
        field: String,
    },

    /// Every nested condition holds
    All {
        /// Nested conditions
        conditions: Vec<Condition>,
    },

    /// At least one nested condition holds
    Any {
        /// Nested conditions
        conditions: Vec<Condition>,
    },

    /// Nested condition does not hold
    Not {
        /// Negated condition
        condition: Box<Condition>,
    },

    /// In-process predicate, not serialisable
    #[serde(skip)]
    Custom(CustomCondition),
}

impl Condition {
    /// `field == value`
    #[must_use]
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Equals {
            field: field.into(),
            value: value.into(),
        }
    }

    /// `field` is one of `values`
    #[must_use]
    pub fn one_of<V: Into<Value>>(field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Self::OneOf {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// `field` is filled in
    #[must_use]
    pub fn not_empty(field: impl Into<String>) -> Self {
        Self::NotEmpty { field: field.into() }
    }

    /// Wrap a closure
    #[must_use]
    pub fn custom<F>(label: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&ValueMap) -> bool + Send + Sync + 'static,
    {
        Self::Custom(CustomCondition::new(label, predicate))
    }

    /// Evaluate against the sibling values of the declaring field
    ///
    /// Missing siblings compare as `null`.
    #[must_use]
    pub fn evaluate(&self, siblings: &ValueMap) -> bool {
        match self {
            Self::Equals { field, value } => loosely_equal(lookup(siblings, field), value),
            Self::NotEquals { field, value } => !loosely_equal(lookup(siblings, field), value),
            Self::OneOf { field, values } => {
                let current = siblings.get(field);
                values.iter().any(|candidate| {
                    if candidate.as_str() == Some(ANY_VALUE) {
                        !is_empty_value(current)
                    } else {
                        loosely_equal(current.unwrap_or(&Value::Null), candidate)
                    }
                })
            }
            Self::NotEmpty { field } => !is_empty_value(siblings.get(field)),
            Self::Empty { field } => is_empty_value(siblings.get(field)),
            Self::All { conditions } => conditions.iter().all(|c| c.evaluate(siblings)),
            Self::Any { conditions } => conditions.iter().any(|c| c.evaluate(siblings)),
            Self::Not { condition } => !condition.evaluate(siblings),
            Self::Custom(custom) => custom.evaluate(siblings),
        }
    }
}

fn lookup<'a>(siblings: &'a ValueMap, field: &str) -> &'a Value {
    siblings.get(field).unwrap_or(&Value::Null)
}

/// Equality that tolerates string-encoded scalars
///
/// Form inputs frequently hold `"5"` where the catalog says `5`, or
/// `"true"` for `true`.
fn loosely_equal(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Value::String(s), Value::Number(n)) | (Value::Number(n), Value::String(s)) => {
            s.trim().parse::<f64>().ok() == n.as_f64()
        }
        (Value::String(s), Value::Bool(b)) | (Value::Bool(b), Value::String(s)) => {
            s.trim() == b.to_string()
        }
        _ => actual == expected,
    }
}

/// Named closure condition
#[derive(Clone)]
pub struct CustomCondition {
    label: String,
    predicate: Arc<dyn Fn(&ValueMap) -> bool + Send + Sync>,
}

impl CustomCondition {
    /// Create from a label and predicate
    pub fn new<F>(label: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&ValueMap) -> bool + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// Label used in debug output
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Run the predicate
    #[inline]
    #[must_use]
    pub fn evaluate(&self, siblings: &ValueMap) -> bool {
        (self.predicate)(siblings)
    }
}

impl fmt::Debug for CustomCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomCondition")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl PartialEq for CustomCondition {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.predicate, &other.predicate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> ValueMap {
        match value {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn equals_matches_sibling() {
        let cond = Condition::equals("mode", "custom");
        assert!(cond.evaluate(&map(json!({"mode": "custom"}))));
        assert!(!cond.evaluate(&map(json!({"mode": "default"}))));
        assert!(!cond.evaluate(&ValueMap::new()));
    }

    #[test]
    fn equals_tolerates_string_scalars() {
        assert!(Condition::equals("port", 8080).evaluate(&map(json!({"port": "8080"}))));
        assert!(Condition::equals("enabled", "true").evaluate(&map(json!({"enabled": true}))));
        assert!(Condition::equals("ratio", 1).evaluate(&map(json!({"ratio": 1.0}))));
    }

    #[test]
    fn numeric_strings_compare_by_value() {
        assert!(Condition::equals("ratio", 1.0).evaluate(&map(json!({"ratio": "1"}))));
        assert!(Condition::equals("ratio", "1.50").evaluate(&map(json!({"ratio": 1.5}))));
        assert!(!Condition::equals("ratio", 1).evaluate(&map(json!({"ratio": "one"}))));
        assert!(!Condition::equals("ratio", 1).evaluate(&map(json!({"ratio": "NaN"}))));
    }

    #[test]
    fn one_of_with_wildcard() {
        let cond = Condition::one_of("region", ["*"]);
        assert!(cond.evaluate(&map(json!({"region": "eu"}))));
        assert!(!cond.evaluate(&map(json!({"region": "  "}))));
        assert!(!cond.evaluate(&ValueMap::new()));

        let cond = Condition::one_of("kind", ["push", "tag"]);
        assert!(cond.evaluate(&map(json!({"kind": "tag"}))));
        assert!(!cond.evaluate(&map(json!({"kind": "pr"}))));
    }

    #[test]
    fn combinators() {
        let cond = Condition::All {
            conditions: vec![
                Condition::not_empty("repo"),
                Condition::Not {
                    condition: Box::new(Condition::equals("mode", "off")),
                },
            ],
        };
        assert!(cond.evaluate(&map(json!({"repo": "a/b", "mode": "on"}))));
        assert!(!cond.evaluate(&map(json!({"repo": "a/b", "mode": "off"}))));

        let cond = Condition::Any {
            conditions: vec![Condition::Empty { field: "a".into() }, Condition::equals("b", 1)],
        };
        assert!(cond.evaluate(&map(json!({"a": "x", "b": 1}))));
        assert!(!cond.evaluate(&map(json!({"a": "x", "b": 2}))));
    }

    #[test]
    fn custom_predicate() {
        let cond = Condition::custom("has two keys", |v| v.len() == 2);
        assert!(cond.evaluate(&map(json!({"a": 1, "b": 2}))));
        assert!(!cond.evaluate(&map(json!({"a": 1}))));
    }

    #[test]
    fn deserializes_tagged_form() {
        let cond: Condition =
            serde_json::from_value(json!({"op": "one_of", "field": "mode", "values": ["a", "b"]}))
                .unwrap();
        assert_eq!(cond, Condition::one_of("mode", ["a", "b"]));
    }
}
