//! Declarative validation rules
//!
//! A descriptor only names a rule and carries its parameters. Evaluation
//! lives in `sp-rules`, which resolves `type` against a registry.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::value::ValueMap;

/// One entry of a field's `validationRules`
///
/// ```json
/// { "type": "regex", "pattern": "^[a-z]+$", "message": "lowercase only" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDescriptor {
    /// Rule type resolved by the registry
    #[serde(rename = "type")]
    pub kind: String,

    /// Message overriding the evaluator's default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Remaining keys are rule parameters
    #[serde(flatten)]
    pub params: ValueMap,
}

impl RuleDescriptor {
    /// Create descriptor without parameters
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: None,
            params: ValueMap::new(),
        }
    }

    /// Add a parameter
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Override the failure message
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Raw parameter
    #[inline]
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    /// String parameter
    #[inline]
    #[must_use]
    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.params.get(key).and_then(Value::as_str)
    }

    /// Finite numeric parameter (numeric strings accepted)
    #[must_use]
    pub fn param_f64(&self, key: &str) -> Option<f64> {
        let number = match self.params.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        number.filter(|n: &f64| n.is_finite())
    }
}
