//! Regular expression rule

use std::sync::Arc;

use dashmap::DashMap;
use regex::Regex;

use super::as_text;
use crate::registry::{RuleContext, RuleEvaluator, RuleOutcome};

/// `regex { pattern }`: the value must match `pattern` somewhere; anchor it
/// with `^...$` to constrain the whole value
///
/// Compiled patterns are cached per evaluator, shared across clones. The
/// cache is never evicted: it holds one entry per distinct pattern seen,
/// which schemas bound. Invalid patterns are not cached.
#[derive(Debug, Clone, Default)]
pub struct RegexRule {
    compiled: Arc<DashMap<String, Regex>>,
}

impl RegexRule {
    /// Create with an empty cache
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached patterns
    #[inline]
    #[must_use]
    pub fn cached(&self) -> usize {
        self.compiled.len()
    }

    fn compile(&self, pattern: &str) -> Result<Regex, regex::Error> {
        if let Some(re) = self.compiled.get(pattern) {
            return Ok(re.clone());
        }
        let re = Regex::new(pattern)?;
        self.compiled.insert(pattern.to_string(), re.clone());
        Ok(re)
    }
}

impl RuleEvaluator for RegexRule {
    fn evaluate(&self, ctx: &RuleContext<'_>) -> RuleOutcome {
        let Some(pattern) = ctx.descriptor.param_str("pattern") else {
            return RuleOutcome::Pass;
        };
        let Some(text) = as_text(ctx.value) else {
            return RuleOutcome::Fail("must be text".to_string());
        };

        match self.compile(pattern) {
            Ok(re) if re.is_match(&text) => RuleOutcome::Pass,
            Ok(_) => RuleOutcome::Fail(format!("must match pattern {pattern}")),
            Err(e) => {
                tracing::warn!(field = %ctx.field.name, %pattern, "invalid rule pattern: {e}");
                RuleOutcome::Fail(format!("invalid pattern {pattern}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use sp_schema::{FieldSchema, FieldType, RuleDescriptor, ValueMap};

    fn check(rule: &RegexRule, pattern: &str, value: Value) -> RuleOutcome {
        let field = FieldSchema::new("f", FieldType::String);
        let descriptor = RuleDescriptor::new("regex").with_param("pattern", pattern);
        let siblings = ValueMap::new();
        rule.evaluate(&RuleContext::new(&field, &descriptor, &value, &siblings))
    }

    #[test]
    fn matches_and_caches() {
        let rule = RegexRule::new();
        assert!(check(&rule, "^[a-z-]+$", json!("my-repo")).is_pass());
        assert!(!check(&rule, "^[a-z-]+$", json!("My Repo")).is_pass());
        assert!(check(&rule, r"^\d+$", json!(42)).is_pass());
        assert_eq!(rule.cached(), 2);
    }

    #[test]
    fn invalid_pattern_fails_without_panicking() {
        let rule = RegexRule::new();
        assert_eq!(
            check(&rule, "([a-z", json!("abc")),
            RuleOutcome::Fail("invalid pattern ([a-z".into())
        );
        assert_eq!(rule.cached(), 0);
    }

    #[test]
    fn non_scalar_values_fail() {
        let rule = RegexRule::new();
        assert!(!check(&rule, ".*", json!({"a": 1})).is_pass());
    }
}
