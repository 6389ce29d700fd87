//! Cross-field comparison rules
//!
//! `compareWith` names a sibling field. Numbers compare numerically
//! (numeric strings included), everything else compares as text, which
//! orders ISO dates and times correctly. An empty sibling passes: there is
//! nothing to compare against yet.

use std::cmp::Ordering;

use sp_schema::is_empty_value;

use super::{as_number, as_text};
use crate::registry::{RuleContext, RuleEvaluator, RuleOutcome};

/// Comparison against a sibling value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareRule {
    /// Strictly less than the sibling
    LessThan,
    /// Strictly greater than the sibling
    GreaterThan,
    /// Equal to the sibling
    Equal,
    /// Different from the sibling
    NotEqual,
}

impl CompareRule {
    fn holds(self, ordering: Ordering) -> bool {
        match self {
            Self::LessThan => ordering == Ordering::Less,
            Self::GreaterThan => ordering == Ordering::Greater,
            Self::Equal => ordering == Ordering::Equal,
            Self::NotEqual => ordering != Ordering::Equal,
        }
    }

    fn phrase(self) -> &'static str {
        match self {
            Self::LessThan => "must be less than",
            Self::GreaterThan => "must be greater than",
            Self::Equal => "must be equal to",
            Self::NotEqual => "must be different from",
        }
    }
}

impl RuleEvaluator for CompareRule {
    fn evaluate(&self, ctx: &RuleContext<'_>) -> RuleOutcome {
        let Some(other_name) = ctx.descriptor.param_str("compareWith") else {
            return RuleOutcome::Pass;
        };
        let other = match ctx.siblings.get(other_name) {
            Some(other) if !is_empty_value(Some(other)) => other,
            _ => return RuleOutcome::Pass,
        };

        let ordering = match (as_number(ctx.value), as_number(other)) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => match (as_text(ctx.value), as_text(other)) {
                (Some(a), Some(b)) => Some(a.cmp(&b)),
                _ => None,
            },
        };

        match ordering {
            Some(ordering) if self.holds(ordering) => RuleOutcome::Pass,
            _ => RuleOutcome::Fail(format!("{} {other_name}", self.phrase())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use sp_schema::{FieldSchema, FieldType, RuleDescriptor, ValueMap};

    fn check(rule: CompareRule, value: Value, siblings: Value) -> RuleOutcome {
        let field = FieldSchema::new("min", FieldType::Number);
        let descriptor = RuleDescriptor::new("less_than").with_param("compareWith", "max");
        let Value::Object(siblings) = siblings else {
            unreachable!()
        };
        rule.evaluate(&RuleContext::new(&field, &descriptor, &value, &siblings))
    }

    #[test]
    fn numeric_comparison() {
        assert!(check(CompareRule::LessThan, json!(1), json!({"max": 10})).is_pass());
        assert!(check(CompareRule::LessThan, json!("9"), json!({"max": "10"})).is_pass());
        assert_eq!(
            check(CompareRule::LessThan, json!(10), json!({"max": 10})),
            RuleOutcome::Fail("must be less than max".into())
        );
        assert!(check(CompareRule::GreaterThan, json!(11), json!({"max": 10})).is_pass());
        assert!(check(CompareRule::Equal, json!(10.0), json!({"max": 10})).is_pass());
        assert!(!check(CompareRule::NotEqual, json!(10), json!({"max": 10})).is_pass());
    }

    #[test]
    fn text_comparison_orders_iso_dates() {
        assert!(
            check(CompareRule::LessThan, json!("2024-01-31"), json!({"max": "2024-02-01"})).is_pass()
        );
        assert!(check(CompareRule::LessThan, json!("09:00"), json!({"max": "17:30"})).is_pass());
    }

    #[test]
    fn empty_sibling_passes() {
        assert!(check(CompareRule::LessThan, json!(5), json!({})).is_pass());
        assert!(check(CompareRule::LessThan, json!(5), json!({"max": " "})).is_pass());
    }

    #[test]
    fn missing_compare_with_passes() {
        let field = FieldSchema::new("a", FieldType::Number);
        let descriptor = RuleDescriptor::new("equal");
        let siblings = ValueMap::new();
        let value = json!(1);
        assert!(CompareRule::Equal
            .evaluate(&RuleContext::new(&field, &descriptor, &value, &siblings))
            .is_pass());
    }
}
