//! Length and numeric range rules
//!
//! Both read their bound from the `value` parameter. A descriptor without a
//! usable bound passes.

use serde_json::Value;

use super::{as_number, format_bound};
use crate::registry::{RuleContext, RuleEvaluator, RuleOutcome};

/// `min_length` / `max_length` on strings (in characters) and lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthRule {
    /// At least `value` characters or items
    Min,
    /// At most `value` characters or items
    Max,
}

impl RuleEvaluator for LengthRule {
    fn evaluate(&self, ctx: &RuleContext<'_>) -> RuleOutcome {
        let Some(bound) = ctx.descriptor.param_f64("value") else {
            return RuleOutcome::Pass;
        };

        let (len, unit) = match ctx.value {
            Value::String(s) => (s.chars().count(), "characters"),
            Value::Array(items) => (items.len(), "items"),
            _ => return RuleOutcome::Pass,
        };

        #[allow(clippy::cast_precision_loss)]
        let len = len as f64;
        match self {
            Self::Min if len < bound => {
                RuleOutcome::Fail(format!("must be at least {} {unit}", format_bound(bound)))
            }
            Self::Max if len > bound => {
                RuleOutcome::Fail(format!("must be at most {} {unit}", format_bound(bound)))
            }
            _ => RuleOutcome::Pass,
        }
    }
}

/// `min` / `max` on numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeRule {
    /// Not below `value`
    Min,
    /// Not above `value`
    Max,
}

impl RuleEvaluator for RangeRule {
    fn evaluate(&self, ctx: &RuleContext<'_>) -> RuleOutcome {
        let Some(bound) = ctx.descriptor.param_f64("value") else {
            return RuleOutcome::Pass;
        };
        let Some(number) = as_number(ctx.value) else {
            return RuleOutcome::Fail("must be a number".to_string());
        };

        match self {
            Self::Min if number < bound => {
                RuleOutcome::Fail(format!("must be at least {}", format_bound(bound)))
            }
            Self::Max if number > bound => {
                RuleOutcome::Fail(format!("must be at most {}", format_bound(bound)))
            }
            _ => RuleOutcome::Pass,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use proptest::prelude::*;
    use sp_schema::{FieldSchema, FieldType, RuleDescriptor, ValueMap};

    fn check(rule: &dyn RuleEvaluator, descriptor: &RuleDescriptor, value: Value) -> RuleOutcome {
        let field = FieldSchema::new("f", FieldType::String);
        let siblings = ValueMap::new();
        rule.evaluate(&RuleContext::new(&field, descriptor, &value, &siblings))
    }

    #[test]
    fn length_counts_characters() {
        let max = RuleDescriptor::new("max_length").with_param("value", 3);
        assert!(check(&LengthRule::Max, &max, json!("héé")).is_pass());
        assert_eq!(
            check(&LengthRule::Max, &max, json!("abcd")),
            RuleOutcome::Fail("must be at most 3 characters".into())
        );

        let min = RuleDescriptor::new("min_length").with_param("value", 2);
        assert_eq!(
            check(&LengthRule::Min, &min, json!(["a"])),
            RuleOutcome::Fail("must be at least 2 items".into())
        );
    }

    #[test]
    fn range_accepts_numeric_strings() {
        let min = RuleDescriptor::new("min").with_param("value", 1);
        assert!(check(&RangeRule::Min, &min, json!("5")).is_pass());
        assert_eq!(
            check(&RangeRule::Min, &min, json!(0)),
            RuleOutcome::Fail("must be at least 1".into())
        );
        assert_eq!(
            check(&RangeRule::Min, &min, json!("abc")),
            RuleOutcome::Fail("must be a number".into())
        );

        let max = RuleDescriptor::new("max").with_param("value", 2.5);
        assert_eq!(
            check(&RangeRule::Max, &max, json!(3)),
            RuleOutcome::Fail("must be at most 2.5".into())
        );
    }

    #[test]
    fn non_finite_strings_are_not_numbers() {
        let min = RuleDescriptor::new("min").with_param("value", 1);
        let max = RuleDescriptor::new("max").with_param("value", 5);
        for text in ["NaN", "nan", "inf", "-infinity"] {
            assert_eq!(
                check(&RangeRule::Min, &min, json!(text)),
                RuleOutcome::Fail("must be a number".into()),
                "{text}"
            );
            assert_eq!(
                check(&RangeRule::Max, &max, json!(text)),
                RuleOutcome::Fail("must be a number".into()),
                "{text}"
            );
        }
    }

    #[test]
    fn missing_bound_passes() {
        let rule = RuleDescriptor::new("max");
        assert!(check(&RangeRule::Max, &rule, json!(1e9)).is_pass());
    }

    proptest! {
        #[test]
        fn range_agrees_with_bound(value in -1.0e6f64..1.0e6, bound in -1.0e6f64..1.0e6) {
            let min = RuleDescriptor::new("min").with_param("value", bound);
            let max = RuleDescriptor::new("max").with_param("value", bound);
            prop_assert_eq!(check(&RangeRule::Min, &min, json!(value)).is_pass(), value >= bound);
            prop_assert_eq!(check(&RangeRule::Max, &max, json!(value)).is_pass(), value <= bound);
        }

        #[test]
        fn length_agrees_with_char_count(text in "\\PC{0,12}", bound in 0usize..12) {
            let max = RuleDescriptor::new("max_length").with_param("value", bound);
            let fits = text.chars().count() <= bound;
            prop_assert_eq!(check(&LengthRule::Max, &max, json!(text)).is_pass(), fits);
        }
    }
}
