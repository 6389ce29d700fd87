//! Built-in rule evaluators

pub mod bounds;
pub mod compare;
pub mod cron;
pub mod pattern;
pub mod uri;

use serde_json::Value;

use crate::registry::RuleRegistry;

/// Register every built-in except `cron`, which needs its pre-check tuning
pub(crate) fn register_all(registry: &mut RuleRegistry) {
    registry.register("regex", pattern::RegexRule::new());
    registry.register("min_length", bounds::LengthRule::Min);
    registry.register("max_length", bounds::LengthRule::Max);
    registry.register("min", bounds::RangeRule::Min);
    registry.register("max", bounds::RangeRule::Max);
    registry.register("url", uri::UrlRule);
    registry.register("less_than", compare::CompareRule::LessThan);
    registry.register("greater_than", compare::CompareRule::GreaterThan);
    registry.register("equal", compare::CompareRule::Equal);
    registry.register("not_equal", compare::CompareRule::NotEqual);
}

/// Finite numeric view of a value (numeric strings accepted)
pub(crate) fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    number.filter(|n: &f64| n.is_finite())
}

/// Text view of a scalar value
pub(crate) fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Format a bound without a trailing `.0`
pub(crate) fn format_bound(bound: f64) -> String {
    if bound.fract() == 0.0 && bound.abs() < 1e15 {
        format!("{bound:.0}")
    } else {
        bound.to_string()
    }
}
