//! Cron expression rule
//!
//! Accepts classic five-field expressions (minute, hour, day of month,
//! month, day of week), six-field expressions with a leading seconds field,
//! and the `@hourly`-style macros. Items may be `*`, values, ranges, steps
//! and comma lists; months and weekdays accept three-letter names.

use serde::{Deserialize, Serialize};

use crate::registry::{RuleContext, RuleEvaluator, RuleOutcome};

const GENERIC_MESSAGE: &str = "must be a valid cron expression";

const MACROS: &[&str] = &[
    "@yearly",
    "@annually",
    "@monthly",
    "@weekly",
    "@daily",
    "@midnight",
    "@hourly",
];

const MONTHS: &[&str] = &[
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

const WEEKDAYS: &[&str] = &["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

/// Cheap structural test run before full parsing
///
/// Input shorter than `min_len` characters or with fewer than `min_tokens`
/// whitespace-separated tokens cannot be a cron expression, so it fails with
/// the generic message without being parsed. Both thresholds are tunable;
/// zero disables the respective check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CronPrecheck {
    /// Minimum trimmed length
    pub min_len: usize,
    /// Minimum whitespace-separated token count
    pub min_tokens: usize,
}

impl CronPrecheck {
    /// Pre-check that lets everything through to the parser
    #[inline]
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            min_len: 0,
            min_tokens: 0,
        }
    }

    /// Check if `expr` is rejected without parsing
    #[must_use]
    pub fn rejects(&self, expr: &str) -> bool {
        let expr = expr.trim();
        expr.len() < self.min_len || expr.split_whitespace().count() < self.min_tokens
    }
}

impl Default for CronPrecheck {
    fn default() -> Self {
        Self {
            min_len: 5,
            min_tokens: 3,
        }
    }
}

/// `cron`: value must be a cron expression
#[derive(Debug, Clone, Copy, Default)]
pub struct CronRule {
    precheck: CronPrecheck,
}

impl CronRule {
    /// Create with the given pre-check
    #[inline]
    #[must_use]
    pub fn new(precheck: CronPrecheck) -> Self {
        Self { precheck }
    }
}

impl RuleEvaluator for CronRule {
    fn evaluate(&self, ctx: &RuleContext<'_>) -> RuleOutcome {
        let Some(expr) = ctx.value.as_str() else {
            return RuleOutcome::Fail(GENERIC_MESSAGE.to_string());
        };
        let expr = expr.trim();

        if MACROS.iter().any(|m| m.eq_ignore_ascii_case(expr)) {
            return RuleOutcome::Pass;
        }
        if self.precheck.rejects(expr) {
            return RuleOutcome::Fail(GENERIC_MESSAGE.to_string());
        }

        match check_expression(expr) {
            Ok(()) => RuleOutcome::Pass,
            Err(reason) => RuleOutcome::Fail(format!("invalid cron expression: {reason}")),
        }
    }
}

struct FieldSpec {
    name: &'static str,
    min: u32,
    max: u32,
    names: &'static [&'static str],
    name_offset: u32,
    question_mark: bool,
}

const SECOND: FieldSpec = FieldSpec {
    name: "second",
    min: 0,
    max: 59,
    names: &[],
    name_offset: 0,
    question_mark: false,
};
const MINUTE: FieldSpec = FieldSpec {
    name: "minute",
    ..SECOND
};
const HOUR: FieldSpec = FieldSpec {
    name: "hour",
    max: 23,
    ..SECOND
};
const DAY_OF_MONTH: FieldSpec = FieldSpec {
    name: "day of month",
    min: 1,
    max: 31,
    names: &[],
    name_offset: 0,
    question_mark: true,
};
const MONTH: FieldSpec = FieldSpec {
    name: "month",
    min: 1,
    max: 12,
    names: MONTHS,
    name_offset: 1,
    question_mark: false,
};
const DAY_OF_WEEK: FieldSpec = FieldSpec {
    name: "day of week",
    min: 0,
    max: 7,
    names: WEEKDAYS,
    name_offset: 0,
    question_mark: true,
};

const FIVE_FIELDS: &[FieldSpec] = &[MINUTE, HOUR, DAY_OF_MONTH, MONTH, DAY_OF_WEEK];
const SIX_FIELDS: &[FieldSpec] = &[SECOND, MINUTE, HOUR, DAY_OF_MONTH, MONTH, DAY_OF_WEEK];

/// Full syntax check of a five- or six-field expression
///
/// # Errors
/// Returns a human-readable reason for the first problem found.
pub fn check_expression(expr: &str) -> Result<(), String> {
    let tokens: Vec<&str> = expr.split_whitespace().collect();
    let specs = match tokens.len() {
        5 => FIVE_FIELDS,
        6 => SIX_FIELDS,
        n => return Err(format!("expected 5 or 6 fields, found {n}")),
    };

    tokens
        .iter()
        .zip(specs)
        .try_for_each(|(token, spec)| check_field(token, spec))
}

fn check_field(token: &str, spec: &FieldSpec) -> Result<(), String> {
    for item in token.split(',') {
        if item.is_empty() {
            return Err(format!("empty list item in {} field", spec.name));
        }

        let (range, step) = match item.split_once('/') {
            Some((range, step)) => (range, Some(step)),
            None => (item, None),
        };

        if let Some(step) = step {
            match step.parse::<u32>() {
                Ok(n) if n >= 1 => {}
                _ => return Err(format!("invalid step '{step}' in {} field", spec.name)),
            }
        }

        match range {
            "*" => {}
            "?" if spec.question_mark => {}
            _ => match range.split_once('-') {
                Some((start, end)) => {
                    let start = check_value(start, spec)?;
                    let end = check_value(end, spec)?;
                    if start > end {
                        return Err(format!("range {range} is reversed in {} field", spec.name));
                    }
                }
                None => {
                    check_value(range, spec)?;
                }
            },
        }
    }

    Ok(())
}

fn check_value(token: &str, spec: &FieldSpec) -> Result<u32, String> {
    if let Ok(n) = token.parse::<u32>() {
        if n < spec.min || n > spec.max {
            return Err(format!(
                "{} value {n} out of range {}-{}",
                spec.name, spec.min, spec.max
            ));
        }
        return Ok(n);
    }

    spec.names
        .iter()
        .position(|name| name.eq_ignore_ascii_case(token))
        .and_then(|i| u32::try_from(i).ok())
        .map(|i| i + spec.name_offset)
        .ok_or_else(|| format!("invalid {} value '{token}'", spec.name))
}
