//! Rule evaluator trait and registry

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use sp_schema::{FieldSchema, RuleDescriptor, ValueMap};

use crate::builtin;
use crate::builtin::cron::{CronPrecheck, CronRule};

/// Everything a rule may look at
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// Field being validated
    pub field: &'a FieldSchema,
    /// Descriptor that selected this rule
    pub descriptor: &'a RuleDescriptor,
    /// Current, non-empty value
    pub value: &'a Value,
    /// Values at the field's own nesting level
    pub siblings: &'a ValueMap,
}

impl<'a> RuleContext<'a> {
    /// Create context
    #[inline]
    #[must_use]
    pub fn new(
        field: &'a FieldSchema,
        descriptor: &'a RuleDescriptor,
        value: &'a Value,
        siblings: &'a ValueMap,
    ) -> Self {
        Self {
            field,
            descriptor,
            value,
            siblings,
        }
    }
}

/// Result of one rule check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    /// Value satisfies the rule
    Pass,
    /// Value violates the rule
    Fail(String),
}

impl RuleOutcome {
    /// Check if passed
    #[inline]
    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Failure message, if failed
    #[inline]
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Pass => None,
            Self::Fail(message) => Some(message),
        }
    }
}

/// A pluggable rule
///
/// Evaluators only ever see non-empty values; required-ness is decided by
/// the validator before any rule runs.
pub trait RuleEvaluator: Send + Sync + fmt::Debug {
    /// Check the value
    fn evaluate(&self, ctx: &RuleContext<'_>) -> RuleOutcome;
}

/// Closure-backed evaluator
pub struct FnRule<F>(pub F);

impl<F> RuleEvaluator for FnRule<F>
where
    F: Fn(&RuleContext<'_>) -> RuleOutcome + Send + Sync,
{
    fn evaluate(&self, ctx: &RuleContext<'_>) -> RuleOutcome {
        (self.0)(ctx)
    }
}

impl<F> fmt::Debug for FnRule<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnRule")
    }
}

/// Rule type name to evaluator
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    evaluators: HashMap<String, Arc<dyn RuleEvaluator>>,
}

impl RuleRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with all built-in rules and the default cron pre-check
    #[must_use]
    pub fn with_builtins() -> Self {
        Self::with_builtins_and(CronPrecheck::default())
    }

    /// Registry with all built-in rules and a tuned cron pre-check
    #[must_use]
    pub fn with_builtins_and(cron_precheck: CronPrecheck) -> Self {
        let mut registry = Self::new();
        builtin::register_all(&mut registry);
        registry.register("cron", CronRule::new(cron_precheck));
        registry
    }

    /// Register (or replace) an evaluator
    pub fn register(&mut self, kind: impl Into<String>, evaluator: impl RuleEvaluator + 'static) {
        self.evaluators.insert(kind.into(), Arc::new(evaluator));
    }

    /// Register a closure
    pub fn register_fn<F>(&mut self, kind: impl Into<String>, f: F)
    where
        F: Fn(&RuleContext<'_>) -> RuleOutcome + Send + Sync + 'static,
    {
        self.register(kind, FnRule(f));
    }

    /// Look up an evaluator
    #[inline]
    #[must_use]
    pub fn get(&self, kind: &str) -> Option<&Arc<dyn RuleEvaluator>> {
        self.evaluators.get(kind)
    }

    /// Check if a rule type is known
    #[inline]
    #[must_use]
    pub fn contains(&self, kind: &str) -> bool {
        self.evaluators.contains_key(kind)
    }

    /// Number of registered rule types
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.evaluators.len()
    }

    /// Check if empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.evaluators.is_empty()
    }

    /// Evaluate the descriptor in `ctx`
    ///
    /// Returns `None` when no evaluator is registered for the rule type.
    /// A failing rule reports the descriptor's `message` when it has one.
    #[must_use]
    pub fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<RuleOutcome> {
        let evaluator = self.get(&ctx.descriptor.kind)?;

        Some(match evaluator.evaluate(ctx) {
            RuleOutcome::Pass => RuleOutcome::Pass,
            RuleOutcome::Fail(default) => {
                RuleOutcome::Fail(ctx.descriptor.message.clone().unwrap_or(default))
            }
        })
    }
}
