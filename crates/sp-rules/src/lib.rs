//! SuperPlane Rule Evaluators
//!
//! Rule descriptors in a field schema only name a rule. This crate maps
//! those names to evaluators and ships the built-in set.
//!
//! # Overview
//!
//! - **RuleEvaluator**: pass/fail predicate over one non-empty value
//! - **RuleRegistry**: name to evaluator lookup, with message overrides
//! - **builtin**: `regex`, `min_length`, `max_length`, `min`, `max`, `url`,
//!   `cron`, `less_than`, `greater_than`, `equal`, `not_equal`
//!
//! # Example
//!
//! ```rust
//! use sp_rules::{RuleContext, RuleOutcome, RuleRegistry};
//! use sp_schema::{FieldSchema, FieldType, RuleDescriptor, ValueMap};
//! use serde_json::json;
//!
//! let registry = RuleRegistry::with_builtins();
//! let field = FieldSchema::new("schedule", FieldType::Cron);
//! let rule = RuleDescriptor::new("cron");
//! let siblings = ValueMap::new();
//! let value = json!("*/5 * * * *");
//!
//! let outcome = registry.evaluate(&RuleContext::new(&field, &rule, &value, &siblings));
//! assert_eq!(outcome, Some(RuleOutcome::Pass));
//! ```

#![warn(missing_docs)]

pub mod builtin;
pub mod registry;

// Re-exports
pub use builtin::cron::{CronPrecheck, CronRule};
pub use registry::{FnRule, RuleContext, RuleEvaluator, RuleOutcome, RuleRegistry};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for rule evaluation
    pub use crate::{RuleContext, RuleEvaluator, RuleOutcome, RuleRegistry};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
