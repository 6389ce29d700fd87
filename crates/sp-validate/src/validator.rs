//! Configuration validator
//!
//! One pass walks the schema depth-first in declaration order. Each field's
//! conditions see the value map of its own nesting level only: nested
//! objects and list elements become the sibling map of their children.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;
use sp_rules::{RuleContext, RuleOutcome, RuleRegistry};
use sp_schema::{is_empty_value, FieldPath, FieldSchema, FieldType, ListItem, ValueMap};

use crate::config::ValidatorConfig;
use crate::error::ValidationError;
use crate::report::ValidationReport;

/// Schema-driven validator for nested configuration values
///
/// Cheap to clone; the rule registry is shared.
#[derive(Debug, Clone)]
pub struct ConfigurationValidator {
    registry: Arc<RuleRegistry>,
    config: ValidatorConfig,
}

impl ConfigurationValidator {
    /// Validator with built-in rules and default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ValidatorConfig::default())
    }

    /// Validator with built-in rules tuned by `config`
    #[must_use]
    pub fn with_config(config: ValidatorConfig) -> Self {
        let registry = RuleRegistry::with_builtins_and(config.cron_precheck);
        Self::with_registry(registry, config)
    }

    /// Validator with a caller-supplied rule registry
    #[must_use]
    pub fn with_registry(registry: RuleRegistry, config: ValidatorConfig) -> Self {
        Self {
            registry: Arc::new(registry),
            config,
        }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Rule registry
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Validate `values` against `schema`
    ///
    /// Returns the errors in schema declaration order. An empty schema
    /// yields no errors; missing keys count as empty.
    #[must_use]
    pub fn validate(&self, schema: &[FieldSchema], values: &ValueMap) -> Vec<ValidationError> {
        self.validate_report(schema, values).into_errors()
    }

    /// Validate and also report the fields skipped as hidden
    #[must_use]
    pub fn validate_report(&self, schema: &[FieldSchema], values: &ValueMap) -> ValidationReport {
        let mut pass = Pass::new(self);
        pass.walk(schema, values, &FieldPath::root(), 0);

        tracing::debug!(
            fields = schema.len(),
            errors = pass.report.errors.len(),
            hidden = pass.report.hidden.len(),
            "validated configuration"
        );
        pass.report
    }

    /// Validate a free-standing name alongside the schema-driven fields
    ///
    /// The name uses the same emptiness rule as every other field and is
    /// reported first, at [`ValidatorConfig::name_field`].
    #[must_use]
    pub fn validate_named(
        &self,
        name: Option<&str>,
        schema: &[FieldSchema],
        values: &ValueMap,
    ) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        let name = name.map(Value::from);
        if is_empty_value(name.as_ref()) {
            errors.push(ValidationError::required(
                self.config.name_field.clone(),
                "Name is required",
            ));
        }

        errors.extend(self.validate(schema, values));
        errors
    }
}

impl Default for ConfigurationValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Dedup key for one finding slot of one path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Slot {
    Required,
    Rule(usize),
    Depth,
}

struct Pass<'v> {
    validator: &'v ConfigurationValidator,
    report: ValidationReport,
    seen: HashSet<(String, Slot)>,
}

impl<'v> Pass<'v> {
    fn new(validator: &'v ConfigurationValidator) -> Self {
        Self {
            validator,
            report: ValidationReport::default(),
            seen: HashSet::new(),
        }
    }

    fn record(&mut self, slot: Slot, error: ValidationError) {
        if self.seen.insert((error.field.clone(), slot)) {
            self.report.errors.push(error);
        }
    }

    fn walk(&mut self, schema: &[FieldSchema], values: &ValueMap, prefix: &FieldPath, depth: usize) {
        if depth > self.validator.config.max_depth {
            tracing::warn!(
                path = %prefix,
                max_depth = self.validator.config.max_depth,
                "schema nesting too deep, not descending"
            );
            self.record(
                Slot::Depth,
                ValidationError::rule(
                    prefix.as_str(),
                    format!(
                        "nested deeper than the maximum depth of {}",
                        self.validator.config.max_depth
                    ),
                ),
            );
            return;
        }

        for field in schema {
            let path = prefix.child(&field.name);

            if !is_visible(field, values) {
                tracing::trace!(path = %path, "field hidden");
                self.report.hidden.push(ValidationError::hidden(path.into_string()));
                continue;
            }

            let value = values.get(&field.name);
            let empty = is_empty_value(value);

            if empty && is_required(field, values) {
                self.record(
                    Slot::Required,
                    ValidationError::required(
                        path.as_str(),
                        format!("{} is required", field.display_name()),
                    ),
                );
                continue;
            }

            if let Some(value) = value.filter(|_| !empty) {
                self.check_rules(field, value, values, &path);
            }

            self.descend(field, value, &path, depth);
        }
    }

    fn check_rules(&mut self, field: &FieldSchema, value: &Value, siblings: &ValueMap, path: &FieldPath) {
        let validator = self.validator;
        let registry = &validator.registry;

        for (index, descriptor) in field.validation_rules.iter().enumerate() {
            let ctx = RuleContext::new(field, descriptor, value, siblings);
            match registry.evaluate(&ctx) {
                Some(RuleOutcome::Pass) => {}
                Some(RuleOutcome::Fail(message)) => {
                    self.record(Slot::Rule(index), ValidationError::rule(path.as_str(), message));
                }
                None => {
                    tracing::debug!(path = %path, rule = %descriptor.kind, "unknown rule type, skipped");
                }
            }
        }
    }

    fn descend(&mut self, field: &FieldSchema, value: Option<&Value>, path: &FieldPath, depth: usize) {
        match &field.field_type {
            FieldType::Object { schema: Some(nested) } => {
                if let Some(Value::Object(map)) = value {
                    self.walk(nested, map, path, depth + 1);
                }
            }
            FieldType::List(ListItem {
                schema: Some(item_schema),
                ..
            }) => {
                let Some(Value::Array(items)) = value else {
                    return;
                };
                for (index, item) in items.iter().enumerate() {
                    match item {
                        Value::Object(map) => self.walk(item_schema, map, &path.index(index), depth + 1),
                        _ => tracing::trace!(path = %path.index(index), "list item is not a map, skipped"),
                    }
                }
            }
            FieldType::Object { schema: None }
            | FieldType::List(ListItem { schema: None, .. })
            | FieldType::String
            | FieldType::Text
            | FieldType::Number
            | FieldType::Boolean
            | FieldType::Select
            | FieldType::MultiSelect
            | FieldType::Url
            | FieldType::Date
            | FieldType::Time
            | FieldType::Cron
            | FieldType::Secret
            | FieldType::Expression
            | FieldType::Other(_) => {}
        }
    }
}

fn is_visible(field: &FieldSchema, siblings: &ValueMap) -> bool {
    field.visibility_conditions.iter().all(|c| c.evaluate(siblings))
}

fn is_required(field: &FieldSchema, siblings: &ValueMap) -> bool {
    field.required
        || (!field.required_conditions.is_empty()
            && field.required_conditions.iter().all(|c| c.evaluate(siblings)))
}
