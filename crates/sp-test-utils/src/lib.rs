//! Testing utilities for the validation workspace
//!
//! Shared schema fixtures and value helpers.

#![allow(missing_docs)]

use serde_json::Value;
use sp_schema::{Condition, FieldSchema, FieldType, RuleDescriptor, ValueMap};

/// Turn a `json!` object into a value map
///
/// # Panics
/// Panics if `value` is not an object.
pub fn values(value: Value) -> ValueMap {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// `mode` select plus a `customUrl` that is required and only visible in
/// custom mode
pub fn visibility_schema() -> Vec<FieldSchema> {
    vec![
        FieldSchema::new("mode", FieldType::Select),
        FieldSchema::new("customUrl", FieldType::Url)
            .required()
            .visible_when(Condition::equals("mode", "custom"))
            .with_rule(RuleDescriptor::new("url")),
    ]
}

/// `auth` object with a required `token`
pub fn nested_auth_schema() -> Vec<FieldSchema> {
    vec![FieldSchema::new(
        "auth",
        FieldType::object(vec![FieldSchema::new("token", FieldType::Secret).required()]),
    )]
}

/// `steps` list whose items need a `timeout`
pub fn steps_schema() -> Vec<FieldSchema> {
    vec![FieldSchema::new(
        "steps",
        FieldType::list_of(vec![FieldSchema::new("timeout", FieldType::Number)
            .required()
            .with_rule(RuleDescriptor::new("min").with_param("value", 1))]),
    )]
}

/// A schedule trigger form: cron schedule, alert window, and a list of
/// HTTP checks with optional basic auth
pub fn schedule_trigger_schema() -> Vec<FieldSchema> {
    vec![
        FieldSchema::new("schedule", FieldType::Cron)
            .with_label("Schedule")
            .required()
            .with_rule(RuleDescriptor::new("cron")),
        FieldSchema::new("windowStart", FieldType::Time).with_rule(
            RuleDescriptor::new("less_than")
                .with_param("compareWith", "windowEnd")
                .with_message("window must start before it ends"),
        ),
        FieldSchema::new("windowEnd", FieldType::Time),
        FieldSchema::new(
            "checks",
            FieldType::list_of(vec![
                FieldSchema::new("url", FieldType::Url)
                    .required()
                    .with_rule(RuleDescriptor::new("url")),
                FieldSchema::new("method", FieldType::Select).with_default(Value::from("GET")),
                FieldSchema::new("authType", FieldType::Select),
                FieldSchema::new(
                    "basicAuth",
                    FieldType::object(vec![
                        FieldSchema::new("username", FieldType::String).required(),
                        FieldSchema::new("password", FieldType::Secret).required(),
                    ]),
                )
                .visible_when(Condition::equals("authType", "basic")),
            ]),
        )
        .with_rule(RuleDescriptor::new("max_length").with_param("value", 5)),
    ]
}

/// Catalog JSON of [`schedule_trigger_schema`]'s shape, as a backend sends it
pub const SCHEDULE_TRIGGER_JSON: &str = r#"[
  {"name": "schedule", "label": "Schedule", "type": "cron", "required": true,
   "validationRules": [{"type": "cron"}]},
  {"name": "windowStart", "type": "time",
   "validationRules": [{"type": "less_than", "compareWith": "windowEnd",
                        "message": "window must start before it ends"}]},
  {"name": "windowEnd", "type": "time"},
  {"name": "checks", "type": "list",
   "validationRules": [{"type": "max_length", "value": 5}],
   "typeOptions": {"list": {"itemDefinition": {"type": "object", "schema": [
     {"name": "url", "type": "url", "required": true, "validationRules": [{"type": "url"}]},
     {"name": "method", "type": "select", "default": "GET"},
     {"name": "authType", "type": "select"},
     {"name": "basicAuth", "type": "object",
      "visibilityConditions": [{"op": "equals", "field": "authType", "value": "basic"}],
      "typeOptions": {"object": {"schema": [
        {"name": "username", "type": "string", "required": true},
        {"name": "password", "type": "secret", "required": true}
      ]}}}
   ]}}}}
]"#;
