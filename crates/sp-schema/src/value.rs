//! Value trees and the shared emptiness rule

use serde_json::Value;

use crate::field::{FieldSchema, FieldType};

/// Value tree for one nesting level: field name to value
pub type ValueMap = serde_json::Map<String, Value>;

/// Whether a value counts as "not filled in"
///
/// - missing or `null`: empty
/// - string: empty iff it trims to nothing
/// - array: empty iff it has no elements
/// - object: empty iff it has no keys
/// - numbers and booleans: never empty
///
/// # Examples
/// ```
/// # use sp_schema::is_empty_value;
/// # use serde_json::json;
/// assert!(is_empty_value(None));
/// assert!(is_empty_value(Some(&json!({}))));
/// assert!(!is_empty_value(Some(&json!(0))));
/// assert!(!is_empty_value(Some(&json!(" x "))));
/// ```
#[inline]
#[must_use]
pub fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(Value::Number(_) | Value::Bool(_)) => false,
    }
}

/// Seed a value tree for a form that is being opened
///
/// Schema defaults fill in keys the existing configuration lacks. Existing
/// values always win, and object fields are merged recursively so nested
/// defaults survive a partial existing object. Keys of `existing` that the
/// schema does not declare are carried over untouched.
#[must_use]
pub fn seed_values(schema: &[FieldSchema], existing: &ValueMap) -> ValueMap {
    let mut seeded = existing.clone();

    for field in schema {
        let current = existing.get(&field.name);

        let merged = match (&field.field_type, current) {
            (FieldType::Object { schema: Some(nested) }, Some(Value::Object(inner))) => {
                Some(Value::Object(seed_values(nested, inner)))
            }
            (_, Some(value)) => Some(value.clone()),
            (FieldType::Object { schema: Some(nested) }, None) => match &field.default {
                Some(Value::Object(inner)) => Some(Value::Object(seed_values(nested, inner))),
                Some(other) => Some(other.clone()),
                None => {
                    let nested_defaults = seed_values(nested, &ValueMap::new());
                    (!nested_defaults.is_empty()).then_some(Value::Object(nested_defaults))
                }
            },
            (_, None) => field.default.clone(),
        };

        if let Some(value) = merged {
            seeded.insert(field.name.clone(), value);
        }
    }

    seeded
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    fn map(value: Value) -> ValueMap {
        match value {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn emptiness_boundary_cases() {
        for empty in [json!(""), json!("   "), json!([]), json!({}), Value::Null] {
            assert!(is_empty_value(Some(&empty)), "{empty} should be empty");
        }
        assert!(is_empty_value(None));

        for filled in [json!(0), json!(false), json!(" x "), json!([0]), json!({"a": null})] {
            assert!(!is_empty_value(Some(&filled)), "{filled} should not be empty");
        }
    }

    #[test]
    fn seed_prefers_existing_values() {
        let schema = vec![
            FieldSchema::new("interval", FieldType::Number).with_default(json!(30)),
            FieldSchema::new("mode", FieldType::Select).with_default(json!("default")),
        ];
        let existing = map(json!({"interval": 60}));

        let seeded = seed_values(&schema, &existing);
        assert_eq!(seeded, map(json!({"interval": 60, "mode": "default"})));
    }

    #[test]
    fn seed_merges_nested_objects() {
        let schema = vec![FieldSchema::new(
            "auth",
            FieldType::Object {
                schema: Some(vec![
                    FieldSchema::new("method", FieldType::Select).with_default(json!("token")),
                    FieldSchema::new("token", FieldType::Secret),
                ]),
            },
        )];

        let seeded = seed_values(&schema, &ValueMap::new());
        assert_eq!(seeded, map(json!({"auth": {"method": "token"}})));

        let existing = map(json!({"auth": {"token": "abc"}, "extra": true}));
        let seeded = seed_values(&schema, &existing);
        assert_eq!(
            seeded,
            map(json!({"auth": {"method": "token", "token": "abc"}, "extra": true}))
        );
    }

    proptest! {
        #[test]
        fn whitespace_strings_are_empty(s in "[ \t\n]{0,16}") {
            prop_assert!(is_empty_value(Some(&Value::String(s))));
        }

        #[test]
        fn strings_with_content_are_not_empty(pad in "[ ]{0,4}", core in "[a-z0-9]{1,8}") {
            let s = format!("{pad}{core}{pad}");
            prop_assert!(!is_empty_value(Some(&Value::String(s))));
        }

        #[test]
        fn numbers_are_never_empty(n in any::<i64>()) {
            prop_assert!(!is_empty_value(Some(&json!(n))));
        }
    }
}
