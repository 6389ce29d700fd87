//! Field schema tree
//!
//! The configuration-field catalog describes fields in a loose camelCase
//! shape (`type` string plus a `typeOptions` bag). Parsing turns that into
//! [`FieldType`], a tagged union whose list and object variants own their
//! nested schemas, so validation can match exhaustively instead of probing
//! option bags at runtime.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::condition::Condition;
use crate::error::SchemaError;
use crate::path::FieldPath;
use crate::rule::RuleDescriptor;

/// Type of a configurable value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    /// Single-line string
    String,
    /// Multi-line text
    Text,
    /// Number
    Number,
    /// Boolean toggle
    Boolean,
    /// One value out of a set
    Select,
    /// Several values out of a set
    MultiSelect,
    /// URL
    Url,
    /// Calendar date
    Date,
    /// Time of day
    Time,
    /// Cron expression
    Cron,
    /// Reference to a stored secret
    Secret,
    /// Template / expression string
    Expression,
    /// Ordered sequence of items
    List(ListItem),
    /// Nested map of fields
    Object {
        /// Nested schema, if declared
        schema: Option<Vec<FieldSchema>>,
    },
    /// Tag this crate does not know; validated like a scalar
    Other(String),
}

/// Element definition of a list field
#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    /// Declared element type tag
    pub item_type: String,
    /// Element schema, present for lists of objects
    pub schema: Option<Vec<FieldSchema>>,
}

impl FieldType {
    /// List of objects described by `schema`
    #[must_use]
    pub fn list_of(schema: Vec<FieldSchema>) -> Self {
        Self::List(ListItem {
            item_type: "object".to_string(),
            schema: Some(schema),
        })
    }

    /// Object described by `schema`
    #[must_use]
    pub fn object(schema: Vec<FieldSchema>) -> Self {
        Self::Object { schema: Some(schema) }
    }

    /// Wire tag
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Text => "text",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Select => "select",
            Self::MultiSelect => "multi-select",
            Self::Url => "url",
            Self::Date => "date",
            Self::Time => "time",
            Self::Cron => "cron",
            Self::Secret => "secret",
            Self::Expression => "expression",
            Self::List(_) => "list",
            Self::Object { .. } => "object",
            Self::Other(tag) => tag,
        }
    }

    /// Nested schemas owned by this type
    #[must_use]
    pub fn nested_schema(&self) -> Option<&[FieldSchema]> {
        match self {
            Self::List(item) => item.schema.as_deref(),
            Self::Object { schema } => schema.as_deref(),
            _ => None,
        }
    }

    fn from_wire(tag: &str, options: Option<TypeOptions>) -> Self {
        let options = options.unwrap_or_default();
        match tag {
            "string" => Self::String,
            "text" => Self::Text,
            "number" => Self::Number,
            "boolean" | "bool" => Self::Boolean,
            "select" => Self::Select,
            "multi-select" | "multiselect" => Self::MultiSelect,
            "url" => Self::Url,
            "date" => Self::Date,
            "time" => Self::Time,
            "cron" => Self::Cron,
            "secret" => Self::Secret,
            "expression" => Self::Expression,
            "list" => {
                let definition = options.list.and_then(|l| l.item_definition);
                Self::List(match definition {
                    Some(def) => ListItem {
                        item_type: def.item_type,
                        schema: def.schema,
                    },
                    None => ListItem {
                        item_type: "string".to_string(),
                        schema: None,
                    },
                })
            }
            "object" => Self::Object {
                schema: options.object.and_then(|o| o.schema),
            },
            other => Self::Other(other.to_string()),
        }
    }

    fn to_wire_options(&self) -> Option<TypeOptions> {
        match self {
            Self::List(item) => Some(TypeOptions {
                list: Some(ListOptions {
                    item_definition: Some(ItemDefinition {
                        item_type: item.item_type.clone(),
                        schema: item.schema.clone(),
                    }),
                }),
                object: None,
            }),
            Self::Object { schema } => Some(TypeOptions {
                list: None,
                object: Some(ObjectOptions { schema: schema.clone() }),
            }),
            _ => None,
        }
    }
}

/// One configurable value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireField", into = "WireField")]
pub struct FieldSchema {
    /// Key in the sibling value map
    pub name: String,
    /// Display label
    pub label: Option<String>,
    /// Help text
    pub description: Option<String>,
    /// Value type, including nested schemas
    pub field_type: FieldType,
    /// Always required
    pub required: bool,
    /// Required when all of these hold
    pub required_conditions: Vec<Condition>,
    /// Visible only when all of these hold
    pub visibility_conditions: Vec<Condition>,
    /// Rules applied to non-empty values, in order
    pub validation_rules: Vec<RuleDescriptor>,
    /// Value seeded when a form opens
    pub default: Option<Value>,
}

impl FieldSchema {
    /// Create optional, always-visible field
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            label: None,
            description: None,
            field_type,
            required: false,
            required_conditions: Vec::new(),
            visibility_conditions: Vec::new(),
            validation_rules: Vec::new(),
            default: None,
        }
    }

    /// Mark as always required
    #[inline]
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Add a required condition
    #[must_use]
    pub fn required_when(mut self, condition: Condition) -> Self {
        self.required_conditions.push(condition);
        self
    }

    /// Add a visibility condition
    #[must_use]
    pub fn visible_when(mut self, condition: Condition) -> Self {
        self.visibility_conditions.push(condition);
        self
    }

    /// Append a validation rule
    #[must_use]
    pub fn with_rule(mut self, rule: RuleDescriptor) -> Self {
        self.validation_rules.push(rule);
        self
    }

    /// Set the default value
    #[must_use]
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Set the display label
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Name shown to users
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// Check structural soundness of a schema tree
///
/// Every field needs a non-empty name, unique among its siblings. List
/// item schemas and object schemas are checked recursively.
///
/// # Errors
/// Returns the first offending field.
pub fn check_schema(schema: &[FieldSchema]) -> Result<(), SchemaError> {
    check_level(schema, &FieldPath::root())
}

fn check_level(schema: &[FieldSchema], parent: &FieldPath) -> Result<(), SchemaError> {
    let mut seen = HashSet::with_capacity(schema.len());

    for field in schema {
        if field.name.trim().is_empty() {
            return Err(SchemaError::EmptyName {
                parent: parent.to_string(),
            });
        }
        if !seen.insert(field.name.as_str()) {
            return Err(SchemaError::DuplicateName {
                parent: parent.to_string(),
                name: field.name.clone(),
            });
        }
        if let Some(nested) = field.field_type.nested_schema() {
            check_level(nested, &parent.child(&field.name))?;
        }
    }

    Ok(())
}

// Wire shape of the field catalog

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireField {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(rename = "type", default = "default_tag")]
    field_type: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    required_conditions: Vec<Condition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    visibility_conditions: Vec<Condition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    validation_rules: Vec<RuleDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    type_options: Option<TypeOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default: Option<Value>,
}

fn default_tag() -> String {
    "string".to_string()
}

fn default_item_tag() -> String {
    "object".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TypeOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    list: Option<ListOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    object: Option<ObjectOptions>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    item_definition: Option<ItemDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ItemDefinition {
    #[serde(rename = "type", default = "default_item_tag")]
    item_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    schema: Option<Vec<FieldSchema>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ObjectOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    schema: Option<Vec<FieldSchema>>,
}

impl TryFrom<WireField> for FieldSchema {
    type Error = SchemaError;

    fn try_from(wire: WireField) -> Result<Self, Self::Error> {
        if wire.name.trim().is_empty() {
            return Err(SchemaError::EmptyName { parent: String::new() });
        }

        Ok(Self {
            field_type: FieldType::from_wire(&wire.field_type, wire.type_options),
            name: wire.name,
            label: wire.label,
            description: wire.description,
            required: wire.required,
            required_conditions: wire.required_conditions,
            visibility_conditions: wire.visibility_conditions,
            validation_rules: wire.validation_rules,
            default: wire.default,
        })
    }
}

impl From<FieldSchema> for WireField {
    fn from(field: FieldSchema) -> Self {
        Self {
            type_options: field.field_type.to_wire_options(),
            field_type: field.field_type.tag().to_string(),
            name: field.name,
            label: field.label,
            description: field.description,
            required: field.required,
            required_conditions: field.required_conditions,
            visibility_conditions: field.visibility_conditions,
            validation_rules: field.validation_rules,
            default: field.default,
        }
    }
}
