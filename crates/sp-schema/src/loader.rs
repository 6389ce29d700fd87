//! Schema and value documents
//!
//! JSON and YAML documents are accepted. A schema document is either a bare
//! array of fields or a map with a `fields` (or `configuration`) array.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::SchemaError;
use crate::field::{check_schema, FieldSchema};
use crate::value::ValueMap;

#[derive(Deserialize)]
#[serde(untagged)]
enum SchemaDocument {
    Fields(Vec<FieldSchema>),
    Wrapped {
        #[serde(alias = "configuration")]
        fields: Vec<FieldSchema>,
    },
}

impl SchemaDocument {
    fn into_checked(self) -> Result<Vec<FieldSchema>, SchemaError> {
        let fields = match self {
            Self::Fields(fields) | Self::Wrapped { fields } => fields,
        };
        check_schema(&fields)?;
        Ok(fields)
    }
}

/// Parse a schema from JSON
///
/// # Errors
/// Returns error if the document is invalid or fails [`check_schema`].
pub fn parse_schema_json(json: &str) -> Result<Vec<FieldSchema>, SchemaError> {
    serde_json::from_str::<SchemaDocument>(json)?.into_checked()
}

/// Parse a schema from YAML
///
/// # Errors
/// Returns error if the document is invalid or fails [`check_schema`].
pub fn parse_schema_yaml(yaml: &str) -> Result<Vec<FieldSchema>, SchemaError> {
    serde_yaml::from_str::<SchemaDocument>(yaml)?.into_checked()
}

/// Parse a value tree from JSON
///
/// # Errors
/// Returns error if the document is invalid or not a map.
pub fn parse_values_json(json: &str) -> Result<ValueMap, SchemaError> {
    into_map(serde_json::from_str(json)?)
}

/// Parse a value tree from YAML
///
/// # Errors
/// Returns error if the document is invalid or not a map.
pub fn parse_values_yaml(yaml: &str) -> Result<ValueMap, SchemaError> {
    into_map(serde_yaml::from_str(yaml)?)
}

/// Load a schema file, picking the format from its extension
///
/// # Errors
/// Returns error on I/O failure, unknown extension or invalid document.
pub fn load_schema(path: &Path) -> Result<Vec<FieldSchema>, SchemaError> {
    let text = read(path)?;
    match Format::of(path)? {
        Format::Json => parse_schema_json(&text),
        Format::Yaml => parse_schema_yaml(&text),
    }
}

/// Load a value file, picking the format from its extension
///
/// # Errors
/// Returns error on I/O failure, unknown extension or invalid document.
pub fn load_values(path: &Path) -> Result<ValueMap, SchemaError> {
    let text = read(path)?;
    match Format::of(path)? {
        Format::Json => parse_values_json(&text),
        Format::Yaml => parse_values_yaml(&text),
    }
}

enum Format {
    Json,
    Yaml,
}

impl Format {
    fn of(path: &Path) -> Result<Self, SchemaError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            other => Err(SchemaError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

fn read(path: &Path) -> Result<String, SchemaError> {
    std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn into_map(value: Value) -> Result<ValueMap, SchemaError> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(ValueMap::new()),
        Value::Array(_) => Err(SchemaError::ValuesNotAMap("array")),
        Value::String(_) => Err(SchemaError::ValuesNotAMap("string")),
        Value::Number(_) => Err(SchemaError::ValuesNotAMap("number")),
        Value::Bool(_) => Err(SchemaError::ValuesNotAMap("boolean")),
    }
}
