//! Schema loading and structure errors

use std::path::PathBuf;

/// Errors raised while loading or checking a field schema
///
/// Validation findings are never reported through this type; it only covers
/// documents that cannot be turned into a schema or value tree at all.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Document is not valid JSON
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Document is not valid YAML
    #[error("invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    /// File could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// File extension does not name a supported format
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// A field was declared without a name
    #[error("field under '{parent}' has an empty name")]
    EmptyName {
        /// Path of the enclosing field (empty at top level)
        parent: String,
    },

    /// Two sibling fields share a name
    #[error("duplicate field '{name}' under '{parent}'")]
    DuplicateName {
        /// Path of the enclosing field (empty at top level)
        parent: String,
        /// The repeated name
        name: String,
    },

    /// A value document was not a map at the top level
    #[error("value document must be a map, found {0}")]
    ValuesNotAMap(&'static str),
}
