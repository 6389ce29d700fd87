//! SuperPlane Field Schemas
//!
//! Declarative descriptions of configurable values and the value trees
//! users fill in against them.
//!
//! # Overview
//!
//! The schema crate provides:
//! - **FieldSchema**: one configurable value, possibly nested (objects, lists)
//! - **Condition**: visibility / required predicates over sibling values
//! - **RuleDescriptor**: declarative validation rules resolved by `sp-rules`
//! - **ValueMap**: the value tree, plus the shared emptiness predicate
//! - **FieldPath**: `parent.child` / `parent[index]` error paths
//!
//! # Example
//!
//! ```rust
//! use sp_schema::{parse_schema_json, is_empty_value, FieldType};
//! use serde_json::json;
//!
//! let schema = parse_schema_json(r#"[
//!     {"name": "url", "type": "url", "required": true}
//! ]"#).unwrap();
//!
//! assert_eq!(schema[0].field_type, FieldType::Url);
//! assert!(is_empty_value(Some(&json!("   "))));
//! ```

#![warn(missing_docs)]

pub mod condition;
pub mod error;
pub mod field;
pub mod loader;
pub mod path;
pub mod rule;
pub mod value;

// Re-exports
pub use condition::{Condition, CustomCondition};
pub use error::SchemaError;
pub use field::{check_schema, FieldSchema, FieldType, ListItem};
pub use loader::{load_schema, load_values, parse_schema_json, parse_schema_yaml, parse_values_json, parse_values_yaml};
pub use path::{matches_field, FieldPath};
pub use rule::RuleDescriptor;
pub use value::{is_empty_value, seed_values, ValueMap};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for schema operations
    pub use crate::{
        is_empty_value, Condition, FieldPath, FieldSchema, FieldType, RuleDescriptor, SchemaError,
        ValueMap,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
