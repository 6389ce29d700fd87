//! SuperPlane Configuration Validator
//!
//! Computes the validation errors of a nested configuration value tree
//! against its field schema.
//!
//! # Overview
//!
//! For every field, in declaration order:
//! 1. hidden fields (visibility conditions) are skipped with their subtree
//! 2. required and empty fields get one `required` error and nothing else
//! 3. non-empty values run each validation rule
//! 4. object fields recurse as `field.child`, list fields as `field[i].child`
//!
//! Validation is a query: findings come back as data, never as `Err`.
//!
//! # Example
//!
//! ```rust
//! use sp_validate::{ConfigurationValidator, ErrorKind};
//! use sp_schema::{FieldSchema, FieldType};
//! use serde_json::json;
//!
//! let schema = vec![FieldSchema::new(
//!     "auth",
//!     FieldType::object(vec![FieldSchema::new("token", FieldType::Secret).required()]),
//! )];
//! let values = json!({"auth": {}}).as_object().cloned().unwrap();
//!
//! let errors = ConfigurationValidator::new().validate(&schema, &values);
//! assert_eq!(errors.len(), 1);
//! assert_eq!(errors[0].field, "auth.token");
//! assert_eq!(errors[0].kind, ErrorKind::Required);
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod report;
pub mod validator;

// Re-exports
pub use config::{ConfigError, ValidatorConfig};
pub use error::{ErrorKind, ValidationError};
pub use report::{errors_for_field, first_error, has_field_error, ValidationReport};
pub use validator::ConfigurationValidator;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for configuration validation
    pub use crate::{
        ConfigurationValidator, ErrorKind, ValidationError, ValidationReport, ValidatorConfig,
    };
    pub use sp_schema::prelude::*;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
