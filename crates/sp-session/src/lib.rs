//! SuperPlane Validation Sessions
//!
//! Adapts the configuration validator to interactive editing: validation
//! is debounced while the user types, and can be forced on submit.
//!
//! # Overview
//!
//! A [`ValidationSession`] moves between three states:
//! - **Idle**: nothing validated, nothing pending
//! - **Pending**: a debounce timer is running for the latest values
//! - **Validated**: the stored errors reflect the current values
//!
//! Every change that alters the (schema, values) fingerprint restarts the
//! timer. [`ValidationSession::validate_now`] cancels the timer and
//! validates synchronously. Disposing (or dropping) the session cancels any
//! outstanding timer; a timer that fires late is a no-op.
//!
//! # Example
//!
//! ```rust,no_run
//! use sp_session::{SessionConfig, ValidationSession};
//! use sp_validate::ConfigurationValidator;
//! use sp_schema::{FieldSchema, FieldType};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), sp_session::SessionError> {
//! let schema = vec![FieldSchema::new("url", FieldType::Url).required()];
//! let session = ValidationSession::new(ConfigurationValidator::new(), schema, SessionConfig::default())?;
//!
//! session.on_values_changed(json!({"url": ""}).as_object().cloned().unwrap_or_default())?;
//! let errors = session.validate_now()?;
//! assert_eq!(errors[0].field, "url");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod session;

// Re-exports
pub use config::SessionConfig;
pub use error::SessionError;
pub use session::{SessionSnapshot, SessionState, SessionStats, ValidationSession};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
