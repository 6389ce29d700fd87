//! Session errors

/// Errors from session operations
///
/// Validation findings are never errors; these only cover misuse of the
/// session itself.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Session created outside a Tokio runtime
    #[error("validation session requires a running Tokio runtime")]
    NoRuntime,

    /// Session used after `dispose`
    #[error("validation session has been disposed")]
    Disposed,

    /// Values could not be fingerprinted
    #[error("failed to fingerprint values: {0}")]
    Fingerprint(#[from] serde_json::Error),
}
