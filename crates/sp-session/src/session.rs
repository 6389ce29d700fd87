//! Debounced validation session

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sp_schema::{seed_values, FieldSchema, ValueMap};
use sp_validate::{errors_for_field, has_field_error, ConfigurationValidator, ValidationError};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::SessionConfig;
use crate::error::SessionError;

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Nothing validated yet and nothing scheduled
    Idle,
    /// Latest changes not yet validated; stored errors may be stale
    Pending,
    /// Stored errors reflect the current schema and values
    Validated,
}

/// Point-in-time view of a session, published to subscribers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Current state
    pub state: SessionState,
    /// Errors from the most recent validation
    pub errors: Vec<ValidationError>,
    /// Number of completed validations
    pub revision: u64,
}

impl SessionSnapshot {
    /// Valid when validated (or idle) with no errors
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.state != SessionState::Pending && self.errors.is_empty()
    }
}

/// Session counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Validations run, debounced or forced
    pub validations: u64,
    /// Running timers replaced or cancelled by a newer change
    pub timer_restarts: u64,
    /// Timers that fired after being superseded
    pub stale_firings: u64,
}

struct Inner {
    validator: ConfigurationValidator,
    schema: Vec<FieldSchema>,
    values: ValueMap,
    schema_epoch: u64,
    current: blake3::Hash,
    validated: Option<blake3::Hash>,
    state: SessionState,
    errors: Vec<ValidationError>,
    generation: u64,
    timer: Option<JoinHandle<()>>,
    disposed: bool,
    revision: u64,
    stats: SessionStats,
    updates: watch::Sender<SessionSnapshot>,
}

impl Inner {
    fn ensure_live(&self) -> Result<(), SessionError> {
        if self.disposed {
            Err(SessionError::Disposed)
        } else {
            Ok(())
        }
    }

    /// BLAKE3 over the schema epoch and the serialized values. Map keys
    /// serialize sorted, so key order does not affect the result.
    fn fingerprint(&self) -> Result<blake3::Hash, SessionError> {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.schema_epoch.to_le_bytes());
        serde_json::to_writer(&mut hasher, &self.values)?;
        Ok(hasher.finalize())
    }

    /// Abort the running timer, if any, and invalidate its generation.
    fn cancel_timer(&mut self) -> bool {
        self.generation += 1;
        match self.timer.take() {
            Some(timer) => {
                timer.abort();
                true
            },
            None => false,
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            errors: self.errors.clone(),
            revision: self.revision,
        }
    }

    fn publish(&self) {
        self.updates.send_replace(self.snapshot());
    }

    fn run_validation(&mut self) {
        self.errors = self.validator.validate(&self.schema, &self.values);
        self.validated = Some(self.current);
        self.state = SessionState::Validated;
        self.revision += 1;
        self.stats.validations += 1;
        self.timer = None;
        tracing::debug!(
            revision = self.revision,
            errors = self.errors.len(),
            "session validated"
        );
        self.publish();
    }
}

/// Debounced validation over an editable (schema, values) pair
///
/// Cheap to query from any thread. Timers run on the Tokio runtime the
/// session was created in and hold only a weak reference to session
/// state, so dropping the session is always enough to stop them.
pub struct ValidationSession {
    inner: Arc<Mutex<Inner>>,
    runtime: Handle,
    config: SessionConfig,
}

impl ValidationSession {
    /// Create a session with empty values
    ///
    /// # Errors
    ///
    /// [`SessionError::NoRuntime`] when called outside a Tokio runtime.
    pub fn new(
        validator: ConfigurationValidator,
        schema: Vec<FieldSchema>,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        Self::open(validator, schema, &ValueMap::new(), config)
    }

    /// Create a session seeded from schema defaults and existing values
    ///
    /// # Errors
    ///
    /// [`SessionError::NoRuntime`] when called outside a Tokio runtime, or
    /// [`SessionError::Fingerprint`] if the seeded values cannot be hashed.
    pub fn open(
        validator: ConfigurationValidator,
        schema: Vec<FieldSchema>,
        existing: &ValueMap,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        let runtime = Handle::try_current().map_err(|_| SessionError::NoRuntime)?;
        let values = seed_values(&schema, existing);
        let (updates, _) = watch::channel(SessionSnapshot {
            state: SessionState::Idle,
            errors: Vec::new(),
            revision: 0,
        });

        let mut inner = Inner {
            validator,
            schema,
            values,
            schema_epoch: 0,
            current: blake3::hash(&[]),
            validated: None,
            state: SessionState::Idle,
            errors: Vec::new(),
            generation: 0,
            timer: None,
            disposed: false,
            revision: 0,
            stats: SessionStats::default(),
            updates,
        };
        inner.current = inner.fingerprint()?;

        tracing::debug!(
            fields = inner.schema.len(),
            debounce_ms = config.debounce_ms,
            "validation session opened"
        );

        Ok(Self {
            inner: Arc::new(Mutex::new(inner)),
            runtime,
            config,
        })
    }

    /// Session configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Replace the form values and schedule validation
    ///
    /// Values equal to the ones already pending leave the running timer
    /// alone. Values equal to the last validated ones cancel the timer and
    /// restore the validated state without running again.
    ///
    /// # Errors
    ///
    /// [`SessionError::Disposed`] after [`dispose`](Self::dispose).
    pub fn on_values_changed(&self, values: ValueMap) -> Result<SessionSnapshot, SessionError> {
        let mut inner = self.inner.lock();
        inner.ensure_live()?;
        inner.values = values;
        self.schedule(&mut inner)?;
        Ok(inner.snapshot())
    }

    /// Replace the schema and schedule validation
    ///
    /// An identical schema is not a change.
    ///
    /// # Errors
    ///
    /// [`SessionError::Disposed`] after [`dispose`](Self::dispose).
    pub fn on_schema_changed(
        &self,
        schema: Vec<FieldSchema>,
    ) -> Result<SessionSnapshot, SessionError> {
        let mut inner = self.inner.lock();
        inner.ensure_live()?;
        if inner.schema != schema {
            inner.schema = schema;
            inner.schema_epoch += 1;
            self.schedule(&mut inner)?;
        }
        Ok(inner.snapshot())
    }

    /// Cancel any pending timer and validate immediately
    ///
    /// # Errors
    ///
    /// [`SessionError::Disposed`] after [`dispose`](Self::dispose).
    pub fn validate_now(&self) -> Result<Vec<ValidationError>, SessionError> {
        let mut inner = self.inner.lock();
        inner.ensure_live()?;
        if inner.cancel_timer() {
            inner.stats.timer_restarts += 1;
        }
        inner.run_validation();
        Ok(inner.errors.clone())
    }

    /// Cancel any pending timer and reject further changes
    ///
    /// Idempotent. Queries keep returning the last known results. A session
    /// disposed while pending stays pending, since its current values were
    /// never validated.
    pub fn dispose(&self) {
        let mut inner = self.inner.lock();
        if inner.disposed {
            return;
        }
        inner.disposed = true;
        inner.cancel_timer();
        inner.publish();
        tracing::debug!(revision = inner.revision, state = ?inner.state, "validation session disposed");
    }

    /// Whether the session was disposed
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.inner.lock().disposed
    }

    /// True when no validation is pending and the last one found nothing
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.inner.lock().snapshot().is_valid()
    }

    /// Errors from the most recent validation
    #[must_use]
    pub fn errors(&self) -> Vec<ValidationError> {
        self.inner.lock().errors.clone()
    }

    /// Errors at `field` or beneath it
    #[must_use]
    pub fn errors_for(&self, field: &str) -> Vec<ValidationError> {
        errors_for_field(&self.inner.lock().errors, field)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Whether any error sits at `field` or beneath it
    #[must_use]
    pub fn has_error(&self, field: &str) -> bool {
        has_field_error(&self.inner.lock().errors, field)
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.inner.lock().state
    }

    /// Current values
    #[must_use]
    pub fn values(&self) -> ValueMap {
        self.inner.lock().values.clone()
    }

    /// Current schema
    #[must_use]
    pub fn schema(&self) -> Vec<FieldSchema> {
        self.inner.lock().schema.clone()
    }

    /// Current snapshot
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.lock().snapshot()
    }

    /// Counters
    #[must_use]
    pub fn stats(&self) -> SessionStats {
        self.inner.lock().stats
    }

    /// Receive a snapshot on every state change
    ///
    /// The channel closes when the session is dropped.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.lock().updates.subscribe()
    }

    fn schedule(&self, inner: &mut Inner) -> Result<(), SessionError> {
        let fingerprint = inner.fingerprint()?;
        let previous = std::mem::replace(&mut inner.current, fingerprint);

        if inner.state == SessionState::Pending && inner.timer.is_some() {
            if fingerprint == previous {
                return Ok(());
            }
            if inner.validated == Some(fingerprint) {
                // Edited back to what was last validated.
                inner.cancel_timer();
                inner.stats.timer_restarts += 1;
                inner.state = SessionState::Validated;
                inner.publish();
                return Ok(());
            }
        } else if inner.validated == Some(fingerprint) {
            return Ok(());
        }

        if inner.cancel_timer() {
            inner.stats.timer_restarts += 1;
        }
        let generation = inner.generation;
        let debounce = self.config.debounce();
        let weak: Weak<Mutex<Inner>> = Arc::downgrade(&self.inner);

        inner.timer = Some(self.runtime.spawn(async move {
            tokio::time::sleep(debounce).await;
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let mut inner = shared.lock();
            if inner.disposed || inner.generation != generation {
                inner.stats.stale_firings += 1;
                tracing::trace!(generation, "ignoring superseded validation timer");
                return;
            }
            inner.run_validation();
        }));

        if inner.state != SessionState::Pending {
            inner.state = SessionState::Pending;
            inner.publish();
        }
        tracing::trace!(generation, "validation scheduled");
        Ok(())
    }
}

impl Drop for ValidationSession {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for ValidationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("ValidationSession")
            .field("state", &inner.state)
            .field("errors", &inner.errors.len())
            .field("revision", &inner.revision)
            .field("disposed", &inner.disposed)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sp_schema::FieldType;
    use std::time::Duration;

    fn url_schema() -> Vec<FieldSchema> {
        vec![FieldSchema::new("url", FieldType::Url).required()]
    }

    #[test]
    fn requires_runtime() {
        let result = ValidationSession::new(
            ConfigurationValidator::new(),
            url_schema(),
            SessionConfig::default(),
        );
        assert!(matches!(result, Err(SessionError::NoRuntime)));
    }

    #[tokio::test(start_paused = true)]
    async fn starts_idle_and_valid() {
        let session = ValidationSession::new(
            ConfigurationValidator::new(),
            url_schema(),
            SessionConfig::default(),
        )
        .unwrap();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.is_valid());
    }

    #[tokio::test(start_paused = true)]
    async fn open_seeds_defaults() {
        let schema = vec![FieldSchema::new("method", FieldType::Select).with_default(json!("GET"))];
        let session = ValidationSession::open(
            ConfigurationValidator::new(),
            schema,
            &ValueMap::new(),
            SessionConfig::default(),
        )
        .unwrap();
        assert_eq!(session.values().get("method"), Some(&json!("GET")));
    }

    #[tokio::test(start_paused = true)]
    async fn pending_session_is_not_valid() {
        let session = ValidationSession::new(
            ConfigurationValidator::new(),
            url_schema(),
            SessionConfig::default(),
        )
        .unwrap();
        let mut values = ValueMap::new();
        values.insert("url".into(), json!("https://example.com"));
        let snapshot = session.on_values_changed(values).unwrap();

        assert_eq!(snapshot.state, SessionState::Pending);
        assert!(snapshot.errors.is_empty());
        assert!(!session.is_valid());

        tokio::time::sleep(Duration::from_millis(301)).await;
        assert!(session.is_valid());
    }
}
