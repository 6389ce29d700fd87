//! Debounce behavior under a paused clock

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use sp_session::{SessionConfig, SessionError, SessionState, ValidationSession};
use sp_test_utils::{nested_auth_schema, steps_schema, values, visibility_schema};
use sp_validate::{ConfigurationValidator, ErrorKind};
use tokio::time::sleep;

fn session() -> ValidationSession {
    ValidationSession::new(
        ConfigurationValidator::new(),
        visibility_schema(),
        SessionConfig::default(),
    )
    .unwrap()
}

#[tokio::test(start_paused = true)]
async fn rapid_changes_validate_once() {
    let session = session();

    for i in 0..5 {
        session
            .on_values_changed(values(json!({
                "mode": "custom",
                "customUrl": format!("https://example.com/{i}")
            })))
            .unwrap();
        sleep(Duration::from_millis(20)).await;
    }

    // The first change's deadline has passed, but every change reset it.
    sleep(Duration::from_millis(250)).await;
    assert_eq!(session.state(), SessionState::Pending);
    assert_eq!(session.stats().validations, 0);

    sleep(Duration::from_millis(100)).await;
    assert_eq!(session.state(), SessionState::Validated);
    assert_eq!(session.stats().validations, 1);
    assert_eq!(session.stats().timer_restarts, 4);
    assert!(session.is_valid());
}

#[tokio::test(start_paused = true)]
async fn validate_now_cancels_pending_timer() {
    let session = session();
    session
        .on_values_changed(values(json!({"mode": "custom", "customUrl": ""})))
        .unwrap();

    let errors = session.validate_now().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, "customUrl");
    assert_eq!(errors[0].kind, ErrorKind::Required);
    assert_eq!(session.state(), SessionState::Validated);

    sleep(Duration::from_secs(1)).await;
    assert_eq!(session.stats().validations, 1);
    assert!(!session.is_valid());
    assert!(session.has_error("customUrl"));
    assert!(!session.has_error("mode"));
}

#[tokio::test(start_paused = true)]
async fn dispose_cancels_timer_and_rejects_changes() {
    let session = session();
    let updates = session.subscribe();
    session
        .on_values_changed(values(json!({"mode": "custom"})))
        .unwrap();
    session.dispose();
    session.dispose();

    sleep(Duration::from_secs(1)).await;
    assert_eq!(session.stats().validations, 0);
    assert!(session.is_disposed());

    // Never validated, so never reported valid.
    assert_eq!(session.state(), SessionState::Pending);
    assert!(!session.is_valid());
    assert_eq!(*updates.borrow(), session.snapshot());

    let result = session.on_values_changed(values(json!({"mode": "default"})));
    assert!(matches!(result, Err(SessionError::Disposed)));
    assert!(matches!(session.validate_now(), Err(SessionError::Disposed)));
}

#[tokio::test(start_paused = true)]
async fn hiding_a_field_clears_its_earlier_error() {
    let session = session();

    session
        .on_values_changed(values(json!({"mode": "custom", "customUrl": ""})))
        .unwrap();
    session.validate_now().unwrap();
    assert!(session.has_error("customUrl"));
    assert!(!session.is_valid());

    session
        .on_values_changed(values(json!({"mode": "default", "customUrl": ""})))
        .unwrap();
    let errors = session.validate_now().unwrap();
    assert!(errors.is_empty());
    assert!(!session.has_error("customUrl"));
    assert!(session.is_valid());
}

#[tokio::test(start_paused = true)]
async fn identical_values_do_not_restart_timer() {
    let session = session();
    let form = values(json!({"mode": "default"}));

    session.on_values_changed(form.clone()).unwrap();
    sleep(Duration::from_millis(200)).await;
    session.on_values_changed(form.clone()).unwrap();
    assert_eq!(session.stats().timer_restarts, 0);

    // Fires on the original deadline.
    sleep(Duration::from_millis(101)).await;
    assert_eq!(session.stats().validations, 1);

    session.on_values_changed(form).unwrap();
    assert_eq!(session.state(), SessionState::Validated);
    sleep(Duration::from_secs(1)).await;
    assert_eq!(session.stats().validations, 1);
}

#[tokio::test(start_paused = true)]
async fn reverting_to_validated_values_skips_revalidation() {
    let session = session();
    let original = values(json!({"mode": "custom", "customUrl": "https://example.com"}));

    session.on_values_changed(original.clone()).unwrap();
    session.validate_now().unwrap();

    session
        .on_values_changed(values(json!({"mode": "custom", "customUrl": "https://exa"})))
        .unwrap();
    assert_eq!(session.state(), SessionState::Pending);

    session.on_values_changed(original).unwrap();
    assert_eq!(session.state(), SessionState::Validated);
    assert!(session.is_valid());

    sleep(Duration::from_secs(1)).await;
    assert_eq!(session.stats().validations, 1);
}

#[tokio::test(start_paused = true)]
async fn schema_change_schedules_validation() {
    let session = ValidationSession::new(
        ConfigurationValidator::new(),
        nested_auth_schema(),
        SessionConfig::new().with_debounce(Duration::from_millis(50)),
    )
    .unwrap();
    session
        .on_values_changed(values(json!({"auth": {}, "steps": [{"timeout": 0}]})))
        .unwrap();
    sleep(Duration::from_millis(60)).await;
    assert_eq!(session.errors_for("auth").len(), 1);
    assert!(session.errors_for("steps").is_empty());

    let same = session.on_schema_changed(nested_auth_schema()).unwrap();
    assert_eq!(same.state, SessionState::Validated);

    let changed = session.on_schema_changed(steps_schema()).unwrap();
    assert_eq!(changed.state, SessionState::Pending);

    sleep(Duration::from_millis(60)).await;
    let errors = session.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, "steps[0].timeout");
    assert_eq!(errors[0].message, "must be at least 1");
}

#[tokio::test(start_paused = true)]
async fn subscribers_see_state_transitions() {
    let session = session();
    let mut updates = session.subscribe();

    session
        .on_values_changed(values(json!({"mode": "custom"})))
        .unwrap();
    updates.changed().await.unwrap();
    assert_eq!(updates.borrow_and_update().state, SessionState::Pending);

    let validated = updates
        .wait_for(|s| s.state == SessionState::Validated)
        .await
        .unwrap()
        .clone();
    assert_eq!(validated.revision, 1);
    assert_eq!(validated.errors.len(), 1);
    assert!(!validated.is_valid());
}

#[tokio::test(start_paused = true)]
async fn dropping_session_closes_updates() {
    let session = session();
    let mut updates = session.subscribe();
    session
        .on_values_changed(values(json!({"mode": "custom"})))
        .unwrap();
    updates.borrow_and_update();

    drop(session);
    assert!(updates.changed().await.is_err());
}
