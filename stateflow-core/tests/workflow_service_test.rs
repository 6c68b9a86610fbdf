//! Integration tests for the workflow service facade

use stateflow_core::models::workflow::{Action, State, WorkflowDefinition};
use stateflow_core::storage::MemoryStorage;
use stateflow_core::workflow::{
    ExecutionError, ValidationError, WorkflowError, WorkflowService,
};
use std::sync::Arc;

fn service() -> WorkflowService {
    WorkflowService::new(Arc::new(MemoryStorage::new()))
}

/// Minimal two-state document workflow: Draft -> submit -> Done (final).
fn draft_done_definition() -> WorkflowDefinition {
    WorkflowDefinition {
        id: "document".to_string(),
        states: vec![
            State {
                id: "Draft".to_string(),
                is_initial: true,
                is_final: false,
                enabled: true,
            },
            State {
                id: "Done".to_string(),
                is_initial: false,
                is_final: true,
                enabled: true,
            },
        ],
        actions: vec![Action {
            id: "submit".to_string(),
            enabled: true,
            from_states: vec!["Draft".to_string()],
            to_state: "Done".to_string(),
        }],
    }
}

#[tokio::test]
async fn test_create_then_get_round_trips_all_fields() {
    let service = service();
    let definition = draft_done_definition();

    let created = service.create_definition(definition.clone()).await.unwrap();
    assert_eq!(created, definition);

    let loaded = service.get_definition("document").await.unwrap();
    assert_eq!(loaded, definition);

    let listed = service.list_definitions().await;
    assert_eq!(listed, vec![definition]);
}

#[tokio::test]
async fn test_invalid_definition_is_never_persisted() {
    let service = service();
    let mut definition = draft_done_definition();
    definition.actions[0].to_state = "Archived".to_string();

    let err = service.create_definition(definition).await.unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::Validation(ValidationError::InvalidStateReference { .. })
    ));

    assert!(service.get_definition("document").await.is_none());
    assert!(service.list_definitions().await.is_empty());
}

#[tokio::test]
async fn test_duplicate_definition_id_is_rejected_without_overwrite() {
    let service = service();
    service
        .create_definition(draft_done_definition())
        .await
        .unwrap();

    let mut second = draft_done_definition();
    second.states.push(State {
        id: "Extra".to_string(),
        is_initial: false,
        is_final: false,
        enabled: true,
    });

    let err = service.create_definition(second).await.unwrap_err();
    assert!(matches!(err, WorkflowError::DefinitionExists(id) if id == "document"));

    // The stored definition is the original one.
    let stored = service.get_definition("document").await.unwrap();
    assert_eq!(stored.states.len(), 2);
}

#[tokio::test]
async fn test_instance_starts_at_initial_state_with_empty_history() {
    let service = service();
    service
        .create_definition(draft_done_definition())
        .await
        .unwrap();

    let instance = service.start_instance("document").await.unwrap();
    assert_eq!(instance.definition_id, "document");
    assert_eq!(instance.current_state, "Draft");
    assert!(instance.history.is_empty());

    let loaded = service.get_instance(instance.id).await.unwrap();
    assert_eq!(loaded, instance);
}

#[tokio::test]
async fn test_start_instance_for_unknown_definition_fails() {
    let service = service();
    let err = service.start_instance("ghost").await.unwrap_err();
    assert!(matches!(err, WorkflowError::DefinitionNotFound(id) if id == "ghost"));
}

#[tokio::test]
async fn test_legal_transition_appends_exactly_one_history_entry() {
    let service = service();
    service
        .create_definition(draft_done_definition())
        .await
        .unwrap();
    let instance = service.start_instance("document").await.unwrap();

    let updated = service.execute_action(instance.id, "submit").await.unwrap();

    assert_eq!(updated.current_state, "Done");
    assert_eq!(updated.history.len(), 1);
    let entry = &updated.history[0];
    assert_eq!(entry.action_id, "submit");
    assert_eq!(entry.from_state, "Draft");
    assert_eq!(entry.to_state, "Done");

    // The persisted instance matches the returned one.
    let loaded = service.get_instance(instance.id).await.unwrap();
    assert_eq!(loaded, updated);
}

#[tokio::test]
async fn test_final_state_rejection_has_no_side_effect() {
    let service = service();
    service
        .create_definition(draft_done_definition())
        .await
        .unwrap();
    let instance = service.start_instance("document").await.unwrap();
    service.execute_action(instance.id, "submit").await.unwrap();

    let err = service
        .execute_action(instance.id, "submit")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::Execution(ExecutionError::InstanceInFinalState(state)) if state == "Done"
    ));

    // History is unchanged by the rejected execution.
    let loaded = service.get_instance(instance.id).await.unwrap();
    assert_eq!(loaded.current_state, "Done");
    assert_eq!(loaded.history.len(), 1);
}

#[tokio::test]
async fn test_disabled_action_reported_before_from_state_mismatch() {
    let service = service();
    let mut definition = draft_done_definition();
    definition.actions[0].enabled = false;
    service.create_definition(definition).await.unwrap();
    let instance = service.start_instance("document").await.unwrap();

    // from_states contains the current state, yet the disabled check wins.
    let err = service
        .execute_action(instance.id, "submit")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::Execution(ExecutionError::ActionDisabled(action)) if action == "submit"
    ));
}

#[tokio::test]
async fn test_unknown_instance_and_action_are_not_found() {
    let service = service();
    service
        .create_definition(draft_done_definition())
        .await
        .unwrap();

    let err = service
        .execute_action(uuid::Uuid::new_v4(), "submit")
        .await
        .unwrap_err();
    assert!(matches!(err, WorkflowError::InstanceNotFound(_)));
    assert!(err.is_not_found());

    let instance = service.start_instance("document").await.unwrap();
    let err = service
        .execute_action(instance.id, "ghost-action")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        WorkflowError::ActionNotFound { action, .. } if action == "ghost-action"
    ));
}

#[tokio::test]
async fn test_concurrent_executions_on_one_instance_serialize() {
    let service = Arc::new(service());
    service
        .create_definition(draft_done_definition())
        .await
        .unwrap();
    let instance = service.start_instance("document").await.unwrap();

    // Two racing submissions: exactly one may win, the loser must see the
    // post-transition state. Without per-instance serialization both could
    // read "Draft" and both append history.
    let first = {
        let service = Arc::clone(&service);
        let id = instance.id;
        tokio::spawn(async move { service.execute_action(id, "submit").await })
    };
    let second = {
        let service = Arc::clone(&service);
        let id = instance.id;
        tokio::spawn(async move { service.execute_action(id, "submit").await })
    };

    let results = [first.await.unwrap(), second.await.unwrap()];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one racing execution may succeed");

    let loaded = service.get_instance(instance.id).await.unwrap();
    assert_eq!(loaded.current_state, "Done");
    assert_eq!(loaded.history.len(), 1);
}
