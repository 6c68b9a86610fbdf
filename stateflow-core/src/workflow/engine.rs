//! State machine execution engine

use crate::models::workflow::{Action, HistoryEntry, WorkflowDefinition, WorkflowInstance};
use crate::workflow::error::ExecutionError;
use chrono::Utc;

/// Decides whether an action may fire on an instance and produces the
/// resulting instance value.
///
/// The engine performs no storage I/O: definition, instance, and action are
/// resolved by the caller. All checks complete before anything is built, so
/// a rejected execution leaves no observable mutation anywhere.
pub struct ExecutionEngine;

impl ExecutionEngine {
    /// Apply `action` to `instance` under `definition`.
    ///
    /// Check order: disabled action, from-state membership, final state,
    /// then target-state enablement. The first violation is returned.
    pub fn execute(
        definition: &WorkflowDefinition,
        instance: &WorkflowInstance,
        action: &Action,
    ) -> Result<WorkflowInstance, ExecutionError> {
        if !action.enabled {
            return Err(ExecutionError::ActionDisabled(action.id.clone()));
        }

        if !action.from_states.contains(&instance.current_state) {
            return Err(ExecutionError::ActionNotAllowedFromState {
                action: action.id.clone(),
                state: instance.current_state.clone(),
            });
        }

        let current = definition
            .state(&instance.current_state)
            .ok_or_else(|| ExecutionError::UnknownState(instance.current_state.clone()))?;
        if current.is_final {
            return Err(ExecutionError::InstanceInFinalState(current.id.clone()));
        }

        let target = definition
            .state(&action.to_state)
            .ok_or_else(|| ExecutionError::UnknownState(action.to_state.clone()))?;
        if !target.enabled {
            return Err(ExecutionError::StateDisabled(target.id.clone()));
        }

        let entry = HistoryEntry {
            action_id: action.id.clone(),
            from_state: instance.current_state.clone(),
            to_state: action.to_state.clone(),
            timestamp: Utc::now(),
        };

        let mut updated = instance.clone();
        updated.current_state = action.to_state.clone();
        updated.history.push(entry);

        tracing::debug!(
            instance = %updated.id,
            action = %action.id,
            from = %instance.current_state,
            to = %updated.current_state,
            "transition applied"
        );

        Ok(updated)
    }
}
