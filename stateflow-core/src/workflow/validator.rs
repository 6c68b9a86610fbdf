//! Workflow definition validation logic

use crate::models::workflow::{Action, State, WorkflowDefinition};
use crate::workflow::error::ValidationError;
use std::collections::HashSet;

/// Structural validator for candidate workflow definitions.
///
/// Applied once, before a definition is persisted. Pure function of the
/// input; checks run in a fixed order and the first violation is returned.
pub struct DefinitionValidator;

impl DefinitionValidator {
    /// Validate a candidate definition.
    pub fn validate(definition: &WorkflowDefinition) -> Result<(), ValidationError> {
        Self::check_id(&definition.id)?;
        Self::check_has_states(&definition.states)?;
        Self::check_exactly_one_initial_state(&definition.states)?;
        Self::check_no_duplicate_state_ids(&definition.states)?;
        Self::check_no_duplicate_action_ids(&definition.actions)?;
        Self::check_state_references(definition)?;
        Ok(())
    }

    fn check_id(id: &str) -> Result<(), ValidationError> {
        if id.trim().is_empty() {
            return Err(ValidationError::EmptyId);
        }
        Ok(())
    }

    fn check_has_states(states: &[State]) -> Result<(), ValidationError> {
        if states.is_empty() {
            return Err(ValidationError::NoStates);
        }
        Ok(())
    }

    fn check_exactly_one_initial_state(states: &[State]) -> Result<(), ValidationError> {
        let count = states.iter().filter(|s| s.is_initial).count();
        if count != 1 {
            return Err(ValidationError::InitialStateCount { count });
        }
        Ok(())
    }

    fn check_no_duplicate_state_ids(states: &[State]) -> Result<(), ValidationError> {
        let mut seen = HashSet::new();
        for state in states {
            if !seen.insert(state.id.as_str()) {
                return Err(ValidationError::DuplicateStateId(state.id.clone()));
            }
        }
        Ok(())
    }

    fn check_no_duplicate_action_ids(actions: &[Action]) -> Result<(), ValidationError> {
        let mut seen = HashSet::new();
        for action in actions {
            if !seen.insert(action.id.as_str()) {
                return Err(ValidationError::DuplicateActionId(action.id.clone()));
            }
        }
        Ok(())
    }

    fn check_state_references(definition: &WorkflowDefinition) -> Result<(), ValidationError> {
        let state_ids: HashSet<&str> = definition.states.iter().map(|s| s.id.as_str()).collect();

        for action in &definition.actions {
            if !state_ids.contains(action.to_state.as_str()) {
                return Err(ValidationError::InvalidStateReference {
                    action: action.id.clone(),
                    state: action.to_state.clone(),
                });
            }
            for from_state in &action.from_states {
                if !state_ids.contains(from_state.as_str()) {
                    return Err(ValidationError::InvalidStateReference {
                        action: action.id.clone(),
                        state: from_state.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
