//! Error types for workflow validation, execution, and the service facade

use thiserror::Error;
use uuid::Uuid;

/// A definition was rejected at creation time.
///
/// Checks are fail-fast: the first violated rule is reported.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("definition id cannot be empty")]
    EmptyId,

    #[error("definition must have at least one state")]
    NoStates,

    #[error("definition must have exactly one initial state, found {count}")]
    InitialStateCount { count: usize },

    #[error("duplicate state id '{0}'")]
    DuplicateStateId(String),

    #[error("duplicate action id '{0}'")]
    DuplicateActionId(String),

    #[error("action '{action}' references unknown state '{state}'")]
    InvalidStateReference { action: String, state: String },
}

/// An action was rejected at execution time.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("action '{0}' is disabled")]
    ActionDisabled(String),

    #[error("action '{action}' cannot fire from state '{state}'")]
    ActionNotAllowedFromState { action: String, state: String },

    #[error("instance is in final state '{0}' and accepts no further actions")]
    InstanceInFinalState(String),

    #[error("state '{0}' is disabled")]
    StateDisabled(String),

    /// The definition does not contain a state the instance or action refers
    /// to. Cannot happen through the service facade, which only persists
    /// validated definitions; kept as an explicit branch instead of a panic.
    #[error("state '{0}' does not exist in the definition")]
    UnknownState(String),
}

/// Facade-level error covering every use-case failure.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("workflow definition '{0}' not found")]
    DefinitionNotFound(String),

    #[error("workflow instance '{0}' not found")]
    InstanceNotFound(Uuid),

    #[error("action '{action}' not found in definition '{definition}'")]
    ActionNotFound { action: String, definition: String },

    #[error("workflow definition '{0}' already exists")]
    DefinitionExists(String),

    /// A stored definition violates an invariant validation should have
    /// guaranteed (e.g. no initial state).
    #[error("stored definition '{0}' is invalid: no initial state")]
    InvalidDefinition(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl WorkflowError {
    /// Whether this error signals absence rather than illegality.
    ///
    /// The API layer maps the absence family to a different status code
    /// than validation/execution failures.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            WorkflowError::DefinitionNotFound(_)
                | WorkflowError::InstanceNotFound(_)
                | WorkflowError::ActionNotFound { .. }
        )
    }
}
