//! Workflow definition and instance data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn default_enabled() -> bool {
    true
}

/// A single state within a workflow definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct State {
    /// State identifier (unique within a definition)
    pub id: String,
    /// Whether this is the entry state for new instances
    #[serde(default)]
    pub is_initial: bool,
    /// Whether this state is terminal; no action may fire from it
    #[serde(default)]
    pub is_final: bool,
    /// Disabled states cannot be transitioned into
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

/// An action (transition): a many-source, single-target edge
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    /// Action identifier (unique within a definition)
    pub id: String,
    /// Disabled actions never fire
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// States this action may fire from
    pub from_states: Vec<String>,
    /// State this action moves the instance to
    pub to_state: String,
}

/// Workflow definition - reusable template for instances.
///
/// Immutable once accepted: there is no update or delete operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDefinition {
    /// Globally unique definition identifier
    pub id: String,
    /// States in declaration order
    pub states: Vec<State>,
    /// Actions in declaration order
    pub actions: Vec<Action>,
}

impl WorkflowDefinition {
    /// Look up a state by id.
    pub fn state(&self, id: &str) -> Option<&State> {
        self.states.iter().find(|s| s.id == id)
    }

    /// Look up an action by id.
    pub fn action(&self, id: &str) -> Option<&Action> {
        self.actions.iter().find(|a| a.id == id)
    }

    /// The unique initial state, if the definition has one.
    ///
    /// Validated definitions have exactly one; callers still handle `None`
    /// rather than assume the invariant holds.
    pub fn initial_state(&self) -> Option<&State> {
        self.states.iter().find(|s| s.is_initial)
    }
}

/// Running instance of a workflow definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowInstance {
    /// System-generated unique instance identifier
    pub id: Uuid,
    /// The definition this instance runs
    pub definition_id: String,
    /// Id of the state the instance currently sits in
    pub current_state: String,
    /// Append-only audit trail, in transition order
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl WorkflowInstance {
    /// Create a new instance positioned at the given initial state.
    pub fn new(definition_id: impl Into<String>, initial_state: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            definition_id: definition_id.into(),
            current_state: initial_state.into(),
            history: Vec::new(),
        }
    }
}

/// Record of one successful transition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Action that fired
    pub action_id: String,
    /// State the instance left
    pub from_state: String,
    /// State the instance entered
    pub to_state: String,
    /// When the transition happened
    pub timestamp: DateTime<Utc>,
}
