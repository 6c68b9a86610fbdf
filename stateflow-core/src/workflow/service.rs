//! Workflow service facade: orchestrates validator, engine, and storage

use crate::models::workflow::{WorkflowDefinition, WorkflowInstance};
use crate::storage::Storage;
use crate::workflow::engine::ExecutionEngine;
use crate::workflow::error::WorkflowError;
use crate::workflow::validator::DefinitionValidator;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// The boundary the API layer calls into.
///
/// Owns all storage sequencing; validator and engine never touch the store.
/// Storage is injected so multiple services can run with isolated state.
pub struct WorkflowService {
    storage: Arc<dyn Storage>,
    /// Per-instance locks serializing the read-decide-save unit of
    /// `execute_action`. Two concurrent executions against one instance
    /// must not both read the same current state.
    instance_locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl WorkflowService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            instance_locks: DashMap::new(),
        }
    }

    /// Validate and persist a new definition, returning it unchanged.
    ///
    /// Definitions are immutable: re-posting an existing id is rejected
    /// rather than silently overwriting.
    pub async fn create_definition(
        &self,
        definition: WorkflowDefinition,
    ) -> Result<WorkflowDefinition, WorkflowError> {
        DefinitionValidator::validate(&definition)?;

        if self.storage.get_definition(&definition.id).await.is_some() {
            return Err(WorkflowError::DefinitionExists(definition.id));
        }

        self.storage.save_definition(definition.clone()).await?;
        tracing::info!(definition = %definition.id, "workflow definition created");
        Ok(definition)
    }

    /// Pure read; absence is `None`, not an error.
    pub async fn get_definition(&self, id: &str) -> Option<WorkflowDefinition> {
        self.storage.get_definition(id).await
    }

    pub async fn list_definitions(&self) -> Vec<WorkflowDefinition> {
        self.storage.list_definitions().await
    }

    /// Create a new instance of `definition_id` positioned at its initial
    /// state, with empty history.
    pub async fn start_instance(
        &self,
        definition_id: &str,
    ) -> Result<WorkflowInstance, WorkflowError> {
        let definition = self
            .storage
            .get_definition(definition_id)
            .await
            .ok_or_else(|| WorkflowError::DefinitionNotFound(definition_id.to_string()))?;

        // Validation guarantees exactly one initial state; a store that was
        // populated behind our back may not honor that.
        let initial_state = definition
            .initial_state()
            .ok_or_else(|| WorkflowError::InvalidDefinition(definition.id.clone()))?;

        let instance = WorkflowInstance::new(definition_id, initial_state.id.clone());
        self.storage.save_instance(instance.clone()).await?;
        tracing::info!(
            instance = %instance.id,
            definition = %definition_id,
            state = %instance.current_state,
            "workflow instance started"
        );
        Ok(instance)
    }

    /// Fire `action_id` on `instance_id` and return the updated instance.
    ///
    /// The read-decide-save sequence runs under the instance's lock; on any
    /// failure nothing is saved.
    pub async fn execute_action(
        &self,
        instance_id: Uuid,
        action_id: &str,
    ) -> Result<WorkflowInstance, WorkflowError> {
        let lock = {
            let entry = self.instance_locks.entry(instance_id).or_default();
            Arc::clone(entry.value())
        };
        let _guard = lock.lock().await;

        let instance = self
            .storage
            .get_instance(instance_id)
            .await
            .ok_or(WorkflowError::InstanceNotFound(instance_id))?;

        let definition = self
            .storage
            .get_definition(&instance.definition_id)
            .await
            .ok_or_else(|| WorkflowError::DefinitionNotFound(instance.definition_id.clone()))?;

        let action = definition
            .action(action_id)
            .ok_or_else(|| WorkflowError::ActionNotFound {
                action: action_id.to_string(),
                definition: definition.id.clone(),
            })?;

        let updated = ExecutionEngine::execute(&definition, &instance, action)?;
        self.storage.save_instance(updated.clone()).await?;
        Ok(updated)
    }

    /// Pure read; absence is `None`, not an error.
    pub async fn get_instance(&self, id: Uuid) -> Option<WorkflowInstance> {
        self.storage.get_instance(id).await
    }
}
