//! In-memory storage backend

use crate::models::workflow::{WorkflowDefinition, WorkflowInstance};
use crate::storage::Storage;
use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

/// Process-local storage keyed by id. The default backend for `serve`
/// without `--store`, and for tests.
pub struct MemoryStorage {
    definitions: DashMap<String, WorkflowDefinition>,
    instances: DashMap<Uuid, WorkflowInstance>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            definitions: DashMap::new(),
            instances: DashMap::new(),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn save_definition(&self, definition: WorkflowDefinition) -> Result<()> {
        self.definitions.insert(definition.id.clone(), definition);
        Ok(())
    }

    async fn get_definition(&self, id: &str) -> Option<WorkflowDefinition> {
        self.definitions.get(id).map(|d| d.clone())
    }

    async fn list_definitions(&self) -> Vec<WorkflowDefinition> {
        let mut definitions: Vec<WorkflowDefinition> =
            self.definitions.iter().map(|d| d.value().clone()).collect();
        definitions.sort_by(|a, b| a.id.cmp(&b.id));
        definitions
    }

    async fn save_instance(&self, instance: WorkflowInstance) -> Result<()> {
        self.instances.insert(instance.id, instance);
        Ok(())
    }

    async fn get_instance(&self, id: Uuid) -> Option<WorkflowInstance> {
        self.instances.get(&id).map(|i| i.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::workflow::State;

    fn definition(id: &str) -> WorkflowDefinition {
        WorkflowDefinition {
            id: id.to_string(),
            states: vec![State {
                id: "start".to_string(),
                is_initial: true,
                is_final: false,
                enabled: true,
            }],
            actions: vec![],
        }
    }

    #[tokio::test]
    async fn test_definition_round_trip() {
        let storage = MemoryStorage::new();
        storage.save_definition(definition("a")).await.unwrap();

        let loaded = storage.get_definition("a").await.unwrap();
        assert_eq!(loaded.id, "a");
        assert!(storage.get_definition("missing").await.is_none());
    }

    #[tokio::test]
    async fn test_list_definitions_is_sorted_by_id() {
        let storage = MemoryStorage::new();
        storage.save_definition(definition("b")).await.unwrap();
        storage.save_definition(definition("a")).await.unwrap();

        let ids: Vec<String> = storage
            .list_definitions()
            .await
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn test_instance_save_is_upsert() {
        let storage = MemoryStorage::new();
        let mut instance = WorkflowInstance::new("a", "start");
        storage.save_instance(instance.clone()).await.unwrap();

        instance.current_state = "done".to_string();
        storage.save_instance(instance.clone()).await.unwrap();

        let loaded = storage.get_instance(instance.id).await.unwrap();
        assert_eq!(loaded.current_state, "done");
    }
}
