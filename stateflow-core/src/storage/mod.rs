//! Persistence contract and backends

pub mod file;
pub mod memory;

use crate::models::workflow::{WorkflowDefinition, WorkflowInstance};
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Narrow key-value persistence contract the service facade depends on.
///
/// Saves are upserts keyed by id. Gets return `None` for absent keys;
/// absence is signaled, never an error. Implementations must provide
/// read-your-writes consistency per key.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn save_definition(&self, definition: WorkflowDefinition) -> Result<()>;

    async fn get_definition(&self, id: &str) -> Option<WorkflowDefinition>;

    async fn list_definitions(&self) -> Vec<WorkflowDefinition>;

    async fn save_instance(&self, instance: WorkflowInstance) -> Result<()>;

    async fn get_instance(&self, id: Uuid) -> Option<WorkflowInstance>;
}
