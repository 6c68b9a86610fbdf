//! JSON file storage backend

use crate::models::workflow::{WorkflowDefinition, WorkflowInstance};
use crate::storage::Storage;
use anyhow::{Context, Result};
use async_trait::async_trait;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use uuid::Uuid;

/// Root JSON document containing all persisted workflow data
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct JsonStore {
    /// All accepted workflow definitions
    pub definitions: Vec<WorkflowDefinition>,
    /// All workflow instances
    pub instances: Vec<WorkflowInstance>,
}

/// Disk-backed storage: a single JSON document, write-through on every
/// save, advisory file locks around reads and writes.
pub struct FileStorage {
    store_path: PathBuf,
    store: Mutex<JsonStore>,
}

impl FileStorage {
    /// Open or create the store at `store_path`.
    pub fn new<P: AsRef<Path>>(store_path: P) -> Result<Self> {
        let store_path = store_path.as_ref().to_path_buf();

        if let Some(parent) = store_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create workflow store directory")?;
        }

        let store = if store_path.exists() {
            Self::load_store(&store_path)?
        } else {
            JsonStore::default()
        };

        Ok(Self {
            store_path,
            store: Mutex::new(store),
        })
    }

    fn load_store(path: &Path) -> Result<JsonStore> {
        let file = File::open(path).context("Failed to open workflow store file")?;

        file.lock_shared()
            .context("Failed to acquire read lock on workflow store")?;

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(file);
        reader
            .read_to_string(&mut contents)
            .context("Failed to read workflow store")?;

        // Lock released when the reader is dropped
        drop(reader);

        if contents.is_empty() {
            return Ok(JsonStore::default());
        }

        serde_json::from_str(&contents).context("Failed to parse workflow store JSON")
    }

    fn save_store(&self) -> Result<()> {
        let store = self.store.lock().unwrap();

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.store_path)
            .context("Failed to open workflow store file for writing")?;

        file.lock_exclusive()
            .context("Failed to acquire write lock on workflow store")?;

        let json =
            serde_json::to_string_pretty(&*store).context("Failed to serialize workflow store")?;

        let mut writer = std::io::BufWriter::new(file);
        writer
            .write_all(json.as_bytes())
            .context("Failed to write workflow store")?;
        writer
            .flush()
            .context("Failed to flush workflow store to disk")?;

        Ok(())
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn save_definition(&self, definition: WorkflowDefinition) -> Result<()> {
        {
            let mut store = self.store.lock().unwrap();
            match store.definitions.iter_mut().find(|d| d.id == definition.id) {
                Some(existing) => *existing = definition,
                None => store.definitions.push(definition),
            }
        }
        self.save_store()
    }

    async fn get_definition(&self, id: &str) -> Option<WorkflowDefinition> {
        let store = self.store.lock().unwrap();
        store.definitions.iter().find(|d| d.id == id).cloned()
    }

    async fn list_definitions(&self) -> Vec<WorkflowDefinition> {
        let store = self.store.lock().unwrap();
        let mut definitions = store.definitions.clone();
        definitions.sort_by(|a, b| a.id.cmp(&b.id));
        definitions
    }

    async fn save_instance(&self, instance: WorkflowInstance) -> Result<()> {
        {
            let mut store = self.store.lock().unwrap();
            match store.instances.iter_mut().find(|i| i.id == instance.id) {
                Some(existing) => *existing = instance,
                None => store.instances.push(instance),
            }
        }
        self.save_store()
    }

    async fn get_instance(&self, id: Uuid) -> Option<WorkflowInstance> {
        let store = self.store.lock().unwrap();
        store.instances.iter().find(|i| i.id == id).cloned()
    }
}
