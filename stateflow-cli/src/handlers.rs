//! Command handlers

use anyhow::{Context, Result};
use stateflow_core::models::workflow::WorkflowDefinition;
use stateflow_core::server::run_server;
use stateflow_core::services::logging::{init_logging, LogLevel};
use stateflow_core::storage::{FileStorage, MemoryStorage, Storage};
use stateflow_core::workflow::{DefinitionValidator, WorkflowService};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Handle the serve command
pub async fn handle_serve(
    host: String,
    port: u16,
    store: Option<PathBuf>,
    log_level: LogLevel,
) -> Result<()> {
    init_logging(log_level).map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    let storage: Arc<dyn Storage> = match store {
        Some(path) => {
            println!("Persisting workflows to {}", path.display());
            Arc::new(FileStorage::new(&path).context("Failed to open workflow store")?)
        }
        None => {
            println!("Running with in-memory storage (state is lost on exit)");
            Arc::new(MemoryStorage::new())
        }
    };

    let service = Arc::new(WorkflowService::new(storage));

    println!("Workflow API listening on http://{}:{}", host, port);
    run_server(&host, port, service).await
}

/// Handle the validate command
pub fn handle_validate(file: &Path, json: bool) -> Result<()> {
    let definition = load_definition(file)?;
    let result = DefinitionValidator::validate(&definition);

    if json {
        let output = serde_json::json!({
            "valid": result.is_ok(),
            "error": result.as_ref().err().map(|e| e.to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Validating definition: {}", definition.id);
        println!("File: {}", file.display());
        println!();

        match &result {
            Ok(()) => {
                println!("✓ Definition is valid");
                println!();
                println!("Summary:");
                println!("  Id:            {}", definition.id);
                if let Some(initial) = definition.initial_state() {
                    println!("  Initial state: {}", initial.id);
                }
                let finals: Vec<&str> = definition
                    .states
                    .iter()
                    .filter(|s| s.is_final)
                    .map(|s| s.id.as_str())
                    .collect();
                if !finals.is_empty() {
                    println!("  Final states:  {}", finals.join(", "));
                }
                println!("  Total states:  {}", definition.states.len());
                println!("  Total actions: {}", definition.actions.len());
            }
            Err(error) => {
                println!("✗ Definition validation failed");
                println!();
                println!("  ✗ {}", error);
            }
        }
    }

    if let Err(error) = result {
        return Err(anyhow::anyhow!("Definition validation failed: {error}"));
    }
    Ok(())
}

/// Parse a definition file as YAML or JSON, by extension.
fn load_definition(file: &Path) -> Result<WorkflowDefinition> {
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read definition file: {}", file.display()))?;

    let extension = file
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match extension.as_str() {
        "yaml" | "yml" => {
            serde_yaml::from_str(&contents).context("Failed to parse definition YAML")
        }
        _ => serde_json::from_str(&contents).context("Failed to parse definition JSON"),
    }
}
