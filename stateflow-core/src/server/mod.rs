//! HTTP server for the workflow API

pub mod api;

use crate::workflow::WorkflowService;
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;

/// Bind and serve the workflow API until the process is stopped.
pub async fn run_server(host: &str, port: u16, service: Arc<WorkflowService>) -> Result<()> {
    let address: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .context("Invalid server address")?;

    let routes = api::create_api_routes(service);

    tracing::info!(%address, "workflow API server listening");
    warp::serve(routes).run(address).await;

    Ok(())
}
