//! Flowboard -- monitoring dashboard for n8n-compatible workflow platforms.
//!
//! This crate provides the core library for the dashboard: the remote API
//! gateway, client-side filtering/sorting/pagination, chart aggregation,
//! per-view UI state, and the JSON HTTP service.

pub mod api;
pub mod config;
pub mod n8n;
pub mod query;
pub mod stats;
pub mod view;

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::n8n::ApiClient;

/// Start the dashboard HTTP service against the configured platform.
pub async fn serve(config: Config) -> Result<()> {
    let client =
        ApiClient::new(&config.api).context("failed to build the platform API client")?;

    let bind = config.server.bind.clone();
    let addr: std::net::SocketAddr = bind
        .parse()
        .with_context(|| format!("invalid bind address '{bind}'"))?;

    let state = api::AppState::new(Arc::new(client), config);
    let app = api::router(state);

    tracing::info!(%addr, "Flowboard listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
