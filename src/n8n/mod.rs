//! Remote data gateway for the n8n REST API.
//!
//! The dashboard owns no durable state; every view is a fresh fetch through
//! this module. [`Gateway`] is the seam the views and the HTTP service
//! depend on, [`ApiClient`] is the reqwest implementation. Failures surface
//! as [`GatewayError`] with no automatic retry -- callers decide whether to
//! show a message and let the operator retry manually.

pub mod client;
pub mod types;

pub use client::ApiClient;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request never completed (DNS, connect, timeout).
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The request completed but the platform rejected it.
    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// The platform answered 2xx but the body did not match the schema.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl GatewayError {
    /// True when the platform answered 404 for the requested resource.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            GatewayError::Status { status, .. } if *status == reqwest::StatusCode::NOT_FOUND
        )
    }
}

/// Server-side query parameters for the executions listing.
///
/// These are forwarded to the platform as-is; they are distinct from the
/// client-side [`crate::query::ExecutionFilter`], which refines whatever the
/// platform returned.
#[derive(Debug, Clone, Default)]
pub struct ExecutionListParams {
    pub workflow_id: Option<String>,
    pub status: Option<ExecutionStatus>,
    pub limit: Option<u32>,
    pub project_id: Option<String>,
    pub include_data: Option<bool>,
    pub cursor: Option<String>,
}

/// Server-side query parameters for the workflows listing.
#[derive(Debug, Clone, Default)]
pub struct WorkflowListParams {
    pub active: Option<bool>,
    pub tags: Option<String>,
    pub name: Option<String>,
    pub project_id: Option<String>,
    pub exclude_pinned_data: Option<bool>,
    pub limit: Option<u32>,
}

impl WorkflowListParams {
    /// Parameters for the scheduler view: workflows tagged `scheduler`.
    pub fn scheduler_tagged(limit: u32) -> Self {
        Self {
            tags: Some("scheduler".to_string()),
            limit: Some(limit),
            ..Self::default()
        }
    }
}

/// The remote platform API as the dashboard consumes it.
///
/// One request/response per call, no retries, no caching. Implemented by
/// [`ApiClient`] for the real platform and by in-memory fakes in tests.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// List executions, optionally filtered and cursor-paginated server-side.
    async fn list_executions(
        &self,
        params: &ExecutionListParams,
    ) -> Result<ExecutionsResponse, GatewayError>;

    /// Fetch one execution, optionally with its nested run/error log.
    async fn execution_detail(
        &self,
        id: &str,
        include_data: bool,
    ) -> Result<ExecutionDetail, GatewayError>;

    /// List workflows, optionally filtered server-side.
    async fn list_workflows(
        &self,
        params: &WorkflowListParams,
    ) -> Result<WorkflowsResponse, GatewayError>;

    /// Fetch one workflow by id.
    async fn workflow_detail(&self, id: &str) -> Result<Workflow, GatewayError>;

    /// Activate or deactivate a workflow. Success carries no body.
    async fn set_workflow_active(&self, id: &str, active: bool) -> Result<(), GatewayError>;

    /// List the platform's schedule entries.
    async fn list_schedulers(&self) -> Result<SchedulersResponse, GatewayError>;

    /// Enable or disable one schedule entry.
    async fn toggle_scheduler(&self, id: &str, enabled: bool) -> Result<(), GatewayError>;

    /// Send a message to the chat-agent webhook and return its reply.
    async fn send_chat_message(&self, message: &str) -> Result<String, GatewayError>;
}
