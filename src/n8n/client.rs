//! reqwest implementation of the [`Gateway`] trait.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use crate::config::ApiConfig;

use super::types::*;
use super::{ExecutionListParams, Gateway, GatewayError, WorkflowListParams};

/// API key header the platform expects on every request.
const API_KEY_HEADER: &str = "X-N8N-API-KEY";

/// HTTP client for the platform API.
///
/// Cheap to clone; the inner reqwest client is reference-counted.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client from the `[api]` config section.
    ///
    /// The API key and content type are installed as default headers so
    /// every request carries them.
    pub fn new(config: &ApiConfig) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Ok(value) = HeaderValue::from_str(&config.api_key) {
            headers.insert(API_KEY_HEADER, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET `path` with the given query pairs and decode a JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, GatewayError> {
        let url = self.url(path);
        debug!(%url, params = query.len(), "GET");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|source| GatewayError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status { url, status });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| GatewayError::Decode { url, source })
    }

    /// POST a JSON body to `path`, ignoring any response body.
    async fn post_json(&self, path: &str, body: serde_json::Value) -> Result<(), GatewayError> {
        let url = self.url(path);
        debug!(%url, "POST");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|source| GatewayError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status { url, status });
        }

        Ok(())
    }
}

#[async_trait]
impl Gateway for ApiClient {
    async fn list_executions(
        &self,
        params: &ExecutionListParams,
    ) -> Result<ExecutionsResponse, GatewayError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(workflow_id) = &params.workflow_id {
            query.push(("workflowId", workflow_id.clone()));
        }
        if let Some(status) = params.status {
            query.push(("status", status.as_str().to_string()));
        }
        if let Some(limit) = params.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(project_id) = &params.project_id {
            query.push(("projectId", project_id.clone()));
        }
        if let Some(include_data) = params.include_data {
            query.push(("includeData", include_data.to_string()));
        }
        if let Some(cursor) = &params.cursor {
            query.push(("cursor", cursor.clone()));
        }

        self.get_json("/webhook/executions", &query).await
    }

    async fn execution_detail(
        &self,
        id: &str,
        include_data: bool,
    ) -> Result<ExecutionDetail, GatewayError> {
        let query = [
            ("id", id.to_string()),
            ("includeData", include_data.to_string()),
        ];
        self.get_json("/webhook/execution", &query).await
    }

    async fn list_workflows(
        &self,
        params: &WorkflowListParams,
    ) -> Result<WorkflowsResponse, GatewayError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(active) = params.active {
            query.push(("active", active.to_string()));
        }
        if let Some(tags) = &params.tags {
            query.push(("tags", tags.clone()));
        }
        if let Some(name) = &params.name {
            query.push(("name", name.clone()));
        }
        if let Some(project_id) = &params.project_id {
            query.push(("projectId", project_id.clone()));
        }
        if let Some(exclude) = params.exclude_pinned_data {
            query.push(("excludePinnedData", exclude.to_string()));
        }
        if let Some(limit) = params.limit {
            query.push(("limit", limit.to_string()));
        }

        self.get_json("/webhook/workflows", &query).await
    }

    async fn workflow_detail(&self, id: &str) -> Result<Workflow, GatewayError> {
        self.get_json(&format!("/workflows/{id}"), &[]).await
    }

    async fn set_workflow_active(&self, id: &str, active: bool) -> Result<(), GatewayError> {
        let path = if active {
            "/webhook/workflows/activate"
        } else {
            "/webhook/workflows/deactivate"
        };
        self.post_json(path, json!({ "id": id })).await
    }

    async fn list_schedulers(&self) -> Result<SchedulersResponse, GatewayError> {
        self.get_json("/webhook/schedulers", &[]).await
    }

    async fn toggle_scheduler(&self, id: &str, enabled: bool) -> Result<(), GatewayError> {
        self.post_json(
            &format!("/webhook/schedulers/{id}/toggle"),
            json!({ "enabled": enabled }),
        )
        .await
    }

    async fn send_chat_message(&self, message: &str) -> Result<String, GatewayError> {
        let reply: ChatResponse = {
            let url = self.url("/webhook/chat-agent");
            debug!(%url, "POST");

            let response = self
                .client
                .post(&url)
                .json(&json!({ "chatInput": message }))
                .send()
                .await
                .map_err(|source| GatewayError::Transport {
                    url: url.clone(),
                    source,
                })?;

            let status = response.status();
            if !status.is_success() {
                return Err(GatewayError::Status { url, status });
            }

            response
                .json()
                .await
                .map_err(|source| GatewayError::Decode { url, source })?
        };

        Ok(reply.output)
    }
}
