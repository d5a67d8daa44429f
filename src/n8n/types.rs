//! Wire types for the n8n REST API.
//!
//! Everything here mirrors the JSON the platform actually sends: camelCase
//! field names, RFC 3339 timestamps, and a lot of optional fields. These are
//! read-only snapshots -- the dashboard never mutates them locally.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a single workflow execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Success,
    Error,
    Running,
    Waiting,
    Canceled,
}

impl ExecutionStatus {
    pub const ALL: [ExecutionStatus; 5] = [
        ExecutionStatus::Success,
        ExecutionStatus::Error,
        ExecutionStatus::Running,
        ExecutionStatus::Waiting,
        ExecutionStatus::Canceled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionStatus::Success => "success",
            ExecutionStatus::Error => "error",
            ExecutionStatus::Running => "running",
            ExecutionStatus::Waiting => "waiting",
            ExecutionStatus::Canceled => "canceled",
        }
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ExecutionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(ExecutionStatus::Success),
            "error" => Ok(ExecutionStatus::Error),
            "running" => Ok(ExecutionStatus::Running),
            "waiting" => Ok(ExecutionStatus::Waiting),
            "canceled" => Ok(ExecutionStatus::Canceled),
            other => Err(format!("unknown execution status '{other}'")),
        }
    }
}

/// One run of a workflow, as returned by the executions listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Execution {
    pub id: String,
    pub finished: bool,
    /// Trigger mode: manual, trigger, integrated, cli, error, retry, webhook.
    pub mode: String,
    pub status: ExecutionStatus,
    pub started_at: DateTime<Utc>,
    /// Absent while the execution is still running.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stopped_at: Option<DateTime<Utc>>,
    pub workflow_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_name: Option<String>,
    /// Embedded workflow snapshot, present when the listing was requested
    /// with include-data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_data: Option<Workflow>,
}

impl Execution {
    /// Wall-clock duration, if the execution has stopped.
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.stopped_at.map(|stop| stop - self.started_at)
    }
}

/// A workflow definition owned by the remote platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub id: String,
    pub name: String,
    pub active: bool,
    #[serde(default)]
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectRef>,
}

/// Project the workflow belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRef {
    pub id: String,
    pub name: String,
}

/// A recurring schedule entry from the platform's scheduler listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scheduler {
    pub id: String,
    pub name: String,
    pub workflow_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_name: Option<String>,
    pub cron: String,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_run_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_run_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Execution plus the nested run/error log from the detail endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionDetail {
    #[serde(flatten)]
    pub execution: Execution,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ExecutionLogData>,
}

/// Run log attached to an execution when include-data is requested.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionLogData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_data: Option<serde_json::Value>,
    pub result_data: ResultData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultData {
    /// Node name -> runs of that node, in execution order.
    #[serde(default)]
    pub run_data: HashMap<String, Vec<NodeRun>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_node_executed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ExecutionError>,
}

/// One run of one node inside an execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRun {
    /// Unix timestamp in milliseconds.
    pub start_time: i64,
    /// Duration in milliseconds.
    pub execution_time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ExecutionError>,
}

/// Error payload as n8n reports it. Almost everything is optional; the
/// fields present depend on which node type failed and how.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<ErrorNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

/// The node an error originated from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
}

/// Page of executions plus the cursor for the next page, if any.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionsResponse {
    pub data: Vec<Execution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowsResponse {
    pub data: Vec<Workflow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulersResponse {
    pub data: Vec<Scheduler>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

/// Reply from the chat-agent webhook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub output: String,
}
