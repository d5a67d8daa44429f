//! Filter evaluation over fetched snapshots.
//!
//! A filter is a partial record: absent fields (and empty strings) impose no
//! constraint, present fields are ANDed. Applying a filter preserves the
//! input's relative order and never errors; an empty result is valid.
//!
//! Predicate semantics:
//! - free-text fields match as case-insensitive substrings
//! - enum/boolean fields match exactly
//! - date bounds are inclusive on both ends

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::n8n::{Execution, ExecutionStatus, Workflow};

/// True when `needle` imposes no constraint or `haystack` contains it,
/// ignoring case.
fn text_matches(needle: Option<&str>, haystack: &str) -> bool {
    match needle {
        None => true,
        Some(n) if n.is_empty() => true,
        Some(n) => haystack.to_lowercase().contains(&n.to_lowercase()),
    }
}

/// Client-side filter over executions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionFilter {
    /// Substring of the execution id.
    pub id: Option<String>,
    pub status: Option<ExecutionStatus>,
    /// Exact workflow id.
    pub workflow_id: Option<String>,
    pub finished: Option<bool>,
    /// Substring of the trigger mode.
    pub mode: Option<String>,
    /// Inclusive lower bound on the start time.
    pub started_after: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the stop time. Executions that have not
    /// stopped yet never match this bound.
    pub stopped_before: Option<DateTime<Utc>>,
}

impl ExecutionFilter {
    /// True when no field imposes a constraint.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, execution: &Execution) -> bool {
        if !text_matches(self.id.as_deref(), &execution.id) {
            return false;
        }
        if let Some(status) = self.status {
            if execution.status != status {
                return false;
            }
        }
        if let Some(workflow_id) = &self.workflow_id {
            if !workflow_id.is_empty() && execution.workflow_id != *workflow_id {
                return false;
            }
        }
        if let Some(finished) = self.finished {
            if execution.finished != finished {
                return false;
            }
        }
        if !text_matches(self.mode.as_deref(), &execution.mode) {
            return false;
        }
        if let Some(after) = self.started_after {
            if execution.started_at < after {
                return false;
            }
        }
        if let Some(before) = self.stopped_before {
            match execution.stopped_at {
                Some(stopped) if stopped <= before => {}
                _ => return false,
            }
        }
        true
    }

    /// Stable filter: the matching subsequence in original order.
    pub fn apply(&self, executions: &[Execution]) -> Vec<Execution> {
        executions
            .iter()
            .filter(|e| self.matches(e))
            .cloned()
            .collect()
    }
}

/// Client-side filter over workflows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowFilter {
    /// Substring of the workflow id.
    pub id: Option<String>,
    /// Substring of the workflow name.
    pub name: Option<String>,
    pub active: Option<bool>,
    pub archived: Option<bool>,
    /// Inclusive lower bound on the creation time.
    pub created_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the creation time.
    pub created_to: Option<DateTime<Utc>>,
    /// Substring of the project id.
    pub project_id: Option<String>,
}

impl WorkflowFilter {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, workflow: &Workflow) -> bool {
        if !text_matches(self.id.as_deref(), &workflow.id) {
            return false;
        }
        if !text_matches(self.name.as_deref(), &workflow.name) {
            return false;
        }
        if let Some(active) = self.active {
            if workflow.active != active {
                return false;
            }
        }
        if let Some(archived) = self.archived {
            if workflow.is_archived != archived {
                return false;
            }
        }
        if let Some(from) = self.created_from {
            if workflow.created_at < from {
                return false;
            }
        }
        if let Some(to) = self.created_to {
            if workflow.created_at > to {
                return false;
            }
        }
        let project_id = workflow.project.as_ref().map(|p| p.id.as_str());
        if let Some(needle) = self.project_id.as_deref() {
            if !needle.is_empty() && !text_matches(Some(needle), project_id.unwrap_or("")) {
                return false;
            }
        }
        true
    }

    /// Stable filter: the matching subsequence in original order.
    pub fn apply(&self, workflows: &[Workflow]) -> Vec<Workflow> {
        workflows
            .iter()
            .filter(|w| self.matches(w))
            .cloned()
            .collect()
    }
}
