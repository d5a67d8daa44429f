//! Workflow id -> display name resolution.
//!
//! Several views need to show a workflow's name next to an execution that
//! only carries the id. The index is built once from the fetched workflow
//! list and consumed everywhere, instead of re-deriving the mapping per
//! view. Misses fall back to the raw id.

use std::collections::HashMap;

use crate::n8n::{Execution, Workflow};

#[derive(Debug, Clone, Default)]
pub struct WorkflowNameIndex {
    names: HashMap<String, String>,
}

impl WorkflowNameIndex {
    pub fn from_workflows(workflows: &[Workflow]) -> Self {
        Self {
            names: workflows
                .iter()
                .map(|w| (w.id.clone(), w.name.clone()))
                .collect(),
        }
    }

    pub fn get(&self, workflow_id: &str) -> Option<&str> {
        self.names.get(workflow_id).map(String::as_str)
    }

    /// Display name for a workflow id, falling back to the id itself.
    pub fn display_name<'a>(&'a self, workflow_id: &'a str) -> &'a str {
        self.get(workflow_id).unwrap_or(workflow_id)
    }

    /// Display name for an execution: its denormalized name, then its
    /// embedded workflow snapshot, then the index, then the raw id.
    pub fn resolve<'a>(&'a self, execution: &'a Execution) -> &'a str {
        execution
            .workflow_name
            .as_deref()
            .or_else(|| execution.workflow_data.as_ref().map(|w| w.name.as_str()))
            .unwrap_or_else(|| self.display_name(&execution.workflow_id))
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
