//! Sort comparators for the table views.
//!
//! All sorts are stable (`slice::sort_by`), so re-sorting sorted output
//! never reorders ties. Direction flips the comparison of two present
//! values; the missing-sorts-last rule for optional timestamps holds under
//! both directions.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::n8n::{Execution, Workflow};

use super::lookup::WorkflowNameIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn flipped(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionSortField {
    Id,
    WorkflowName,
    Status,
    StartedAt,
    StoppedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowSortField {
    Name,
    Active,
    Archived,
    CreatedAt,
}

/// Numeric comparison for numeric-looking ids; plain string comparison when
/// either side fails to parse.
fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}

/// Case-insensitive name comparison with a byte-order tiebreak, so equal
/// names up to case still order deterministically.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

pub fn sort_executions(
    executions: &mut [Execution],
    field: ExecutionSortField,
    order: SortOrder,
    names: &WorkflowNameIndex,
) {
    executions.sort_by(|a, b| match field {
        ExecutionSortField::Id => order.apply(compare_ids(&a.id, &b.id)),
        ExecutionSortField::WorkflowName => {
            order.apply(compare_names(names.resolve(a), names.resolve(b)))
        }
        ExecutionSortField::Status => order.apply(a.status.as_str().cmp(b.status.as_str())),
        ExecutionSortField::StartedAt => order.apply(a.started_at.cmp(&b.started_at)),
        ExecutionSortField::StoppedAt => match (a.stopped_at, b.stopped_at) {
            (Some(x), Some(y)) => order.apply(x.cmp(&y)),
            // Still-running executions sort last no matter the direction.
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    });
}

pub fn sort_workflows(workflows: &mut [Workflow], field: WorkflowSortField, order: SortOrder) {
    workflows.sort_by(|a, b| {
        let ordering = match field {
            WorkflowSortField::Name => compare_names(&a.name, &b.name),
            WorkflowSortField::Active => a.active.cmp(&b.active),
            WorkflowSortField::Archived => a.is_archived.cmp(&b.is_archived),
            WorkflowSortField::CreatedAt => a.created_at.cmp(&b.created_at),
        };
        order.apply(ordering)
    });
}
