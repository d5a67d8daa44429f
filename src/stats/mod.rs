//! Derived statistics over execution snapshots.
//!
//! Everything here is recomputed from the latest fetched list on every
//! request; nothing is cached or persisted.

pub mod buckets;

pub use buckets::{bucket_executions, ChartBucket, ChartWindow};

use serde::Serialize;

use crate::n8n::{Execution, ExecutionStatus};

/// Count of executions per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusBreakdown {
    pub success: usize,
    pub error: usize,
    pub running: usize,
    pub waiting: usize,
    pub canceled: usize,
}

impl StatusBreakdown {
    pub fn record(&mut self, status: ExecutionStatus) {
        match status {
            ExecutionStatus::Success => self.success += 1,
            ExecutionStatus::Error => self.error += 1,
            ExecutionStatus::Running => self.running += 1,
            ExecutionStatus::Waiting => self.waiting += 1,
            ExecutionStatus::Canceled => self.canceled += 1,
        }
    }

    pub fn get(&self, status: ExecutionStatus) -> usize {
        match status {
            ExecutionStatus::Success => self.success,
            ExecutionStatus::Error => self.error,
            ExecutionStatus::Running => self.running,
            ExecutionStatus::Waiting => self.waiting,
            ExecutionStatus::Canceled => self.canceled,
        }
    }

    pub fn total(&self) -> usize {
        ExecutionStatus::ALL.iter().map(|s| self.get(*s)).sum()
    }
}

/// Counts for the overview cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OverviewStats {
    pub total: usize,
    pub success: usize,
    pub error: usize,
    pub running: usize,
}

/// Count per status over the whole set (the distribution pie).
pub fn status_distribution(executions: &[Execution]) -> StatusBreakdown {
    let mut breakdown = StatusBreakdown::default();
    for execution in executions {
        breakdown.record(execution.status);
    }
    breakdown
}

/// Headline counts for the overview cards.
pub fn overview(executions: &[Execution]) -> OverviewStats {
    let breakdown = status_distribution(executions);
    OverviewStats {
        total: executions.len(),
        success: breakdown.success,
        error: breakdown.error,
        running: breakdown.running,
    }
}
