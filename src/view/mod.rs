//! Per-view UI state: filter + sort + page, held explicitly and passed down
//! rather than living in ambient globals.
//!
//! A view owns no data. [`ExecutionView::render`] and
//! [`WorkflowView::render`] are pure: they take the latest fetched snapshot
//! and produce the page to display. State transitions mirror the dashboard
//! controls: clicking the active sort column flips direction, picking a new
//! column sorts ascending, changing the page size jumps back to page 1.

use serde::{Deserialize, Serialize};

use crate::n8n::{Execution, Workflow};
use crate::query::{
    paginate, sort_executions, sort_workflows, ExecutionFilter, ExecutionSortField, Page,
    SortOrder, WorkflowFilter, WorkflowNameIndex, WorkflowSortField,
};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// State of an executions table view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionView {
    pub filter: ExecutionFilter,
    pub sort_field: ExecutionSortField,
    pub sort_order: SortOrder,
    pub page: usize,
    pub page_size: usize,
}

impl Default for ExecutionView {
    fn default() -> Self {
        Self {
            filter: ExecutionFilter::default(),
            sort_field: ExecutionSortField::StartedAt,
            sort_order: SortOrder::Desc,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ExecutionView {
    /// Column-header click: same field flips direction, new field starts
    /// ascending. Either way the view jumps back to the first page.
    pub fn toggle_sort(&mut self, field: ExecutionSortField) {
        if self.sort_field == field {
            self.sort_order = self.sort_order.flipped();
        } else {
            self.sort_field = field;
            self.sort_order = SortOrder::Asc;
        }
        self.page = 1;
    }

    /// Changing the page size resets to page 1 so the view cannot land
    /// beyond the new last page.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    pub fn set_filter(&mut self, filter: ExecutionFilter) {
        self.filter = filter;
        self.page = 1;
    }

    /// Run the whole pipeline over a snapshot: filter, sort, paginate.
    pub fn render(&self, executions: &[Execution], names: &WorkflowNameIndex) -> Page<Execution> {
        let mut filtered = self.filter.apply(executions);
        sort_executions(&mut filtered, self.sort_field, self.sort_order, names);
        paginate(&filtered, self.page_size, self.page)
    }
}

/// State of a workflows table view (also the scheduler view).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowView {
    pub filter: WorkflowFilter,
    pub sort_field: WorkflowSortField,
    pub sort_order: SortOrder,
    pub page: usize,
    pub page_size: usize,
}

impl Default for WorkflowView {
    fn default() -> Self {
        Self {
            filter: WorkflowFilter::default(),
            sort_field: WorkflowSortField::CreatedAt,
            sort_order: SortOrder::Desc,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl WorkflowView {
    pub fn toggle_sort(&mut self, field: WorkflowSortField) {
        if self.sort_field == field {
            self.sort_order = self.sort_order.flipped();
        } else {
            self.sort_field = field;
            self.sort_order = SortOrder::Asc;
        }
        self.page = 1;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    pub fn set_filter(&mut self, filter: WorkflowFilter) {
        self.filter = filter;
        self.page = 1;
    }

    pub fn render(&self, workflows: &[Workflow]) -> Page<Workflow> {
        let mut filtered = self.filter.apply(workflows);
        sort_workflows(&mut filtered, self.sort_field, self.sort_order);
        paginate(&filtered, self.page_size, self.page)
    }
}

/// Optimistically flip a workflow's active flag in the displayed snapshot
/// after a successful activate/deactivate call, so the badge updates
/// without a refetch. Returns false when the id is not in the snapshot.
pub fn apply_active_flip(workflows: &mut [Workflow], id: &str, active: bool) -> bool {
    match workflows.iter_mut().find(|w| w.id == id) {
        Some(workflow) => {
            workflow.active = active;
            true
        }
        None => false,
    }
}

/// Guard against a stale fetch overwriting a newer view.
///
/// Each fetch takes a token from [`FetchSeq::begin`]; on completion the
/// result is applied only if [`FetchSeq::accept`] approves the token, i.e.
/// no newer fetch has been issued since. The upstream dashboard had no such
/// guard and displayed whichever response finished last; this makes the
/// last *issued* request win instead. Note a newer fetch that fails still
/// leaves the previous snapshot on screen -- failures never clobber state.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchSeq {
    issued: u64,
}

impl FetchSeq {
    /// Register a new fetch and get its token.
    pub fn begin(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// True when `token` belongs to the most recently issued fetch.
    pub fn accept(&self, token: u64) -> bool {
        token == self.issued
    }
}
