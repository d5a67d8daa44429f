//! Integration tests for the dashboard data pipeline: filter -> sort ->
//! paginate, chart bucketing, and the workflow toggle flow against an
//! in-memory gateway.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use flowboard::n8n::{
    Execution, ExecutionDetail, ExecutionListParams, ExecutionStatus, ExecutionsResponse, Gateway,
    GatewayError, SchedulersResponse, Workflow, WorkflowListParams, WorkflowsResponse,
};
use flowboard::query::{
    paginate, ExecutionFilter, ExecutionSortField, SortOrder, WorkflowNameIndex,
};
use flowboard::stats::{bucket_executions, ChartWindow};
use flowboard::view::{apply_active_flip, ExecutionView};

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap()
}

fn exec(id: &str, workflow_id: &str, status: ExecutionStatus, offset_minutes: i64) -> Execution {
    let started_at = base_time() + Duration::minutes(offset_minutes);
    Execution {
        id: id.to_string(),
        finished: !matches!(status, ExecutionStatus::Running | ExecutionStatus::Waiting),
        mode: "webhook".to_string(),
        status,
        started_at,
        stopped_at: (status != ExecutionStatus::Running)
            .then(|| started_at + Duration::seconds(42)),
        workflow_id: workflow_id.to_string(),
        workflow_name: None,
        workflow_data: None,
    }
}

fn fixture(count: usize) -> Vec<Execution> {
    let statuses = [
        ExecutionStatus::Success,
        ExecutionStatus::Error,
        ExecutionStatus::Success,
        ExecutionStatus::Running,
        ExecutionStatus::Canceled,
    ];
    (0..count)
        .map(|i| {
            exec(
                &format!("{}", 5000 - i),
                &format!("WF{}", i % 3 + 1),
                statuses[i % statuses.len()],
                i as i64,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Filter properties
// ---------------------------------------------------------------------------

#[test]
fn test_filter_scenario_from_reference_data() {
    let executions = vec![
        exec("1", "WF1", ExecutionStatus::Success, 0),
        exec("2", "WF1", ExecutionStatus::Error, 1),
        exec("3", "WF2", ExecutionStatus::Success, 2),
    ];
    let filter = ExecutionFilter {
        workflow_id: Some("WF1".to_string()),
        ..ExecutionFilter::default()
    };

    let result = filter.apply(&executions);
    assert_eq!(result.len(), 2);
    assert_eq!(result[0].id, "1");
    assert_eq!(result[1].id, "2");
}

#[test]
fn test_filter_is_idempotent_over_large_fixture() {
    let executions = fixture(50);
    let filter = ExecutionFilter {
        status: Some(ExecutionStatus::Success),
        workflow_id: Some("WF1".to_string()),
        ..ExecutionFilter::default()
    };

    let once = filter.apply(&executions);
    let twice = filter.apply(&once);
    assert_eq!(
        once.iter().map(|e| &e.id).collect::<Vec<_>>(),
        twice.iter().map(|e| &e.id).collect::<Vec<_>>()
    );
}

// ---------------------------------------------------------------------------
// Sort properties
// ---------------------------------------------------------------------------

#[test]
fn test_sort_is_idempotent_across_all_fields() {
    let index = WorkflowNameIndex::default();
    for field in [
        ExecutionSortField::Id,
        ExecutionSortField::WorkflowName,
        ExecutionSortField::Status,
        ExecutionSortField::StartedAt,
        ExecutionSortField::StoppedAt,
    ] {
        for order in [SortOrder::Asc, SortOrder::Desc] {
            let mut executions = fixture(30);
            flowboard::query::sort_executions(&mut executions, field, order, &index);
            let once: Vec<String> = executions.iter().map(|e| e.id.clone()).collect();
            flowboard::query::sort_executions(&mut executions, field, order, &index);
            let twice: Vec<String> = executions.iter().map(|e| e.id.clone()).collect();
            assert_eq!(once, twice, "re-sort must not reorder ({field:?} {order:?})");
        }
    }
}

// ---------------------------------------------------------------------------
// Pagination properties
// ---------------------------------------------------------------------------

#[test]
fn test_pagination_scenario_23_records() {
    let executions = fixture(23);
    let page3 = paginate(&executions, 10, 3);
    assert_eq!(page3.total_pages, 3);
    assert_eq!(page3.items.len(), 3);

    let page5 = paginate(&executions, 10, 5);
    assert_eq!(page5.page, 3, "beyond-last pages clamp to the last page");
    assert_eq!(
        page5.items.iter().map(|e| &e.id).collect::<Vec<_>>(),
        page3.items.iter().map(|e| &e.id).collect::<Vec<_>>()
    );
}

#[test]
fn test_pages_reconstruct_filtered_sorted_sequence() {
    let executions = fixture(47);
    let filter = ExecutionFilter {
        workflow_id: Some("WF2".to_string()),
        ..ExecutionFilter::default()
    };
    let index = WorkflowNameIndex::default();

    let mut filtered = filter.apply(&executions);
    flowboard::query::sort_executions(
        &mut filtered,
        ExecutionSortField::StartedAt,
        SortOrder::Desc,
        &index,
    );

    let total_pages = paginate(&filtered, 5, 1).total_pages;
    let mut rebuilt = Vec::new();
    for page in 1..=total_pages {
        rebuilt.extend(paginate(&filtered, 5, page).items);
    }

    assert_eq!(
        rebuilt.iter().map(|e| &e.id).collect::<Vec<_>>(),
        filtered.iter().map(|e| &e.id).collect::<Vec<_>>(),
        "concatenated pages must cover every element exactly once"
    );
}

#[test]
fn test_view_pipeline_end_to_end() {
    let executions = fixture(23);
    let mut view = ExecutionView::default();
    view.set_page_size(10);
    view.page = 2;

    let page = view.render(&executions, &WorkflowNameIndex::default());
    assert_eq!(page.total, 23);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.items.len(), 10);
    // Default sort is newest-first.
    assert!(page.items[0].started_at >= page.items[9].started_at);
}

// ---------------------------------------------------------------------------
// Chart properties
// ---------------------------------------------------------------------------

#[test]
fn test_weekly_bucket_count_and_totals() {
    // Wednesday; week runs Sun 2025-06-01 .. Sat 2025-06-07.
    let now = Utc.with_ymd_and_hms(2025, 6, 4, 12, 0, 0).unwrap();
    let executions = fixture(20);

    let buckets = bucket_executions(&executions, ChartWindow::Weekly, now);
    assert_eq!(buckets.len(), 7);

    // Every fixture execution starts on Sunday 2025-06-01, inside the week.
    let bucket_total: usize = buckets.iter().map(|b| b.total).sum();
    assert_eq!(bucket_total, executions.len());
    assert_eq!(buckets[0].label, "Sun");
    assert_eq!(buckets[0].total, executions.len());
}

#[test]
fn test_chart_includes_empty_buckets() {
    let now = Utc.with_ymd_and_hms(2025, 6, 4, 12, 0, 0).unwrap();
    // All executions on one day.
    let executions = vec![
        exec("1", "WF1", ExecutionStatus::Success, 0),
        exec("2", "WF1", ExecutionStatus::Error, 1),
    ];

    let buckets = bucket_executions(&executions, ChartWindow::Weekly, now);
    assert_eq!(buckets.len(), 7);
    let empty = buckets.iter().filter(|b| b.total == 0).count();
    assert_eq!(empty, 6, "days without executions keep zero-count buckets");
}

// ---------------------------------------------------------------------------
// Toggle flow
// ---------------------------------------------------------------------------

/// Gateway that records activate/deactivate calls.
#[derive(Default)]
struct RecordingGateway {
    activate_calls: AtomicUsize,
    last_call: Mutex<Option<(String, bool)>>,
}

#[async_trait]
impl Gateway for RecordingGateway {
    async fn list_executions(
        &self,
        _params: &ExecutionListParams,
    ) -> Result<ExecutionsResponse, GatewayError> {
        Ok(ExecutionsResponse {
            data: Vec::new(),
            next_cursor: None,
        })
    }

    async fn execution_detail(
        &self,
        id: &str,
        _include_data: bool,
    ) -> Result<ExecutionDetail, GatewayError> {
        Err(GatewayError::Status {
            url: format!("/webhook/execution?id={id}"),
            status: reqwest::StatusCode::NOT_FOUND,
        })
    }

    async fn list_workflows(
        &self,
        _params: &WorkflowListParams,
    ) -> Result<WorkflowsResponse, GatewayError> {
        Ok(WorkflowsResponse { data: Vec::new() })
    }

    async fn workflow_detail(&self, id: &str) -> Result<Workflow, GatewayError> {
        Err(GatewayError::Status {
            url: format!("/workflows/{id}"),
            status: reqwest::StatusCode::NOT_FOUND,
        })
    }

    async fn set_workflow_active(&self, id: &str, active: bool) -> Result<(), GatewayError> {
        self.activate_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_call.lock().unwrap() = Some((id.to_string(), active));
        Ok(())
    }

    async fn list_schedulers(&self) -> Result<SchedulersResponse, GatewayError> {
        Ok(SchedulersResponse {
            data: Vec::new(),
            total: None,
        })
    }

    async fn toggle_scheduler(&self, _id: &str, _enabled: bool) -> Result<(), GatewayError> {
        Ok(())
    }

    async fn send_chat_message(&self, _message: &str) -> Result<String, GatewayError> {
        Ok(String::new())
    }
}

#[tokio::test]
async fn test_toggle_calls_activate_once_and_flips_badge() {
    let gateway = RecordingGateway::default();
    let mut workflows = vec![Workflow {
        id: "WF1".to_string(),
        name: "Data Sync Workflow".to_string(),
        active: false,
        is_archived: false,
        created_at: Utc.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap(),
        project: None,
    }];

    // The toggle flow: one gateway call, then an optimistic local flip.
    gateway.set_workflow_active("WF1", true).await.unwrap();
    assert!(apply_active_flip(&mut workflows, "WF1", true));

    assert_eq!(gateway.activate_calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        *gateway.last_call.lock().unwrap(),
        Some(("WF1".to_string(), true))
    );
    assert!(workflows[0].active, "badge flips without a refetch");
}
