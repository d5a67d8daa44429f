//! API route definitions.
//!
//! Every handler follows the same shape: fetch a fresh snapshot through the
//! gateway, run the client-side pipeline (filter, sort, paginate or
//! aggregate), and wrap the result in a `{data, meta}` envelope. Handlers
//! never retry; a gateway failure becomes an [`ApiError`] response.

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use futures::future::try_join;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::n8n::{ExecutionListParams, ExecutionStatus, WorkflowListParams};
use crate::query::{
    ExecutionFilter, ExecutionSortField, SortOrder, WorkflowFilter, WorkflowNameIndex,
    WorkflowSortField,
};
use crate::stats::{self, ChartWindow};
use crate::view::{ExecutionView, WorkflowView};

use super::error::ApiError;
use super::state::AppState;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/executions", get(list_executions))
        .route("/executions/{id}", get(execution_detail))
        .route("/workflows", get(list_workflows))
        .route("/workflows/{id}", get(workflow_detail))
        .route("/workflows/{id}/activate", post(activate_workflow))
        .route("/workflows/{id}/deactivate", post(deactivate_workflow))
        .route("/schedulers", get(list_schedulers))
        .route("/schedulers/{id}/toggle", post(toggle_scheduler))
        .route("/stats/overview", get(stats_overview))
        .route("/stats/chart", get(stats_chart))
        .route("/chat", post(chat))
}

async fn health() -> Json<Value> {
    Json(json!({
        "data": {
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION")
        },
        "meta": {
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "version": env!("CARGO_PKG_VERSION")
        }
    }))
}

// ---------------------------------------------------------------------------
// Executions
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ExecutionsQuery {
    // Forwarded to the platform.
    project_id: Option<String>,
    limit: Option<u32>,
    cursor: Option<String>,
    include_data: Option<bool>,
    // Applied client-side on the fetched snapshot.
    id: Option<String>,
    status: Option<ExecutionStatus>,
    workflow_id: Option<String>,
    finished: Option<bool>,
    mode: Option<String>,
    started_after: Option<DateTime<Utc>>,
    stopped_before: Option<DateTime<Utc>>,
    // Presentation.
    sort_field: Option<ExecutionSortField>,
    sort_order: Option<SortOrder>,
    page: Option<usize>,
    page_size: Option<usize>,
}

async fn list_executions(
    State(state): State<AppState>,
    Query(query): Query<ExecutionsQuery>,
) -> Result<Json<Value>, ApiError> {
    let params = ExecutionListParams {
        workflow_id: query.workflow_id.clone(),
        status: query.status,
        limit: query.limit.or(Some(state.config.api.default_limit)),
        project_id: query
            .project_id
            .or_else(|| state.config.api.project_id.clone()),
        include_data: query.include_data,
        cursor: query.cursor,
    };
    let response = state.gateway.list_executions(&params).await?;

    let mut view = ExecutionView {
        filter: ExecutionFilter {
            id: query.id,
            status: query.status,
            workflow_id: query.workflow_id,
            finished: query.finished,
            mode: query.mode,
            started_after: query.started_after,
            stopped_before: query.stopped_before,
        },
        ..ExecutionView::default()
    };
    if let Some(field) = query.sort_field {
        view.sort_field = field;
    }
    if let Some(order) = query.sort_order {
        view.sort_order = order;
    }
    view.page = query.page.unwrap_or(1);
    view.page_size = query.page_size.unwrap_or(state.config.ui.page_size);

    // Sorting by workflow name needs the id -> name index.
    let names = if view.sort_field == ExecutionSortField::WorkflowName {
        let workflows = state
            .gateway
            .list_workflows(&WorkflowListParams {
                limit: Some(state.config.api.default_limit),
                ..WorkflowListParams::default()
            })
            .await?;
        WorkflowNameIndex::from_workflows(&workflows.data)
    } else {
        WorkflowNameIndex::default()
    };

    let page = view.render(&response.data, &names);
    Ok(Json(json!({
        "data": page.items,
        "meta": {
            "page": page.page,
            "page_size": page.page_size,
            "total_pages": page.total_pages,
            "total": page.total,
            "next_cursor": response.next_cursor,
        }
    })))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DetailQuery {
    include_data: Option<bool>,
}

async fn execution_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DetailQuery>,
) -> Result<Json<Value>, ApiError> {
    let detail = state
        .gateway
        .execution_detail(&id, query.include_data.unwrap_or(false))
        .await?;
    Ok(Json(json!({ "data": detail })))
}

// ---------------------------------------------------------------------------
// Workflows
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WorkflowsQuery {
    // Forwarded to the platform.
    tags: Option<String>,
    project_id: Option<String>,
    exclude_pinned_data: Option<bool>,
    limit: Option<u32>,
    // Applied client-side on the fetched snapshot.
    id: Option<String>,
    name: Option<String>,
    active: Option<bool>,
    archived: Option<bool>,
    created_from: Option<DateTime<Utc>>,
    created_to: Option<DateTime<Utc>>,
    // Presentation.
    sort_field: Option<WorkflowSortField>,
    sort_order: Option<SortOrder>,
    page: Option<usize>,
    page_size: Option<usize>,
}

async fn list_workflows(
    State(state): State<AppState>,
    Query(query): Query<WorkflowsQuery>,
) -> Result<Json<Value>, ApiError> {
    let params = WorkflowListParams {
        active: query.active,
        tags: query.tags,
        name: query.name.clone(),
        project_id: query
            .project_id
            .or_else(|| state.config.api.project_id.clone()),
        exclude_pinned_data: query.exclude_pinned_data,
        limit: query.limit.or(Some(state.config.api.default_limit)),
    };
    let response = state.gateway.list_workflows(&params).await?;

    let mut view = WorkflowView {
        filter: WorkflowFilter {
            id: query.id,
            name: query.name,
            active: query.active,
            archived: query.archived,
            created_from: query.created_from,
            created_to: query.created_to,
            project_id: None,
        },
        ..WorkflowView::default()
    };
    if let Some(field) = query.sort_field {
        view.sort_field = field;
    }
    if let Some(order) = query.sort_order {
        view.sort_order = order;
    }
    view.page = query.page.unwrap_or(1);
    view.page_size = query.page_size.unwrap_or(state.config.ui.page_size);

    let page = view.render(&response.data);
    Ok(Json(json!({
        "data": page.items,
        "meta": {
            "page": page.page,
            "page_size": page.page_size,
            "total_pages": page.total_pages,
            "total": page.total,
        }
    })))
}

async fn workflow_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let workflow = state.gateway.workflow_detail(&id).await?;
    Ok(Json(json!({ "data": workflow })))
}

async fn activate_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.gateway.set_workflow_active(&id, true).await?;
    Ok(Json(json!({ "data": { "id": id, "active": true } })))
}

async fn deactivate_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.gateway.set_workflow_active(&id, false).await?;
    Ok(Json(json!({ "data": { "id": id, "active": false } })))
}

// ---------------------------------------------------------------------------
// Schedulers
// ---------------------------------------------------------------------------

async fn list_schedulers(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let tagged = WorkflowListParams::scheduler_tagged(state.config.api.default_limit);
    let (schedulers, workflows) = try_join(
        state.gateway.list_schedulers(),
        state.gateway.list_workflows(&tagged),
    )
    .await?;

    let active = workflows.data.iter().filter(|w| w.active).count();
    Ok(Json(json!({
        "data": {
            "schedulers": schedulers.data,
            "workflows": workflows.data,
        },
        "meta": {
            "active": active,
            "total": workflows.data.len(),
        }
    })))
}

#[derive(Debug, Deserialize)]
struct ToggleBody {
    enabled: bool,
}

async fn toggle_scheduler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ToggleBody>,
) -> Result<Json<Value>, ApiError> {
    state.gateway.toggle_scheduler(&id, body.enabled).await?;
    Ok(Json(json!({ "data": { "id": id, "enabled": body.enabled } })))
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StatsQuery {
    workflow_id: Option<String>,
    project_id: Option<String>,
    limit: Option<u32>,
    /// `weekly`, `monthly`, `yearly`, or `<N>d`. Chart endpoint only.
    range: Option<String>,
}

impl StatsQuery {
    fn list_params(&self, state: &AppState) -> ExecutionListParams {
        ExecutionListParams {
            workflow_id: self.workflow_id.clone(),
            limit: self.limit.or(Some(state.config.api.default_limit)),
            project_id: self
                .project_id
                .clone()
                .or_else(|| state.config.api.project_id.clone()),
            ..ExecutionListParams::default()
        }
    }
}

async fn stats_overview(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<Value>, ApiError> {
    let response = state
        .gateway
        .list_executions(&query.list_params(&state))
        .await?;
    let overview = stats::overview(&response.data);
    let distribution = stats::status_distribution(&response.data);

    Ok(Json(json!({
        "data": {
            "overview": overview,
            "distribution": distribution,
        },
        "meta": { "sample": response.data.len() }
    })))
}

async fn stats_chart(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<Value>, ApiError> {
    let window: ChartWindow = query
        .range
        .as_deref()
        .unwrap_or("weekly")
        .parse()
        .map_err(ApiError::bad_request)?;

    let response = state
        .gateway
        .list_executions(&query.list_params(&state))
        .await?;

    // The platform already scopes by workflow when asked, but the filter is
    // re-applied here so the chart stays correct when it does not.
    let filter = ExecutionFilter {
        workflow_id: query.workflow_id.clone(),
        ..ExecutionFilter::default()
    };
    let executions = filter.apply(&response.data);
    let buckets = stats::bucket_executions(&executions, window, Utc::now());

    Ok(Json(json!({
        "data": buckets,
        "meta": {
            "range": window.to_string(),
            "total": executions.len(),
        }
    })))
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChatBody {
    message: String,
}

async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatBody>,
) -> Result<Json<Value>, ApiError> {
    let output = state.gateway.send_chat_message(&body.message).await?;
    Ok(Json(json!({ "data": { "output": output } })))
}
