use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

use flowboard::config::Config;
use flowboard::n8n::{
    ApiClient, Execution, ExecutionListParams, ExecutionStatus, Gateway, WorkflowListParams,
};
use flowboard::query::{
    ExecutionFilter, ExecutionSortField, SortOrder, WorkflowFilter, WorkflowNameIndex,
    WorkflowSortField,
};
use flowboard::stats::{self, ChartWindow};
use flowboard::view::{ExecutionView, WorkflowView};

#[derive(Parser)]
#[command(
    name = "flowboard",
    about = "Monitoring dashboard for n8n-compatible workflow platforms",
    version,
    long_about = None
)]
struct Cli {
    /// Config file path (overrides FLOWBOARD_CONFIG and system locations)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the dashboard HTTP service
    Serve {
        /// Bind address (overrides the config file)
        #[arg(long)]
        bind: Option<String>,
    },

    /// List executions as a table
    Executions {
        /// Exact workflow id
        #[arg(long)]
        workflow: Option<String>,

        /// Status: success, error, running, waiting, canceled
        #[arg(long)]
        status: Option<String>,

        /// Substring of the execution id
        #[arg(long)]
        id: Option<String>,

        /// Substring of the trigger mode
        #[arg(long)]
        mode: Option<String>,

        /// Only finished (true) or unfinished (false) executions
        #[arg(long)]
        finished: Option<bool>,

        /// Started at or after this RFC 3339 instant
        #[arg(long)]
        started_after: Option<String>,

        /// Stopped at or before this RFC 3339 instant
        #[arg(long)]
        stopped_before: Option<String>,

        /// Project scope
        #[arg(long)]
        project: Option<String>,

        /// Server-side fetch limit
        #[arg(long)]
        limit: Option<u32>,

        /// Cursor from a previous page of results
        #[arg(long)]
        cursor: Option<String>,

        /// Sort field: id, workflow_name, status, started_at, stopped_at
        #[arg(long, default_value = "started_at")]
        sort: String,

        /// Sort order: asc or desc
        #[arg(long, default_value = "desc")]
        order: String,

        /// 1-based page number
        #[arg(long, default_value = "1")]
        page: usize,

        /// Rows per page
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Show one execution, optionally with its run/error log
    Execution {
        /// Execution id
        id: String,

        /// Fetch the nested run/error log as well
        #[arg(long)]
        include_data: bool,
    },

    /// List workflows as a table
    Workflows {
        /// Substring of the workflow id
        #[arg(long)]
        id: Option<String>,

        /// Substring of the workflow name
        #[arg(long)]
        name: Option<String>,

        /// Only active (true) or inactive (false) workflows
        #[arg(long)]
        active: Option<bool>,

        /// Only archived (true) or unarchived (false) workflows
        #[arg(long)]
        archived: Option<bool>,

        /// Tag filter forwarded to the platform
        #[arg(long)]
        tags: Option<String>,

        /// Project scope
        #[arg(long)]
        project: Option<String>,

        /// Server-side fetch limit
        #[arg(long)]
        limit: Option<u32>,

        /// Sort field: name, active, archived, created_at
        #[arg(long, default_value = "created_at")]
        sort: String,

        /// Sort order: asc or desc
        #[arg(long, default_value = "desc")]
        order: String,

        /// 1-based page number
        #[arg(long, default_value = "1")]
        page: usize,

        /// Rows per page
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Activate or deactivate a workflow
    Workflow {
        #[command(subcommand)]
        action: WorkflowAction,
    },

    /// List schedule entries and scheduler-tagged workflows
    Schedulers,

    /// Manage one schedule entry
    Scheduler {
        #[command(subcommand)]
        action: SchedulerAction,
    },

    /// Show execution counts and a chart table
    Overview {
        /// Chart window: weekly, monthly, yearly, or <N>d (e.g. 30d)
        #[arg(long, default_value = "weekly")]
        range: String,

        /// Restrict the chart to one workflow id
        #[arg(long)]
        workflow: Option<String>,

        /// Server-side fetch limit
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Send a message to the platform's chat agent
    Chat {
        /// Message text
        message: String,
    },
}

#[derive(Subcommand)]
enum WorkflowAction {
    /// Activate a workflow by id
    Activate { id: String },

    /// Deactivate a workflow by id
    Deactivate { id: String },
}

#[derive(Subcommand)]
enum SchedulerAction {
    /// Enable or disable a schedule entry
    Toggle {
        id: String,

        /// New enabled state
        #[arg(long)]
        enabled: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(),
    };

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .init();

    match cli.command {
        Commands::Serve { bind } => {
            let mut config = config;
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            tracing::info!(bind = %config.server.bind, "Starting Flowboard");
            flowboard::serve(config).await?;
        }
        Commands::Executions {
            workflow,
            status,
            id,
            mode,
            finished,
            started_after,
            stopped_before,
            project,
            limit,
            cursor,
            sort,
            order,
            page,
            page_size,
        } => {
            let gateway = client(&config)?;
            let status = parse_status(status.as_deref())?;

            let params = ExecutionListParams {
                workflow_id: workflow.clone(),
                status,
                limit: limit.or(Some(config.api.default_limit)),
                project_id: project.or_else(|| config.api.project_id.clone()),
                include_data: None,
                cursor,
            };
            let response = gateway.list_executions(&params).await?;

            let view = ExecutionView {
                filter: ExecutionFilter {
                    id,
                    status,
                    workflow_id: workflow,
                    finished,
                    mode,
                    started_after: parse_instant(started_after.as_deref())?,
                    stopped_before: parse_instant(stopped_before.as_deref())?,
                },
                sort_field: parse_execution_sort(&sort)?,
                sort_order: parse_order(&order)?,
                page,
                page_size: page_size.unwrap_or(config.ui.page_size),
            };

            // Resolve workflow names for the table and the name sort.
            let workflows = gateway
                .list_workflows(&WorkflowListParams {
                    limit: Some(config.api.default_limit),
                    ..WorkflowListParams::default()
                })
                .await
                .map(|r| r.data)
                .unwrap_or_default();
            let names = WorkflowNameIndex::from_workflows(&workflows);

            let result = view.render(&response.data, &names);
            if result.items.is_empty() {
                println!("No executions found.");
            } else {
                println!(
                    "{:<8} | {:<12} | {:<28} | {:<8} | {:<20} | {:<20} | {:<9}",
                    "ID", "Workflow", "Name", "Status", "Started At", "Stopped At", "Duration"
                );
                println!(
                    "{:-<8}-|-{:-<12}-|-{:-<28}-|-{:-<8}-|-{:-<20}-|-{:-<20}-|-{:-<9}",
                    "", "", "", "", "", "", ""
                );
                for execution in &result.items {
                    println!(
                        "{:<8} | {:<12} | {:<28} | {:<8} | {:<20} | {:<20} | {:<9}",
                        execution.id,
                        execution.workflow_id,
                        names.resolve(execution),
                        execution.status,
                        format_instant(Some(execution.started_at)),
                        format_instant(execution.stopped_at),
                        format_duration(execution),
                    );
                }
                let shown_from = (result.page - 1) * result.page_size + 1;
                let shown_to = shown_from + result.items.len() - 1;
                println!(
                    "\nShowing {} to {} of {} executions (page {} of {})",
                    shown_from, shown_to, result.total, result.page, result.total_pages
                );
                if let Some(next_cursor) = response.next_cursor {
                    println!("More on the platform: --cursor {next_cursor}");
                }
            }
        }
        Commands::Execution { id, include_data } => {
            let gateway = client(&config)?;
            let detail = gateway.execution_detail(&id, include_data).await?;
            let execution = &detail.execution;

            println!("\n=== Execution #{} ===", execution.id);
            println!(
                "Workflow:   {}",
                execution
                    .workflow_name
                    .as_deref()
                    .unwrap_or(&execution.workflow_id)
            );
            println!("Status:     {}", execution.status);
            println!("Mode:       {}", execution.mode);
            println!(
                "Finished:   {}",
                if execution.finished { "Yes" } else { "No" }
            );
            println!("Started At: {}", format_instant(Some(execution.started_at)));
            match execution.stopped_at {
                Some(stopped) => println!("Stopped At: {}", format_instant(Some(stopped))),
                None => println!("Stopped At: still running"),
            }
            println!("Duration:   {}", format_duration(execution));

            if let Some(log) = detail.data {
                if let Some(last) = &log.result_data.last_node_executed {
                    println!("\nLast node executed: {last}");
                }
                if let Some(error) = &log.result_data.error {
                    println!("\nExecution error:");
                    print_error(error, "  ");
                }
                for (node, runs) in &log.result_data.run_data {
                    for run in runs {
                        if let Some(error) = &run.error {
                            println!("\nNode '{}' failed after {}ms:", node, run.execution_time);
                            print_error(error, "  ");
                        }
                    }
                }
            }
            println!();
        }
        Commands::Workflows {
            id,
            name,
            active,
            archived,
            tags,
            project,
            limit,
            sort,
            order,
            page,
            page_size,
        } => {
            let gateway = client(&config)?;

            let params = WorkflowListParams {
                active,
                tags,
                name: name.clone(),
                project_id: project.or_else(|| config.api.project_id.clone()),
                exclude_pinned_data: None,
                limit: limit.or(Some(config.api.default_limit)),
            };
            let response = gateway.list_workflows(&params).await?;

            let view = WorkflowView {
                filter: WorkflowFilter {
                    id,
                    name,
                    active,
                    archived,
                    created_from: None,
                    created_to: None,
                    project_id: None,
                },
                sort_field: parse_workflow_sort(&sort)?,
                sort_order: parse_order(&order)?,
                page,
                page_size: page_size.unwrap_or(config.ui.page_size),
            };

            let result = view.render(&response.data);
            if result.items.is_empty() {
                println!("No workflows found.");
            } else {
                println!(
                    "{:<12} | {:<32} | {:<8} | {:<7} | {:<12}",
                    "ID", "Name", "Status", "Active", "Created At"
                );
                println!(
                    "{:-<12}-|-{:-<32}-|-{:-<8}-|-{:-<7}-|-{:-<12}",
                    "", "", "", "", ""
                );
                for workflow in &result.items {
                    println!(
                        "{:<12} | {:<32} | {:<8} | {:<7} | {:<12}",
                        workflow.id,
                        workflow.name,
                        if workflow.is_archived {
                            "archived"
                        } else {
                            "live"
                        },
                        if workflow.active { "yes" } else { "no" },
                        workflow.created_at.format("%b %d, %Y"),
                    );
                }
                println!(
                    "\nShowing {} of {} workflows (page {} of {})",
                    result.items.len(),
                    result.total,
                    result.page,
                    result.total_pages
                );
            }
        }
        Commands::Workflow { action } => {
            let gateway = client(&config)?;
            match action {
                WorkflowAction::Activate { id } => {
                    gateway.set_workflow_active(&id, true).await?;
                    println!("Workflow '{}' activated.", id);
                }
                WorkflowAction::Deactivate { id } => {
                    gateway.set_workflow_active(&id, false).await?;
                    println!("Workflow '{}' deactivated.", id);
                }
            }
        }
        Commands::Schedulers => {
            let gateway = client(&config)?;
            let tagged = WorkflowListParams::scheduler_tagged(config.api.default_limit);
            let (schedulers, workflows) = futures::future::try_join(
                gateway.list_schedulers(),
                gateway.list_workflows(&tagged),
            )
            .await?;

            let active = workflows.data.iter().filter(|w| w.active).count();
            println!(
                "Scheduler-tagged workflows: {} / {} active\n",
                active,
                workflows.data.len()
            );

            if schedulers.data.is_empty() {
                println!("No schedule entries found.");
            } else {
                println!(
                    "{:<12} | {:<24} | {:<14} | {:<7} | {:<20}",
                    "ID", "Name", "Cron", "Enabled", "Next Run"
                );
                println!(
                    "{:-<12}-|-{:-<24}-|-{:-<14}-|-{:-<7}-|-{:-<20}",
                    "", "", "", "", ""
                );
                for scheduler in &schedulers.data {
                    println!(
                        "{:<12} | {:<24} | {:<14} | {:<7} | {:<20}",
                        scheduler.id,
                        scheduler.name,
                        scheduler.cron,
                        scheduler.enabled,
                        format_instant(scheduler.next_run_at),
                    );
                }
            }
        }
        Commands::Scheduler { action } => {
            let gateway = client(&config)?;
            match action {
                SchedulerAction::Toggle { id, enabled } => {
                    gateway.toggle_scheduler(&id, enabled).await?;
                    println!(
                        "Scheduler '{}' {}.",
                        id,
                        if enabled { "enabled" } else { "disabled" }
                    );
                }
            }
        }
        Commands::Overview {
            range,
            workflow,
            limit,
        } => {
            let gateway = client(&config)?;
            let window: ChartWindow = range.parse().map_err(anyhow::Error::msg)?;

            let params = ExecutionListParams {
                workflow_id: workflow.clone(),
                limit: limit.or(Some(config.api.default_limit)),
                project_id: config.api.project_id.clone(),
                ..ExecutionListParams::default()
            };
            let response = gateway.list_executions(&params).await?;

            let filter = ExecutionFilter {
                workflow_id: workflow,
                ..ExecutionFilter::default()
            };
            let executions = filter.apply(&response.data);

            let overview = stats::overview(&executions);
            println!("\n=== Executions Overview ===");
            println!("Total:      {}", overview.total);
            println!("Successful: {}", overview.success);
            println!("Failed:     {}", overview.error);
            println!("Running:    {}", overview.running);

            let buckets = stats::bucket_executions(&executions, window, Utc::now());
            println!("\n{} chart:", window);
            println!(
                "{:<8} | {:>7} | {:>7} | {:>7} | {:>7}",
                "Bucket", "Success", "Error", "Running", "Total"
            );
            println!(
                "{:-<8}-|-{:->7}-|-{:->7}-|-{:->7}-|-{:->7}",
                "", "", "", "", ""
            );
            for bucket in &buckets {
                println!(
                    "{:<8} | {:>7} | {:>7} | {:>7} | {:>7}",
                    bucket.label,
                    bucket.counts.success,
                    bucket.counts.error,
                    bucket.counts.running,
                    bucket.total,
                );
            }
            println!();
        }
        Commands::Chat { message } => {
            let gateway = client(&config)?;
            let reply = gateway.send_chat_message(&message).await?;
            println!("{reply}");
        }
    }

    Ok(())
}

fn client(config: &Config) -> Result<ApiClient> {
    ApiClient::new(&config.api).context("failed to build the platform API client")
}

fn parse_status(status: Option<&str>) -> Result<Option<ExecutionStatus>> {
    status
        .map(|s| s.parse::<ExecutionStatus>().map_err(anyhow::Error::msg))
        .transpose()
}

fn parse_instant(value: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    value
        .map(|s| {
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .with_context(|| format!("invalid RFC 3339 timestamp '{s}'"))
        })
        .transpose()
}

fn parse_execution_sort(field: &str) -> Result<ExecutionSortField> {
    match field {
        "id" => Ok(ExecutionSortField::Id),
        "workflow_name" => Ok(ExecutionSortField::WorkflowName),
        "status" => Ok(ExecutionSortField::Status),
        "started_at" => Ok(ExecutionSortField::StartedAt),
        "stopped_at" => Ok(ExecutionSortField::StoppedAt),
        other => anyhow::bail!("unknown sort field '{other}'"),
    }
}

fn parse_workflow_sort(field: &str) -> Result<WorkflowSortField> {
    match field {
        "name" => Ok(WorkflowSortField::Name),
        "active" => Ok(WorkflowSortField::Active),
        "archived" => Ok(WorkflowSortField::Archived),
        "created_at" => Ok(WorkflowSortField::CreatedAt),
        other => anyhow::bail!("unknown sort field '{other}'"),
    }
}

fn parse_order(order: &str) -> Result<SortOrder> {
    match order {
        "asc" => Ok(SortOrder::Asc),
        "desc" => Ok(SortOrder::Desc),
        other => anyhow::bail!("unknown sort order '{other}'"),
    }
}

fn format_instant(instant: Option<DateTime<Utc>>) -> String {
    match instant {
        Some(dt) => dt.format("%b %d, %Y %H:%M:%S").to_string(),
        None => "-".to_string(),
    }
}

fn format_duration(execution: &Execution) -> String {
    match execution.duration() {
        None => "-".to_string(),
        Some(duration) => {
            let seconds = duration.num_seconds();
            if seconds < 60 {
                format!("{seconds}s")
            } else {
                format!("{}m {}s", seconds / 60, seconds % 60)
            }
        }
    }
}

fn print_error(error: &flowboard::n8n::ExecutionError, indent: &str) {
    if let Some(name) = &error.name {
        println!("{indent}{name}");
    }
    if let Some(message) = &error.message {
        println!("{indent}{message}");
    }
    if let Some(description) = &error.description {
        println!("{indent}{description}");
    }
    if let Some(http_code) = &error.http_code {
        println!("{indent}HTTP {http_code}");
    }
    if let Some(node) = &error.node {
        if let Some(node_name) = &node.name {
            println!("{indent}node: {node_name}");
        }
    }
}
