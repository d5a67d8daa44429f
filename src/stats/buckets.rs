//! Time-bucketed execution counts for the charts.
//!
//! A window always yields its full bucket sequence -- 7 days for a week, 12
//! months for a year, 5 years, N days for a rolling window -- with zero
//! counts where nothing ran. Buckets are keyed on the execution's start
//! time using UTC calendar days/months/years, and the reference instant is
//! passed in explicitly so the same input always yields the same sequence.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use serde::Serialize;

use crate::n8n::Execution;

use super::StatusBreakdown;

/// Chart granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartWindow {
    /// The 7 days of the current week, Sunday first.
    Weekly,
    /// The 12 months of the current year.
    Monthly,
    /// The last 5 calendar years, oldest first.
    Yearly,
    /// The last N days ending today, oldest first.
    RollingDays(u32),
}

impl std::str::FromStr for ChartWindow {
    type Err = String;

    /// Accepts `weekly`, `monthly`, `yearly`, or `<N>d` (e.g. `30d`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(ChartWindow::Weekly),
            "monthly" => Ok(ChartWindow::Monthly),
            "yearly" => Ok(ChartWindow::Yearly),
            other => {
                if let Some(days) = other.strip_suffix('d') {
                    let days: u32 = days
                        .parse()
                        .map_err(|_| format!("invalid chart window '{other}'"))?;
                    if days == 0 {
                        return Err("rolling window must span at least one day".to_string());
                    }
                    Ok(ChartWindow::RollingDays(days))
                } else {
                    Err(format!("invalid chart window '{other}'"))
                }
            }
        }
    }
}

impl std::fmt::Display for ChartWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartWindow::Weekly => write!(f, "weekly"),
            ChartWindow::Monthly => write!(f, "monthly"),
            ChartWindow::Yearly => write!(f, "yearly"),
            ChartWindow::RollingDays(days) => write!(f, "{days}d"),
        }
    }
}

/// One chart bucket: a window label, per-status counts, and the total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartBucket {
    pub label: String,
    pub counts: StatusBreakdown,
    pub total: usize,
}

fn bucket_for<F>(executions: &[Execution], label: String, matches: F) -> ChartBucket
where
    F: Fn(&Execution) -> bool,
{
    let mut counts = StatusBreakdown::default();
    for execution in executions.iter().filter(|e| matches(e)) {
        counts.record(execution.status);
    }
    ChartBucket {
        label,
        total: counts.total(),
        counts,
    }
}

fn day_bucket(executions: &[Execution], day: NaiveDate, label: String) -> ChartBucket {
    bucket_for(executions, label, |e| e.started_at.date_naive() == day)
}

/// Aggregate `executions` into the ordered bucket sequence for `window`,
/// evaluated relative to `now`.
pub fn bucket_executions(
    executions: &[Execution],
    window: ChartWindow,
    now: DateTime<Utc>,
) -> Vec<ChartBucket> {
    let today = now.date_naive();

    match window {
        ChartWindow::Weekly => {
            let week_start = today
                - Days::new(u64::from(today.weekday().num_days_from_sunday()));
            (0..7)
                .map(|offset| {
                    let day = week_start + Days::new(offset);
                    day_bucket(executions, day, day.format("%a").to_string())
                })
                .collect()
        }
        ChartWindow::Monthly => {
            let year = today.year();
            (1..=12)
                .map(|month| {
                    let label = NaiveDate::from_ymd_opt(year, month, 1)
                        .expect("first of month is always a valid date")
                        .format("%b")
                        .to_string();
                    bucket_for(executions, label, |e| {
                        e.started_at.year() == year && e.started_at.month() == month
                    })
                })
                .collect()
        }
        ChartWindow::Yearly => {
            let year = today.year();
            (year - 4..=year)
                .map(|y| {
                    bucket_for(executions, y.to_string(), |e| e.started_at.year() == y)
                })
                .collect()
        }
        ChartWindow::RollingDays(days) => {
            let days = days.max(1);
            (0..days)
                .rev()
                .map(|offset| {
                    let day = today - Days::new(u64::from(offset));
                    day_bucket(executions, day, day.format("%b %d").to_string())
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::n8n::ExecutionStatus;
    use chrono::TimeZone;

    fn exec_at(status: ExecutionStatus, started_at: DateTime<Utc>) -> Execution {
        Execution {
            id: "1".to_string(),
            finished: true,
            mode: "webhook".to_string(),
            status,
            started_at,
            stopped_at: None,
            workflow_id: "WF1".to_string(),
            workflow_name: None,
            workflow_data: None,
        }
    }

    // 2025-06-04 was a Wednesday; its week runs Sun 2025-06-01 .. Sat 2025-06-07.
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 4, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_weekly_window_always_yields_seven_buckets() {
        let buckets = bucket_executions(&[], ChartWindow::Weekly, now());
        assert_eq!(buckets.len(), 7);
        assert_eq!(buckets[0].label, "Sun");
        assert_eq!(buckets[6].label, "Sat");
        assert!(buckets.iter().all(|b| b.total == 0));
    }

    #[test]
    fn test_weekly_totals_sum_to_in_window_count() {
        let executions = vec![
            exec_at(
                ExecutionStatus::Success,
                Utc.with_ymd_and_hms(2025, 6, 2, 8, 0, 0).unwrap(),
            ),
            exec_at(
                ExecutionStatus::Error,
                Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap(),
            ),
            exec_at(
                ExecutionStatus::Success,
                Utc.with_ymd_and_hms(2025, 6, 7, 23, 59, 59).unwrap(),
            ),
            // Outside the week; must not be counted.
            exec_at(
                ExecutionStatus::Success,
                Utc.with_ymd_and_hms(2025, 5, 25, 8, 0, 0).unwrap(),
            ),
        ];

        let buckets = bucket_executions(&executions, ChartWindow::Weekly, now());
        let total: usize = buckets.iter().map(|b| b.total).sum();
        assert_eq!(total, 3);

        // Monday (index 1) has one success and one error.
        assert_eq!(buckets[1].label, "Mon");
        assert_eq!(buckets[1].counts.success, 1);
        assert_eq!(buckets[1].counts.error, 1);
        assert_eq!(buckets[1].total, 2);
    }

    #[test]
    fn test_monthly_window_yields_twelve_buckets() {
        let executions = vec![exec_at(
            ExecutionStatus::Success,
            Utc.with_ymd_and_hms(2025, 3, 15, 8, 0, 0).unwrap(),
        )];
        let buckets = bucket_executions(&executions, ChartWindow::Monthly, now());
        assert_eq!(buckets.len(), 12);
        assert_eq!(buckets[0].label, "Jan");
        assert_eq!(buckets[2].label, "Mar");
        assert_eq!(buckets[2].total, 1);
    }

    #[test]
    fn test_yearly_window_covers_last_five_years() {
        let executions = vec![
            exec_at(
                ExecutionStatus::Success,
                Utc.with_ymd_and_hms(2021, 3, 15, 8, 0, 0).unwrap(),
            ),
            // Too old for the window.
            exec_at(
                ExecutionStatus::Success,
                Utc.with_ymd_and_hms(2019, 3, 15, 8, 0, 0).unwrap(),
            ),
        ];
        let buckets = bucket_executions(&executions, ChartWindow::Yearly, now());
        assert_eq!(buckets.len(), 5);
        assert_eq!(buckets[0].label, "2021");
        assert_eq!(buckets[4].label, "2025");
        assert_eq!(buckets[0].total, 1);
        let total: usize = buckets.iter().map(|b| b.total).sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn test_rolling_window_ends_today() {
        let executions = vec![exec_at(
            ExecutionStatus::Success,
            Utc.with_ymd_and_hms(2025, 6, 4, 0, 30, 0).unwrap(),
        )];
        let buckets = bucket_executions(&executions, ChartWindow::RollingDays(3), now());
        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[2].label, "Jun 04");
        assert_eq!(buckets[2].total, 1);
    }

    #[test]
    fn test_aggregation_is_deterministic() {
        let executions = vec![
            exec_at(
                ExecutionStatus::Success,
                Utc.with_ymd_and_hms(2025, 6, 2, 8, 0, 0).unwrap(),
            ),
            exec_at(
                ExecutionStatus::Canceled,
                Utc.with_ymd_and_hms(2025, 6, 3, 8, 0, 0).unwrap(),
            ),
        ];
        let first = bucket_executions(&executions, ChartWindow::Weekly, now());
        let second = bucket_executions(&executions, ChartWindow::Weekly, now());
        assert_eq!(first, second);
    }

    #[test]
    fn test_window_parsing() {
        assert_eq!("weekly".parse::<ChartWindow>().unwrap(), ChartWindow::Weekly);
        assert_eq!(
            "30d".parse::<ChartWindow>().unwrap(),
            ChartWindow::RollingDays(30)
        );
        assert!("0d".parse::<ChartWindow>().is_err());
        assert!("fortnightly".parse::<ChartWindow>().is_err());
    }
}
