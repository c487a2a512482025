/// Calendar windows and event mapping
///
/// The dashboard shows the tasks due "today" in the user's local time, and the
/// calendar view loads one month at a time. Both windows are computed here in
/// a caller-supplied time zone and converted to UTC for querying.
///
/// Tasks are shown on the calendar as point events (`start == end ==
/// due_at`) colored by their project, or gray once completed.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::task::TaskWithProject;

/// Background color for completed tasks
pub const COMPLETED_EVENT_COLOR: &str = "#9CA3AF";

/// Text color for every event
pub const EVENT_TEXT_COLOR: &str = "#FFFFFF";

/// Converts local midnight of `date` in `tz` to UTC
///
/// If midnight falls into a DST gap, the first valid instant after it is used.
fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);

    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| {
            tz.from_local_datetime(&(midnight + Duration::hours(1)))
                .earliest()
        })
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}

/// Returns the local day containing `now` as a half-open UTC window
///
/// `(start, end)` where `start` is local midnight and `end` the next local
/// midnight; a task is "today" when `start <= due_at < end`. On DST change
/// days the window is 23 or 25 hours long.
pub fn day_bounds<Tz: TimeZone>(now: &DateTime<Tz>) -> (DateTime<Utc>, DateTime<Utc>) {
    let tz = now.timezone();
    let today = now.date_naive();

    let start = local_midnight(&tz, today);
    let end = today
        .succ_opt()
        .map(|tomorrow| local_midnight(&tz, tomorrow))
        .unwrap_or_else(|| start + Duration::days(1));

    (start, end)
}

/// Returns the local month containing `now` as an inclusive UTC window
///
/// `(start, end)` where `start` is local midnight on the 1st and `end` is the
/// last microsecond before the next month starts, matching the inclusive
/// range query used by the calendar.
pub fn month_bounds<Tz: TimeZone>(now: &DateTime<Tz>) -> (DateTime<Utc>, DateTime<Utc>) {
    let tz = now.timezone();
    let today = now.date_naive();

    let first = today.with_day(1).unwrap_or(today);
    let next_first = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };

    let start = local_midnight(&tz, first);
    let end = next_first
        .map(|next| local_midnight(&tz, next))
        .unwrap_or_else(|| start + Duration::days(31))
        - Duration::microseconds(1);

    (start, end)
}

/// A task as rendered by the calendar widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Task ID
    pub id: Uuid,

    /// Task title
    pub title: String,

    /// Event start (the task's due date)
    pub start: DateTime<Utc>,

    /// Event end (same as start; tasks are point events)
    pub end: DateTime<Utc>,

    /// Project the task belongs to
    pub project_id: Uuid,

    /// Project name
    pub project_name: String,

    /// Project color
    pub project_color: String,

    /// Color the widget should paint the event with
    pub background_color: String,

    /// Event text color
    pub text_color: String,

    /// Completion flag
    pub is_completed: bool,
}

impl From<TaskWithProject> for CalendarEvent {
    fn from(row: TaskWithProject) -> Self {
        let background_color = if row.task.is_completed {
            COMPLETED_EVENT_COLOR.to_string()
        } else {
            row.project_color.clone()
        };

        Self {
            id: row.task.id,
            title: row.task.title,
            start: row.task.due_at,
            end: row.task.due_at,
            project_id: row.task.project_id,
            project_name: row.project_name,
            project_color: row.project_color,
            background_color,
            text_color: EVENT_TEXT_COLOR.to_string(),
            is_completed: row.task.is_completed,
        }
    }
}
