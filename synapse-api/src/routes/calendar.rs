/// Calendar endpoints
///
/// # Endpoints
///
/// - `GET /v1/calendar/events` - Tasks as calendar events
/// - `PATCH /v1/calendar/events/:id` - Drag-to-reschedule
///
/// A failed reschedule answers with an error status and changes nothing, so
/// the widget can move the event back.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::{local_now, tasks::check_window},
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use synapse_shared::{
    auth::middleware::AuthContext,
    calendar::{month_bounds, CalendarEvent},
    models::task::Task,
};
use tracing::info;
use uuid::Uuid;

/// Query for `GET /v1/calendar/events`
///
/// Give both `start` and `end`, or neither for the current month.
#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    /// Window start (inclusive)
    pub start: Option<DateTime<Utc>>,

    /// Window end (inclusive)
    pub end: Option<DateTime<Utc>>,

    /// Caller's UTC offset, used for the default month
    pub tz_offset_minutes: Option<i32>,
}

/// Reschedule request, as sent by the widget after a drop
#[derive(Debug, Deserialize)]
pub struct RescheduleRequest {
    /// New due date
    pub start: DateTime<Utc>,
}

fn resolve_window(query: &EventsQuery) -> ApiResult<(DateTime<Utc>, DateTime<Utc>)> {
    match (query.start, query.end) {
        (Some(start), Some(end)) => {
            check_window(start, end)?;
            Ok((start, end))
        }
        (None, None) => Ok(month_bounds(&local_now(query.tz_offset_minutes)?)),
        _ => Err(ApiError::invalid_field(
            "start",
            "Provide both start and end, or neither",
        )),
    }
}

/// List calendar events in a window
pub async fn list_events(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<EventsQuery>,
) -> ApiResult<Json<Vec<CalendarEvent>>> {
    let (start, end) = resolve_window(&query)?;

    let events = Task::list_by_date_range(&state.db, &auth.user_id, start, end)
        .await?
        .into_iter()
        .map(CalendarEvent::from)
        .collect();

    Ok(Json(events))
}

/// Move an event to a new date
///
/// # Errors
///
/// - `404 Not Found`: No such task for this user
pub async fn reschedule_event(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<RescheduleRequest>,
) -> ApiResult<Json<CalendarEvent>> {
    let not_found = || ApiError::NotFound("Task not found".to_string());

    Task::reschedule(&state.db, id, &auth.user_id, req.start)
        .await?
        .ok_or_else(not_found)?;

    info!(user_id = %auth.user_id, task_id = %id, due_at = %req.start, "Task rescheduled");

    let event = Task::find_by_id_for_user(&state.db, id, &auth.user_id)
        .await?
        .map(CalendarEvent::from)
        .ok_or_else(not_found)?;

    Ok(Json(event))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn query(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> EventsQuery {
        EventsQuery {
            start,
            end,
            tz_offset_minutes: Some(0),
        }
    }

    #[test]
    fn test_resolve_window_explicit() {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 6, 30, 23, 59, 59).unwrap();
        assert_eq!(resolve_window(&query(Some(start), Some(end))).unwrap(), (start, end));
    }

    #[test]
    fn test_resolve_window_defaults_to_current_month() {
        let (start, end) = resolve_window(&query(None, None)).unwrap();
        let now = Utc::now();
        assert!(start <= now && now <= end);
        assert_eq!(start, month_bounds(&now).0);
    }

    #[test]
    fn test_resolve_window_rejects_half_open() {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        assert!(resolve_window(&query(Some(start), None)).is_err());
        assert!(resolve_window(&query(None, Some(start))).is_err());
    }
}
