/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `users`: Provisioning and the current user
/// - `dashboard`: Projects plus today's tasks
/// - `projects`: Project CRUD and per-project listings
/// - `notes`: Note CRUD
/// - `tasks`: Task CRUD, completion, date-window queries
/// - `calendar`: Calendar events and drag-to-reschedule

pub mod calendar;
pub mod dashboard;
pub mod health;
pub mod notes;
pub mod projects;
pub mod tasks;
pub mod users;

use chrono::{DateTime, FixedOffset, Local};

use crate::error::ApiError;

/// Largest UTC offset in use anywhere (UTC+14:00)
pub const MAX_TZ_OFFSET_MINUTES: i32 = 14 * 60;

/// Current time in the caller's zone
///
/// `tz_offset_minutes` is minutes east of UTC (UTC+02:00 is `120`). Without
/// it the server's local zone is used.
pub fn local_now(tz_offset_minutes: Option<i32>) -> Result<DateTime<FixedOffset>, ApiError> {
    match tz_offset_minutes {
        Some(minutes) => {
            let offset = (-MAX_TZ_OFFSET_MINUTES..=MAX_TZ_OFFSET_MINUTES)
                .contains(&minutes)
                .then(|| FixedOffset::east_opt(minutes * 60))
                .flatten()
                .ok_or_else(|| {
                    ApiError::invalid_field(
                        "tz_offset_minutes",
                        format!("Offset must be within ±{} minutes", MAX_TZ_OFFSET_MINUTES),
                    )
                })?;
            Ok(chrono::Utc::now().with_timezone(&offset))
        }
        None => {
            let now = Local::now();
            Ok(now.with_timezone(now.offset()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_now_with_offset() {
        let now = local_now(Some(120)).unwrap();
        assert_eq!(now.offset().local_minus_utc(), 7200);

        let now = local_now(Some(-300)).unwrap();
        assert_eq!(now.offset().local_minus_utc(), -18000);
    }

    #[test]
    fn test_local_now_rejects_out_of_range_offset() {
        for minutes in [15 * 60, -15 * 60, i32::MAX, i32::MIN] {
            assert!(
                matches!(local_now(Some(minutes)), Err(ApiError::ValidationError(_))),
                "offset {} should be rejected",
                minutes
            );
        }
    }

    #[test]
    fn test_local_now_accepts_extreme_real_offsets() {
        let now = local_now(Some(MAX_TZ_OFFSET_MINUTES)).unwrap();
        assert_eq!(now.offset().local_minus_utc(), 14 * 3600);

        let now = local_now(Some(-MAX_TZ_OFFSET_MINUTES)).unwrap();
        assert_eq!(now.offset().local_minus_utc(), -14 * 3600);
    }

    #[test]
    fn test_local_now_defaults_to_server_zone() {
        let now = local_now(None).unwrap();
        assert_eq!(now.offset(), Local::now().offset());
    }
}
