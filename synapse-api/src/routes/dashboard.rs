/// Dashboard endpoint
///
/// Everything the landing view needs in one call: the caller's projects,
/// today's tasks, and a few counts.
///
/// # Endpoint
///
/// ```text
/// GET /v1/dashboard?tz_offset_minutes=120
/// ```

use crate::{app::AppState, error::ApiResult, routes::local_now};
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use synapse_shared::{
    auth::middleware::AuthContext,
    models::{
        project::Project,
        task::{Task, TaskWithProject},
    },
};

/// Query for `GET /v1/dashboard`
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    /// Caller's UTC offset in minutes east of UTC
    pub tz_offset_minutes: Option<i32>,
}

/// Counts shown on the dashboard cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Number of projects
    pub project_count: usize,

    /// Tasks due today
    pub today_total: usize,

    /// Of those, not yet completed
    pub today_pending: usize,

    /// Of those, completed
    pub today_completed: usize,

    /// Completed share of today's tasks, rounded percent (0 when none)
    pub completion_rate: u8,
}

impl DashboardSummary {
    /// Computes the counts from the dashboard's data
    pub fn from_parts(projects: &[Project], today: &[TaskWithProject]) -> Self {
        let today_total = today.len();
        let today_completed = today.iter().filter(|t| t.task.is_completed).count();

        let completion_rate = if today_total == 0 {
            0
        } else {
            ((today_completed as f64 / today_total as f64) * 100.0).round() as u8
        };

        Self {
            project_count: projects.len(),
            today_total,
            today_pending: today_total - today_completed,
            today_completed,
            completion_rate,
        }
    }
}

/// Dashboard response
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    /// Card counts
    pub summary: DashboardSummary,

    /// The caller's projects, oldest first
    pub projects: Vec<Project>,

    /// Tasks due today, earliest first
    pub today_tasks: Vec<TaskWithProject>,
}

/// Dashboard handler
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<DashboardQuery>,
) -> ApiResult<Json<DashboardResponse>> {
    let now = local_now(query.tz_offset_minutes)?;

    let projects = Project::list_by_user(&state.db, &auth.user_id).await?;
    let today_tasks = Task::list_for_today(&state.db, &auth.user_id, &now).await?;

    Ok(Json(DashboardResponse {
        summary: DashboardSummary::from_parts(&projects, &today_tasks),
        projects,
        today_tasks,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use synapse_shared::models::task::Task;
    use uuid::Uuid;

    fn today_task(is_completed: bool) -> TaskWithProject {
        let now = Utc::now();
        TaskWithProject {
            task: Task {
                id: Uuid::new_v4(),
                user_id: "u1".to_string(),
                project_id: Uuid::new_v4(),
                note_id: None,
                title: "t".to_string(),
                description: None,
                due_at: now,
                reminder_offset_minutes: None,
                is_completed,
                is_recurring: false,
                recurrence_rule: None,
                created_at: now,
                updated_at: now,
            },
            project_name: "Personal".to_string(),
            project_color: "#3B82F6".to_string(),
            note_title: None,
        }
    }

    #[test]
    fn test_summary_empty() {
        let summary = DashboardSummary::from_parts(&[], &[]);
        assert_eq!(summary.today_total, 0);
        assert_eq!(summary.completion_rate, 0);
    }

    #[test]
    fn test_summary_counts() {
        let today = vec![today_task(true), today_task(false), today_task(false)];
        let summary = DashboardSummary::from_parts(&[], &today);

        assert_eq!(summary.today_total, 3);
        assert_eq!(summary.today_completed, 1);
        assert_eq!(summary.today_pending, 2);
        assert_eq!(summary.completion_rate, 33);
    }
}
