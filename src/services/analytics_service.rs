use crate::database::KvStore;
use crate::models::{AnalyticsSnapshot, Project, ProjectStatus, User, UserSummary};
use crate::services::activity_tracker::ActivityTracker;
use crate::services::project_service::REVENUE_KEY;
use crate::utils::AppError;

/// Computes the admin dashboard snapshot with a full scan of users and
/// projects. O(n) over total entity count per call; no incremental
/// maintenance.
pub async fn snapshot(
    kv: &dyn KvStore,
    tracker: &ActivityTracker,
) -> Result<AnalyticsSnapshot, AppError> {
    let users: Vec<User> = kv
        .get_by_prefix("user:")
        .await?
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect();

    let projects: Vec<Project> = kv
        .get_by_prefix("project:")
        .await?
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect();

    let total_developers = kv.get_by_prefix("developer:").await?.len();

    let total_revenue = kv
        .get(REVENUE_KEY)
        .await?
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);

    let approved_projects = projects
        .iter()
        .filter(|p| p.status == ProjectStatus::Approved)
        .count();
    let pending_projects = projects
        .iter()
        .filter(|p| p.status == ProjectStatus::Pending)
        .count();

    Ok(AnalyticsSnapshot {
        total_users: users.len(),
        active_users: tracker.active_count(),
        total_projects: projects.len(),
        approved_projects,
        pending_projects,
        total_developers,
        total_revenue,
        users: users.iter().map(UserSummary::from).collect(),
    })
}
