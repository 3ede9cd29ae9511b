use crate::models::UserSummary;
use serde::{Deserialize, Serialize};

/// Point-in-time dashboard snapshot. Computed by a full scan of users and
/// projects on every call; callers re-poll for freshness.
#[derive(Debug, Serialize, Deserialize, Clone, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    pub total_users: usize,
    /// Best-effort: size of the in-process activity tracker's live set.
    /// Instance-local and lost on restart — display metric only.
    pub active_users: usize,
    pub total_projects: usize,
    pub approved_projects: usize,
    pub pending_projects: usize,
    pub total_developers: usize,
    pub total_revenue: f64,
    pub users: Vec<UserSummary>,
}
