use serde::{Deserialize, Serialize};

/// Lifecycle status of a project request. New submissions start `pending`;
/// an administrator moves them to `approved` or `rejected`. Neither terminal
/// state is guarded — a reviewed project can be patched again.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Pending,
    Approved,
    Rejected,
}

/// Project record stored under `project:<id>`. `budget` is free text as
/// submitted by the client ("$500", "500 USD", ...); it is only parsed when
/// commission is accrued on approval.
#[derive(Debug, Serialize, Deserialize, Clone, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub user_id: String,
    pub project_name: String,
    pub project_description: String,
    pub developer_type: String,
    pub budget: String,
    pub timeline: String,
    pub payment_method: String,
    pub status: ProjectStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_developer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_developer_id: Option<String>,
    #[serde(default)]
    pub needs_new_developer: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nomad_commission: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<String>,
}

/// Admin listing row: a project with the submitter's identity denormalized
/// onto it for the review table.
#[derive(Debug, Serialize, Deserialize, Clone, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectWithUser {
    #[serde(flatten)]
    pub project: Project,
    pub username: String,
    pub user_email: String,
}
