use crate::database::KvStore;
use crate::models::{Project, ProjectStatus, ProjectWithUser, User};
use crate::utils::{json, AppError};
use chrono::Utc;
use serde::Deserialize;
use std::collections::HashMap;
use uuid::Uuid;

/// Fixed platform commission, accrued against the revenue counter when a
/// project is first approved.
pub const NOMAD_COMMISSION: f64 = 0.20;

pub const REVENUE_KEY: &str = "analytics:totalRevenue";

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SubmitProjectRequest {
    pub project_name: String,
    pub project_description: String,
    pub developer_type: String,
    pub budget: String,
    pub timeline: String,
    pub payment_method: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProjectStatusRequest {
    pub status: ProjectStatus,
    pub assigned_developer: Option<String>,
    pub assigned_developer_id: Option<String>,
}

/// Creates a project in `pending` state and appends its id to the
/// submitter's index. The two writes are independent: a failure between
/// them leaves an unindexed project (tolerated by `list_mine`).
pub async fn submit(
    kv: &dyn KvStore,
    user_id: &str,
    request: &SubmitProjectRequest,
) -> Result<Project, AppError> {
    let fields = [
        &request.project_name,
        &request.project_description,
        &request.developer_type,
        &request.budget,
        &request.timeline,
        &request.payment_method,
    ];

    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(AppError::Validation("All fields are required".to_string()));
    }

    let now = Utc::now().to_rfc3339();
    let project = Project {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        project_name: request.project_name.clone(),
        project_description: request.project_description.clone(),
        developer_type: request.developer_type.clone(),
        budget: request.budget.clone(),
        timeline: request.timeline.clone(),
        payment_method: request.payment_method.clone(),
        status: ProjectStatus::Pending,
        assigned_developer: None,
        assigned_developer_id: None,
        needs_new_developer: false,
        nomad_commission: None,
        created_at: now.clone(),
        updated_at: now,
        approved_at: None,
    };

    kv.set(&format!("project:{}", project.id), json::encode(&project)?)
        .await?;

    let index_key = format!("userProjects:{}", user_id);
    let mut project_ids: Vec<String> = match kv.get(&index_key).await? {
        Some(value) => json::decode(value)?,
        None => vec![],
    };
    project_ids.push(project.id.clone());
    kv.set(&index_key, json::encode(&project_ids)?).await?;

    log::info!("📝 Project submitted: {} by user {}", project.id, user_id);

    Ok(project)
}

/// Lists the caller's projects. Stale index entries (deleted or unreadable
/// records) are dropped silently; an entry pointing at another user's
/// project must never leak through.
pub async fn list_mine(kv: &dyn KvStore, user_id: &str) -> Result<Vec<Project>, AppError> {
    let index_key = format!("userProjects:{}", user_id);
    let project_ids: Vec<String> = match kv.get(&index_key).await? {
        Some(value) => json::decode(value)?,
        None => vec![],
    };

    let keys: Vec<String> = project_ids.iter().map(|id| format!("project:{}", id)).collect();

    let projects = kv
        .mget(&keys)
        .await?
        .into_iter()
        .flatten()
        .filter_map(|value| serde_json::from_value::<Project>(value).ok())
        .filter(|p| p.user_id == user_id)
        .collect();

    Ok(projects)
}

/// Flags a project for developer reassignment. Owner-only; no status guard,
/// so a reviewed project can still be flagged.
pub async fn request_reassignment(
    kv: &dyn KvStore,
    user_id: &str,
    project_id: &str,
) -> Result<Project, AppError> {
    let key = format!("project:{}", project_id);
    let mut project: Project = match kv.get(&key).await? {
        Some(value) => json::decode(value)?,
        None => return Err(AppError::NotFound("Project not found".to_string())),
    };

    if project.user_id != user_id {
        return Err(AppError::Forbidden("Forbidden".to_string()));
    }

    project.needs_new_developer = true;
    project.updated_at = Utc::now().to_rfc3339();

    kv.set(&key, json::encode(&project)?).await?;

    Ok(project)
}

/// Admin review: sets the status and (optionally) the developer assignment.
///
/// Assignment fields not supplied are preserved, so rejecting a project
/// never clears an existing assignment. `approvedAt` is stamped only on the
/// first transition into `approved`, and the commission is accrued at that
/// same moment — re-approving a project does not double-count revenue.
pub async fn admin_update_status(
    kv: &dyn KvStore,
    project_id: &str,
    request: &UpdateProjectStatusRequest,
) -> Result<Project, AppError> {
    let key = format!("project:{}", project_id);
    let mut project: Project = match kv.get(&key).await? {
        Some(value) => json::decode(value)?,
        None => return Err(AppError::NotFound("Project not found".to_string())),
    };

    let first_approval =
        request.status == ProjectStatus::Approved && project.approved_at.is_none();
    let now = Utc::now().to_rfc3339();

    project.status = request.status;
    if let Some(name) = &request.assigned_developer {
        project.assigned_developer = Some(name.clone());
    }
    if let Some(id) = &request.assigned_developer_id {
        project.assigned_developer_id = Some(id.clone());
    }
    if first_approval {
        project.approved_at = Some(now.clone());
    }
    project.needs_new_developer = false;
    project.nomad_commission = Some(NOMAD_COMMISSION);
    project.updated_at = now;

    kv.set(&key, json::encode(&project)?).await?;

    if first_approval {
        if let Some(budget) = parse_budget(&project.budget) {
            let total = kv.incr_f64(REVENUE_KEY, budget * NOMAD_COMMISSION).await?;
            log::info!(
                "💰 Commission accrued for project {}: +{:.2} (total {:.2})",
                project.id,
                budget * NOMAD_COMMISSION,
                total
            );
        } else {
            log::warn!(
                "⚠️ Unparsable budget on approved project {}: {:?}",
                project.id,
                project.budget
            );
        }
    }

    Ok(project)
}

/// Admin listing: every project with the submitter's username and email
/// denormalized onto it. Missing user records degrade to "Unknown".
pub async fn list_all(kv: &dyn KvStore) -> Result<Vec<ProjectWithUser>, AppError> {
    let projects: Vec<Project> = kv
        .get_by_prefix("project:")
        .await?
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect();

    let mut user_keys: Vec<String> = projects
        .iter()
        .map(|p| format!("user:{}", p.user_id))
        .collect();
    user_keys.sort();
    user_keys.dedup();

    let users: HashMap<String, User> = kv
        .mget(&user_keys)
        .await?
        .into_iter()
        .flatten()
        .filter_map(|value| serde_json::from_value::<User>(value).ok())
        .map(|u| (u.id.clone(), u))
        .collect();

    let rows = projects
        .into_iter()
        .map(|project| {
            let user = users.get(&project.user_id);
            ProjectWithUser {
                username: user.map(|u| u.username.clone()).unwrap_or_else(|| "Unknown".into()),
                user_email: user.map(|u| u.email.clone()).unwrap_or_else(|| "Unknown".into()),
                project,
            }
        })
        .collect();

    Ok(rows)
}

/// Extracts a numeric budget from the free-text field: strip everything but
/// digits and the decimal point, then parse. Returns `None` when nothing
/// numeric remains (the caller then accrues zero commission).
pub fn parse_budget(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    cleaned.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{KvStore, MemoryKv};
    use crate::utils::json;

    fn request(budget: &str) -> SubmitProjectRequest {
        SubmitProjectRequest {
            project_name: "Obby Tycoon".into(),
            project_description: "A tycoon game with daily quests".into(),
            developer_type: "Roblox Developer".into(),
            budget: budget.into(),
            timeline: "6 weeks".into(),
            payment_method: "PayPal".into(),
        }
    }

    async fn revenue(kv: &MemoryKv) -> f64 {
        kv.get(REVENUE_KEY).await.unwrap().and_then(|v| v.as_f64()).unwrap_or(0.0)
    }

    #[test]
    fn budget_parsing_strips_currency_noise() {
        assert_eq!(parse_budget("$500"), Some(500.0));
        assert_eq!(parse_budget("1,250.50 USD"), Some(1250.50));
        assert_eq!(parse_budget("to be discussed"), None);
        assert_eq!(parse_budget(""), None);
    }

    #[tokio::test]
    async fn submit_requires_all_six_fields() {
        let kv = MemoryKv::new();
        let mut req = request("$500");
        req.timeline = "".into();
        let err = submit(&kv, "u1", &req).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn submit_starts_pending_and_is_indexed() {
        let kv = MemoryKv::new();
        let project = submit(&kv, "u1", &request("$500")).await.unwrap();

        assert_eq!(project.status, ProjectStatus::Pending);
        assert!(project.approved_at.is_none());

        let mine = list_mine(&kv, "u1").await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, project.id);
    }

    #[tokio::test]
    async fn list_mine_never_leaks_foreign_projects() {
        let kv = MemoryKv::new();
        let theirs = submit(&kv, "owner", &request("$500")).await.unwrap();

        // Corrupt the victim's index with someone else's project id.
        kv.set("userProjects:victim", json::encode(&vec![theirs.id.clone()]).unwrap())
            .await
            .unwrap();

        let mine = list_mine(&kv, "victim").await.unwrap();
        assert!(mine.is_empty());
    }

    #[tokio::test]
    async fn list_mine_tolerates_stale_index_entries() {
        let kv = MemoryKv::new();
        let project = submit(&kv, "u1", &request("$500")).await.unwrap();
        submit(&kv, "u1", &request("$900")).await.unwrap();

        kv.delete(&format!("project:{}", project.id)).await.unwrap();

        let mine = list_mine(&kv, "u1").await.unwrap();
        assert_eq!(mine.len(), 1);
    }

    #[tokio::test]
    async fn reassignment_is_owner_only() {
        let kv = MemoryKv::new();
        let project = submit(&kv, "owner", &request("$500")).await.unwrap();

        let err = request_reassignment(&kv, "stranger", &project.id).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let updated = request_reassignment(&kv, "owner", &project.id).await.unwrap();
        assert!(updated.needs_new_developer);
    }

    #[tokio::test]
    async fn reassignment_of_missing_project_is_not_found() {
        let kv = MemoryKv::new();
        let err = request_reassignment(&kv, "owner", "nope").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn approval_accrues_twenty_percent_of_budget() {
        let kv = MemoryKv::new();
        let project = submit(&kv, "u1", &request("$500")).await.unwrap();

        let updated = admin_update_status(
            &kv,
            &project.id,
            &UpdateProjectStatusRequest {
                status: ProjectStatus::Approved,
                assigned_developer: Some("Sarah Johnson".into()),
                assigned_developer_id: Some("dev-42".into()),
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.status, ProjectStatus::Approved);
        assert_eq!(updated.assigned_developer_id.as_deref(), Some("dev-42"));
        assert_eq!(updated.nomad_commission, Some(NOMAD_COMMISSION));
        assert!(updated.approved_at.is_some());
        assert_eq!(revenue(&kv).await, 100.0);
    }

    #[tokio::test]
    async fn reapproval_does_not_double_count_revenue() {
        let kv = MemoryKv::new();
        let project = submit(&kv, "u1", &request("$500")).await.unwrap();

        let approve = UpdateProjectStatusRequest {
            status: ProjectStatus::Approved,
            assigned_developer: None,
            assigned_developer_id: None,
        };

        let first = admin_update_status(&kv, &project.id, &approve).await.unwrap();
        let second = admin_update_status(&kv, &project.id, &approve).await.unwrap();

        assert_eq!(revenue(&kv).await, 100.0);
        // The original approval timestamp survives the re-approval.
        assert_eq!(first.approved_at, second.approved_at);
    }

    #[tokio::test]
    async fn rejection_preserves_existing_assignment() {
        let kv = MemoryKv::new();
        let project = submit(&kv, "u1", &request("$500")).await.unwrap();

        admin_update_status(
            &kv,
            &project.id,
            &UpdateProjectStatusRequest {
                status: ProjectStatus::Approved,
                assigned_developer: Some("Mike Chen".into()),
                assigned_developer_id: Some("dev-7".into()),
            },
        )
        .await
        .unwrap();

        let rejected = admin_update_status(
            &kv,
            &project.id,
            &UpdateProjectStatusRequest {
                status: ProjectStatus::Rejected,
                assigned_developer: None,
                assigned_developer_id: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(rejected.status, ProjectStatus::Rejected);
        assert_eq!(rejected.assigned_developer.as_deref(), Some("Mike Chen"));
        assert_eq!(rejected.assigned_developer_id.as_deref(), Some("dev-7"));
        // No further revenue beyond the original approval.
        assert_eq!(revenue(&kv).await, 100.0);
    }

    #[tokio::test]
    async fn unparsable_budget_accrues_nothing() {
        let kv = MemoryKv::new();
        let project = submit(&kv, "u1", &request("to be discussed")).await.unwrap();

        admin_update_status(
            &kv,
            &project.id,
            &UpdateProjectStatusRequest {
                status: ProjectStatus::Approved,
                assigned_developer: None,
                assigned_developer_id: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(revenue(&kv).await, 0.0);
    }

    #[tokio::test]
    async fn review_clears_the_reassignment_flag() {
        let kv = MemoryKv::new();
        let project = submit(&kv, "u1", &request("$500")).await.unwrap();
        request_reassignment(&kv, "u1", &project.id).await.unwrap();

        let updated = admin_update_status(
            &kv,
            &project.id,
            &UpdateProjectStatusRequest {
                status: ProjectStatus::Approved,
                assigned_developer: Some("Emily Brown".into()),
                assigned_developer_id: Some("dev-9".into()),
            },
        )
        .await
        .unwrap();

        assert!(!updated.needs_new_developer);
    }

    #[tokio::test]
    async fn admin_listing_denormalizes_submitter_identity() {
        let kv = MemoryKv::new();

        let user = crate::models::User {
            id: "u1".into(),
            email: "client@example.com".into(),
            username: "client".into(),
            is_admin: false,
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        kv.set("user:u1", json::encode(&user).unwrap()).await.unwrap();

        submit(&kv, "u1", &request("$500")).await.unwrap();
        submit(&kv, "orphan", &request("$800")).await.unwrap();

        let rows = list_all(&kv).await.unwrap();
        assert_eq!(rows.len(), 2);

        let known = rows.iter().find(|r| r.project.user_id == "u1").unwrap();
        assert_eq!(known.username, "client");
        assert_eq!(known.user_email, "client@example.com");

        let orphan = rows.iter().find(|r| r.project.user_id == "orphan").unwrap();
        assert_eq!(orphan.username, "Unknown");
    }
}
