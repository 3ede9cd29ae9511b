use crate::database::MongoKv;
use crate::services::developer_service::{self, AddDeveloperRequest};
use crate::services::identity_service::Claims;
use crate::services::project_service::{self, UpdateProjectStatusRequest};
use crate::services::{analytics_service, identity_gate, ActivityTracker};
use actix_web::{web, HttpResponse};

pub async fn get_all_projects(
    user: web::ReqData<Claims>,
    kv: web::Data<MongoKv>,
) -> HttpResponse {
    log::info!("📋 GET /admin/projects - user {}", user.sub);

    if let Err(e) = identity_gate::require_admin(kv.get_ref(), &user.sub).await {
        return e.to_response();
    }

    match project_service::list_all(kv.get_ref()).await {
        Ok(projects) => HttpResponse::Ok().json(serde_json::json!({ "projects": projects })),
        Err(e) => {
            log::error!("❌ Failed to list all projects: {}", e);
            e.to_response()
        }
    }
}

#[utoipa::path(
    patch,
    path = "/api/v1/admin/projects/{id}",
    tag = "Admin",
    request_body = UpdateProjectStatusRequest,
    params(("id" = String, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project updated", body = crate::models::Project),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Project not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_project(
    user: web::ReqData<Claims>,
    kv: web::Data<MongoKv>,
    project_id: web::Path<String>,
    request: web::Json<UpdateProjectStatusRequest>,
) -> HttpResponse {
    log::info!("🔧 PATCH /admin/projects/{} - user {}", project_id, user.sub);

    if let Err(e) = identity_gate::require_admin(kv.get_ref(), &user.sub).await {
        return e.to_response();
    }

    match project_service::admin_update_status(kv.get_ref(), &project_id, &request).await {
        Ok(project) => {
            log::info!("✅ Project {} updated to {:?}", project.id, project.status);
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "message": "Project updated successfully",
                "project": project,
            }))
        }
        Err(e) => {
            log::warn!("❌ Project update failed on {}: {}", project_id, e);
            e.to_response()
        }
    }
}

pub async fn get_developers(
    user: web::ReqData<Claims>,
    kv: web::Data<MongoKv>,
) -> HttpResponse {
    log::info!("📋 GET /admin/developers - user {}", user.sub);

    if let Err(e) = identity_gate::require_admin(kv.get_ref(), &user.sub).await {
        return e.to_response();
    }

    match developer_service::list_all(kv.get_ref()).await {
        Ok(developers) => HttpResponse::Ok().json(serde_json::json!({ "developers": developers })),
        Err(e) => {
            log::error!("❌ Failed to list developers: {}", e);
            e.to_response()
        }
    }
}

pub async fn add_developer(
    user: web::ReqData<Claims>,
    kv: web::Data<MongoKv>,
    request: web::Json<AddDeveloperRequest>,
) -> HttpResponse {
    log::info!("➕ POST /admin/developers - user {}", user.sub);

    if let Err(e) = identity_gate::require_admin(kv.get_ref(), &user.sub).await {
        return e.to_response();
    }

    match developer_service::add(kv.get_ref(), &request).await {
        Ok(developer) => HttpResponse::Created().json(serde_json::json!({
            "success": true,
            "message": "Developer added successfully",
            "developer": developer,
        })),
        Err(e) => {
            log::warn!("❌ Failed to add developer: {}", e);
            e.to_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/analytics",
    tag = "Admin",
    responses(
        (status = 200, description = "Dashboard snapshot", body = crate::models::AnalyticsSnapshot),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_analytics(
    user: web::ReqData<Claims>,
    kv: web::Data<MongoKv>,
    tracker: web::Data<ActivityTracker>,
) -> HttpResponse {
    log::info!("📊 GET /admin/analytics - user {}", user.sub);

    if let Err(e) = identity_gate::require_admin(kv.get_ref(), &user.sub).await {
        return e.to_response();
    }

    match analytics_service::snapshot(kv.get_ref(), tracker.get_ref()).await {
        Ok(snapshot) => HttpResponse::Ok().json(snapshot),
        Err(e) => {
            log::error!("❌ Failed to compute analytics snapshot: {}", e);
            e.to_response()
        }
    }
}
