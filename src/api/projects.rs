use crate::database::MongoKv;
use crate::services::identity_service::Claims;
use crate::services::project_service::{self, SubmitProjectRequest};
use actix_web::{web, HttpResponse};

#[utoipa::path(
    post,
    path = "/api/v1/projects",
    tag = "Projects",
    request_body = SubmitProjectRequest,
    responses(
        (status = 201, description = "Project submitted", body = crate::models::Project),
        (status = 400, description = "Missing field"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn submit_project(
    user: web::ReqData<Claims>,
    kv: web::Data<MongoKv>,
    request: web::Json<SubmitProjectRequest>,
) -> HttpResponse {
    log::info!("📝 POST /projects - user {}", user.sub);

    match project_service::submit(kv.get_ref(), &user.sub, &request).await {
        Ok(project) => HttpResponse::Created().json(serde_json::json!({
            "success": true,
            "message": "Project submitted successfully",
            "project": project,
        })),
        Err(e) => {
            log::warn!("❌ Project submission failed for {}: {}", user.sub, e);
            e.to_response()
        }
    }
}

pub async fn get_my_projects(
    user: web::ReqData<Claims>,
    kv: web::Data<MongoKv>,
) -> HttpResponse {
    log::info!("📋 GET /projects/my - user {}", user.sub);

    match project_service::list_mine(kv.get_ref(), &user.sub).await {
        Ok(projects) => HttpResponse::Ok().json(serde_json::json!({ "projects": projects })),
        Err(e) => {
            log::error!("❌ Failed to list projects for {}: {}", user.sub, e);
            e.to_response()
        }
    }
}

pub async fn request_new_developer(
    user: web::ReqData<Claims>,
    kv: web::Data<MongoKv>,
    project_id: web::Path<String>,
) -> HttpResponse {
    log::info!("🔄 POST /projects/{}/request-new-developer - user {}", project_id, user.sub);

    match project_service::request_reassignment(kv.get_ref(), &user.sub, &project_id).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Request sent to admin",
        })),
        Err(e) => {
            log::warn!("❌ Reassignment request failed on {}: {}", project_id, e);
            e.to_response()
        }
    }
}
