use crate::database::MongoKv;
use crate::services::developer_service;
use crate::services::identity_service::Claims;
use actix_web::{web, HttpResponse};

pub async fn get_developer(
    user: web::ReqData<Claims>,
    kv: web::Data<MongoKv>,
    developer_id: web::Path<String>,
) -> HttpResponse {
    log::info!("👷 GET /developers/{} - user {}", developer_id, user.sub);

    match developer_service::get(kv.get_ref(), &developer_id).await {
        Ok(developer) => HttpResponse::Ok().json(serde_json::json!({ "developer": developer })),
        Err(e) => {
            log::warn!("❌ Developer lookup failed for {}: {}", developer_id, e);
            e.to_response()
        }
    }
}
