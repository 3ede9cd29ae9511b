use crate::database::MongoKv;
use crate::services::system_service;
use actix_web::{web, HttpRequest, HttpResponse};

/// POST /api/v1/initialize - one-time bootstrap, idempotent after the first
/// call. Unauthenticated: it only ever seeds fixed defaults.
pub async fn initialize(kv: web::Data<MongoKv>) -> HttpResponse {
    log::info!("🚀 POST /initialize");

    match system_service::initialize(kv.get_ref()).await {
        Ok(true) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "System initialized successfully",
        })),
        Ok(false) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "System already initialized",
        })),
        Err(e) => {
            log::error!("❌ Initialization failed: {}", e);
            e.to_response()
        }
    }
}

/// POST /api/v1/make-admin/{userId} - bootstrap path for the first admin.
/// Requires the `X-Admin-Setup-Key` header to match `ADMIN_SETUP_KEY`;
/// without the variable configured the endpoint is disabled.
pub async fn make_admin(
    req: HttpRequest,
    kv: web::Data<MongoKv>,
    user_id: web::Path<String>,
) -> HttpResponse {
    log::info!("🔑 POST /make-admin/{}", user_id);

    let expected = match std::env::var("ADMIN_SETUP_KEY") {
        Ok(key) if !key.is_empty() => key,
        _ => {
            log::warn!("❌ make-admin called but ADMIN_SETUP_KEY is not configured");
            return HttpResponse::Forbidden().json(serde_json::json!({
                "success": false,
                "error": "Admin setup is disabled",
            }));
        }
    };

    let supplied = req
        .headers()
        .get("X-Admin-Setup-Key")
        .and_then(|v| v.to_str().ok());

    if supplied != Some(expected.as_str()) {
        log::warn!("❌ make-admin rejected: bad setup key for {}", user_id);
        return HttpResponse::Forbidden().json(serde_json::json!({
            "success": false,
            "error": "Invalid setup key",
        }));
    }

    match system_service::make_admin(kv.get_ref(), &user_id).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "User is now an admin",
        })),
        Err(e) => {
            log::warn!("❌ make-admin failed for {}: {}", user_id, e);
            e.to_response()
        }
    }
}
