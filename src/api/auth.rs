use crate::database::MongoKv;
use crate::services::identity_service::{self, Claims, LoginRequest, SignupRequest, SignupResponse};
use crate::services::{identity_gate, ActivityTracker};
use actix_web::{web, HttpResponse};

#[utoipa::path(
    post,
    path = "/api/v1/signup",
    tag = "Auth",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created", body = crate::services::identity_service::SignupResponse),
        (status = 400, description = "Missing fields or username/email already taken")
    )
)]
pub async fn signup(
    kv: web::Data<MongoKv>,
    request: web::Json<SignupRequest>,
) -> HttpResponse {
    log::info!("📝 POST /signup - username: {}", request.username);

    match identity_service::signup(kv.get_ref(), &request).await {
        Ok(user) => HttpResponse::Created().json(SignupResponse {
            success: true,
            message: "User created successfully".to_string(),
            user_id: user.id,
        }),
        Err(e) => {
            log::warn!("❌ Signup failed: {} - {}", request.username, e);
            e.to_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = crate::services::identity_service::AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    kv: web::Data<MongoKv>,
    request: web::Json<LoginRequest>,
) -> HttpResponse {
    log::info!("🔐 POST /login - email: {}", request.email);

    match identity_service::login(kv.get_ref(), &request).await {
        Ok(response) => {
            log::info!("✅ Login successful: {}", request.email);
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log::warn!("❌ Login failed: {} - {}", request.email, e);
            e.to_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/user",
    tag = "Auth",
    responses(
        (status = 200, description = "Current user profile", body = crate::models::User),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Profile record missing")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_me(
    user: web::ReqData<Claims>,
    kv: web::Data<MongoKv>,
    tracker: web::Data<ActivityTracker>,
) -> HttpResponse {
    log::info!("👤 GET /user - {}", user.sub);

    // Profile fetches are the opportunistic activity signal.
    tracker.touch(&user.sub);

    match identity_gate::require_user(kv.get_ref(), &user.sub).await {
        Ok(profile) => HttpResponse::Ok().json(serde_json::json!({ "user": profile })),
        Err(e) => {
            log::warn!("❌ Failed to load user {}: {}", user.sub, e);
            e.to_response()
        }
    }
}
