use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Marketplace Service API",
        version = "1.0.0",
        description = "Marketplace-matching backend: clients submit project requests, administrators review them and assign developers, and the analytics endpoint feeds the dashboard.\n\n**Authentication:** most endpoints require a JWT Bearer token.",
    ),
    paths(
        // Auth
        crate::api::auth::signup,
        crate::api::auth::login,
        crate::api::auth::get_me,

        // Projects
        crate::api::projects::submit_project,

        // Admin
        crate::api::admin::update_project,
        crate::api::admin::get_analytics,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,
    ),
    components(
        schemas(
            // Auth
            crate::services::identity_service::SignupRequest,
            crate::services::identity_service::LoginRequest,
            crate::services::identity_service::SignupResponse,
            crate::services::identity_service::AuthResponse,

            // Entities
            crate::models::User,
            crate::models::UserSummary,
            crate::models::Project,
            crate::models::ProjectStatus,
            crate::models::ProjectWithUser,
            crate::models::Developer,
            crate::models::AnalyticsSnapshot,

            // Requests
            crate::services::project_service::SubmitProjectRequest,
            crate::services::project_service::UpdateProjectStatusRequest,
            crate::services::developer_service::AddDeveloperRequest,

            // Health
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Signup, login, and current-user endpoints."),
        (name = "Projects", description = "Client project submission and tracking."),
        (name = "Admin", description = "Review queue, developer roster, and analytics. Admin flag required."),
        (name = "Health", description = "Health check and metrics for monitoring."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Enter your JWT token"))
                        .build(),
                ),
            );
        }
    }
}
