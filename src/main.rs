mod api;
mod database;
mod middleware;
mod models;
mod seeds;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::dev::Service as _;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use services::ActivityTracker;
use std::env;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Get configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3002".to_string());
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    log::info!("🚀 Starting Marketplace Service...");
    log::info!("📊 Database: {}", database_url);

    // Initialize the key-value store (MongoDB backed)
    let kv = database::MongoKv::new(&database_url)
        .await
        .expect("Failed to connect to the key-value store");

    let kv_data = web::Data::new(kv);

    log::info!("✅ Key-value store connected");

    // Best-effort active-session tracker, process-local by design
    let tracker_data = web::Data::new(ActivityTracker::new());

    api::metrics::mark_started();

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(kv_data.clone())
            .app_data(tracker_data.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap_fn(|req, srv| {
                api::metrics::increment_request_count();
                let fut = srv.call(req);
                async move {
                    let res = fut.await?;
                    if res.status().is_server_error() {
                        api::metrics::increment_error_count();
                    }
                    Ok(res)
                }
            })
            // Swagger UI
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
            // Health check
            .route("/health", web::get().to(api::health::health_check))
            // Metrics
            .route("/metrics", web::get().to(api::metrics::get_metrics))
            // Public endpoints: account creation, login, bootstrap
            .service(
                web::scope("/api/v1")
                    .route("/signup", web::post().to(api::auth::signup))
                    .route("/login", web::post().to(api::auth::login))
                    .route("/initialize", web::post().to(api::system::initialize))
                    .route("/make-admin/{user_id}", web::post().to(api::system::make_admin))
                    // Authenticated user endpoints
                    .service(
                        web::scope("/user")
                            .wrap(middleware::AuthMiddleware)
                            .route("", web::get().to(api::auth::get_me)),
                    )
                    // Projects: submission and tracking - Requires JWT
                    .service(
                        web::scope("/projects")
                            .wrap(middleware::AuthMiddleware)
                            .route("", web::post().to(api::projects::submit_project))
                            .route("/my", web::get().to(api::projects::get_my_projects))
                            .route(
                                "/{id}/request-new-developer",
                                web::post().to(api::projects::request_new_developer),
                            ),
                    )
                    // Developer profiles - Requires JWT
                    .service(
                        web::scope("/developers")
                            .wrap(middleware::AuthMiddleware)
                            .route("/{id}", web::get().to(api::developers::get_developer)),
                    )
                    // Admin: review queue, roster, analytics - Requires JWT + admin flag
                    .service(
                        web::scope("/admin")
                            .wrap(middleware::AuthMiddleware)
                            .route("/projects", web::get().to(api::admin::get_all_projects))
                            .route("/projects/{id}", web::patch().to(api::admin::update_project))
                            .route("/developers", web::get().to(api::admin::get_developers))
                            .route("/developers", web::post().to(api::admin::add_developer))
                            .route("/analytics", web::get().to(api::admin::get_analytics)),
                    ),
            )
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
