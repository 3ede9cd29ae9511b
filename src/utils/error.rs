use actix_web::HttpResponse;
use std::fmt;

/// Application error taxonomy. Every service returns `Result<T, AppError>`
/// and each handler maps the error to a response at its own boundary.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Database(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "{}", msg),
            AppError::Unauthorized(msg) => write!(f, "{}", msg),
            AppError::Forbidden(msg) => write!(f, "{}", msg),
            AppError::NotFound(msg) => write!(f, "{}", msg),
            AppError::Database(msg) => write!(f, "Database error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Maps the error to its HTTP response. 5xx bodies carry a generic
    /// message so store internals never leak to the caller.
    pub fn to_response(&self) -> HttpResponse {
        let body = |msg: &str| {
            serde_json::json!({
                "success": false,
                "error": msg,
            })
        };

        match self {
            AppError::Validation(msg) => HttpResponse::BadRequest().json(body(msg)),
            AppError::Unauthorized(msg) => HttpResponse::Unauthorized().json(body(msg)),
            AppError::Forbidden(msg) => HttpResponse::Forbidden().json(body(msg)),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(body(msg)),
            AppError::Database(_) | AppError::Internal(_) => {
                HttpResponse::InternalServerError().json(body("Internal server error"))
            }
        }
    }
}
