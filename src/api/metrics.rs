use actix_web::HttpResponse;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

static REQUEST_COUNT: AtomicU64 = AtomicU64::new(0);
static ERROR_COUNT: AtomicU64 = AtomicU64::new(0);
static STARTED_AT: AtomicI64 = AtomicI64::new(0);

pub fn mark_started() {
    STARTED_AT.store(chrono::Utc::now().timestamp(), Ordering::Relaxed);
}

pub fn increment_request_count() {
    REQUEST_COUNT.fetch_add(1, Ordering::Relaxed);
}

pub fn increment_error_count() {
    ERROR_COUNT.fetch_add(1, Ordering::Relaxed);
}

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Health",
    responses(
        (status = 200, description = "Prometheus text metrics")
    )
)]
pub async fn get_metrics() -> HttpResponse {
    let requests = REQUEST_COUNT.load(Ordering::Relaxed);
    let errors = ERROR_COUNT.load(Ordering::Relaxed);
    let started = STARTED_AT.load(Ordering::Relaxed);
    let uptime = if started > 0 {
        chrono::Utc::now().timestamp() - started
    } else {
        0
    };

    let metrics = format!(
        "# HELP http_requests_total Total number of HTTP requests\n\
         # TYPE http_requests_total counter\n\
         http_requests_total {}\n\
         \n\
         # HELP http_errors_total Total number of HTTP 5xx responses\n\
         # TYPE http_errors_total counter\n\
         http_errors_total {}\n\
         \n\
         # HELP process_uptime_seconds Seconds since the service started\n\
         # TYPE process_uptime_seconds gauge\n\
         process_uptime_seconds {}\n",
        requests, errors, uptime
    );

    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(metrics)
}
