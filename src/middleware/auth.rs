use crate::services::identity_service;
use crate::utils::AppError;
use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};

/// Bearer-token gate for protected scopes. Validates the JWT and injects
/// the verified `Claims` into request extensions, where handlers pick them
/// up via `web::ReqData<Claims>`.
///
/// Rejections answer with the same `{"success": false, "error": msg}`
/// envelope the handlers produce, so clients see one 401 shape.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

fn unauthorized<B>(req: ServiceRequest, error: AppError) -> ServiceResponse<EitherBody<B>> {
    let (req, _) = req.into_parts();
    let res = error.to_response();
    ServiceResponse::new(req, res).map_into_right_body()
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let token = req
            .headers()
            .get("Authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|header| header.strip_prefix("Bearer "))
            .map(str::to_owned);

        let token = match token {
            Some(token) => token,
            None => {
                let res = unauthorized(
                    req,
                    AppError::Unauthorized("No access token provided".to_string()),
                );
                return Box::pin(async move { Ok(res) });
            }
        };

        match identity_service::verify_token(&token) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                let fut = self.service.call(req);
                Box::pin(async move {
                    let res = fut.await?;
                    Ok(res.map_into_left_body())
                })
            }
            Err(e) => {
                log::warn!("❌ Rejected bearer token: {}", e);
                let res = unauthorized(req, e);
                Box::pin(async move { Ok(res) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App, HttpResponse};

    async fn protected() -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    macro_rules! guarded_app {
        () => {
            test::init_service(App::new().service(
                web::scope("/protected")
                    .wrap(AuthMiddleware)
                    .route("", web::get().to(protected)),
            ))
            .await
        };
    }

    #[actix_web::test]
    async fn missing_token_gets_the_json_envelope() {
        let app = guarded_app!();

        let req = test::TestRequest::get().uri("/protected").to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["success"], serde_json::json!(false));
        assert_eq!(body["error"], serde_json::json!("No access token provided"));
    }

    #[actix_web::test]
    async fn malformed_bearer_token_gets_the_json_envelope() {
        let app = guarded_app!();

        let req = test::TestRequest::get()
            .uri("/protected")
            .insert_header(("Authorization", "Bearer not-a-jwt"))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["success"], serde_json::json!(false));
        assert_eq!(body["error"], serde_json::json!("Invalid or expired token"));
    }

    #[actix_web::test]
    async fn non_bearer_scheme_is_rejected() {
        let app = guarded_app!();

        let req = test::TestRequest::get()
            .uri("/protected")
            .insert_header(("Authorization", "Basic dXNlcjpwdw=="))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["error"], serde_json::json!("No access token provided"));
    }
}
