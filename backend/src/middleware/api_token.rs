//! Shared-secret guard for the webhook scope.
//!
//! Probes authenticate with an `api_token` query parameter compared by exact
//! match against the configured token. Rejected requests are answered with
//! 401 here and never reach the wrapped handler.

use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, ResponseError, web};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use serde::Deserialize;
use tracing::warn;

use crate::domain::Error as DomainError;

const TOKEN_REQUIRED: &str = "API token required";
const TOKEN_INVALID: &str = "Invalid API Token";

#[derive(Debug, Default, Deserialize)]
struct TokenQuery {
    api_token: Option<String>,
}

/// Check the request's query string against `expected`.
///
/// An absent, empty or unparsable parameter counts as missing.
fn authorise(query_string: &str, expected: &str) -> Result<(), DomainError> {
    let supplied = web::Query::<TokenQuery>::from_query(query_string)
        .map(web::Query::into_inner)
        .unwrap_or_default()
        .api_token
        .filter(|token| !token.is_empty());

    match supplied {
        None => Err(DomainError::unauthorized(TOKEN_REQUIRED)),
        Some(token) if token == expected => Ok(()),
        Some(_) => Err(DomainError::unauthorized(TOKEN_INVALID)),
    }
}

/// Middleware rejecting requests without the configured API token.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use incident_board::middleware::RequireApiToken;
///
/// let app = App::new().service(web::scope("/api").wrap(RequireApiToken::new("secret")));
/// ```
#[derive(Clone)]
pub struct RequireApiToken {
    token: Arc<str>,
}

impl RequireApiToken {
    /// Guard requests with `token`.
    pub fn new(token: impl Into<Arc<str>>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireApiToken
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireApiTokenMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireApiTokenMiddleware {
            service: Rc::new(service),
            token: Arc::clone(&self.token),
        }))
    }
}

/// Service wrapper produced by [`RequireApiToken`].
pub struct RequireApiTokenMiddleware<S> {
    service: Rc<S>,
    token: Arc<str>,
}

impl<S, B> Service<ServiceRequest> for RequireApiTokenMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match authorise(req.query_string(), &self.token) {
            Ok(()) => {
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_boxed_body) })
            }
            Err(error) => {
                warn!(path = %req.path(), reason = error.message(), "rejected unauthenticated request");
                let response = error.error_response();
                Box::pin(async move { Ok(req.into_response(response)) })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test as actix_test};
    use rstest::rstest;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[rstest]
    #[case("", Some(TOKEN_REQUIRED))]
    #[case("api_token=", Some(TOKEN_REQUIRED))]
    #[case("other=secret", Some(TOKEN_REQUIRED))]
    #[case("api_token=wrong", Some(TOKEN_INVALID))]
    #[case("api_token=Secret", Some(TOKEN_INVALID))]
    #[case("api_token=secret", None)]
    #[case("x=1&api_token=secret", None)]
    fn authorise_matches_the_token_exactly(#[case] query: &str, #[case] rejection: Option<&str>) {
        let result = authorise(query, "secret");
        match rejection {
            None => assert!(result.is_ok()),
            Some(message) => {
                let err = result.expect_err("request is rejected");
                assert_eq!(err.message(), message);
            }
        }
    }

    #[rstest]
    #[case("/api/ping", StatusCode::UNAUTHORIZED, 0)]
    #[case("/api/ping?api_token=nope", StatusCode::UNAUTHORIZED, 0)]
    #[case("/api/ping?api_token=secret", StatusCode::OK, 1)]
    #[actix_web::test]
    async fn handler_only_runs_for_the_right_token(
        #[case] uri: &str,
        #[case] expected: StatusCode,
        #[case] calls: usize,
    ) {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let app = actix_test::init_service(
            App::new().service(
                web::scope("/api")
                    .wrap(RequireApiToken::new("secret"))
                    .route(
                        "/ping",
                        web::get().to(move || {
                            let counter = Arc::clone(&counter);
                            async move {
                                counter.fetch_add(1, Ordering::SeqCst);
                                HttpResponse::Ok().finish()
                            }
                        }),
                    ),
            ),
        )
        .await;

        let req = actix_test::TestRequest::get().uri(uri).to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), expected);
        assert_eq!(hits.load(Ordering::SeqCst), calls);
    }

    #[actix_web::test]
    async fn rejection_body_names_the_problem() {
        let app = actix_test::init_service(
            App::new().service(
                web::scope("/api")
                    .wrap(RequireApiToken::new("secret"))
                    .route("/ping", web::get().to(|| async { HttpResponse::Ok().finish() })),
            ),
        )
        .await;

        let req = actix_test::TestRequest::get().uri("/api/ping").to_request();
        let res = actix_test::call_service(&app, req).await;
        let body: serde_json::Value = actix_test::read_body_json(res).await;

        assert_eq!(body, serde_json::json!({ "error": "API token required" }));
    }
}
