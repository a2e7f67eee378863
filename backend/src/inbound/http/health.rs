//! Liveness and readiness probes.
//!
//! Liveness only proves the worker answers. Readiness asks the incident
//! store for a connection and a trivial read, so a locked, missing or
//! unmigrated database takes the instance out of rotation.

use std::sync::Arc;

use actix_web::{HttpResponse, get, http::header, web};
use tracing::warn;

use crate::domain::ports::StoreHealth;

/// Dependencies of the health endpoints.
#[derive(Clone)]
pub struct HealthState {
    store: Arc<dyn StoreHealth>,
}

impl HealthState {
    /// Probe readiness through `store`.
    pub fn new(store: Arc<dyn StoreHealth>) -> Self {
        Self { store }
    }

    /// Whether the incident store currently answers queries.
    pub async fn is_ready(&self) -> bool {
        match self.store.check().await {
            Ok(()) => true,
            Err(error) => {
                warn!(%error, "readiness check failed");
                false
            }
        }
    }
}

fn probe_response(probe_ok: bool) -> HttpResponse {
    let mut response = if probe_ok {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };

    response
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .finish()
}

/// Readiness probe: 200 while the incident store answers, 503 otherwise.
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    probe_response(state.is_ready().await)
}

/// Liveness probe: 200 whenever a worker can answer.
#[get("/health/live")]
pub async fn live() -> HttpResponse {
    probe_response(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{IncidentRepositoryError, MockStoreHealth};
    use actix_web::{App, http::StatusCode, test as actix_test};
    use rstest::rstest;

    fn store(result: Result<(), IncidentRepositoryError>) -> Arc<dyn StoreHealth> {
        let mut store = MockStoreHealth::new();
        store.expect_check().returning(move || result.clone());
        Arc::new(store)
    }

    #[rstest]
    #[case(Ok(()), "/health/ready", StatusCode::OK)]
    #[case(
        Err(IncidentRepositoryError::query("no such table: incidents")),
        "/health/ready",
        StatusCode::SERVICE_UNAVAILABLE
    )]
    #[case(
        Err(IncidentRepositoryError::connection("timed out")),
        "/health/ready",
        StatusCode::SERVICE_UNAVAILABLE
    )]
    #[case(
        Err(IncidentRepositoryError::connection("timed out")),
        "/health/live",
        StatusCode::OK
    )]
    #[actix_web::test]
    async fn probes_reflect_the_store(
        #[case] check: Result<(), IncidentRepositoryError>,
        #[case] uri: &str,
        #[case] expected: StatusCode,
    ) {
        let state = web::Data::new(HealthState::new(store(check)));
        let app =
            actix_test::init_service(App::new().app_data(state).service(ready).service(live))
                .await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri(uri).to_request(),
        )
        .await;

        assert_eq!(res.status(), expected);
        assert_eq!(
            res.headers()
                .get(header::CACHE_CONTROL)
                .and_then(|value| value.to_str().ok()),
            Some("no-store")
        );
    }
}
