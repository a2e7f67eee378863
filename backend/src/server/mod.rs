//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;

use incident_board::Trace;
use incident_board::domain::IncidentService;
use incident_board::inbound::http::health::{HealthState, live, ready};
use incident_board::inbound::http::incidents;
use incident_board::inbound::http::state::HttpState;
use incident_board::outbound::persistence::{DbPool, DieselIncidentRepository};

fn build_states(db_pool: DbPool, page_title: String) -> (HttpState, HealthState) {
    let repository = Arc::new(DieselIncidentRepository::new(db_pool));
    let service = Arc::new(IncidentService::new(
        repository.clone(),
        Arc::new(DefaultClock),
    ));
    (
        HttpState::new(service.clone(), service, page_title),
        HealthState::new(repository),
    )
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    api_token: Arc<str>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        api_token,
    } = deps;

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .configure(|cfg| incidents::configure(cfg, &api_token))
        .service(ready)
        .service(live)
}

/// Construct an Actix HTTP server over the migrated database in `config`.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(config: ServerConfig) -> std::io::Result<Server> {
    let ServerConfig {
        bind_addr,
        api_token,
        page_title,
        db_pool,
    } = config;
    let (http_state, health_state) = build_states(db_pool, page_title);
    let http_state = web::Data::new(http_state);
    let health_state = web::Data::new(health_state);
    let api_token: Arc<str> = Arc::from(api_token);

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: health_state.clone(),
            http_state: http_state.clone(),
            api_token: api_token.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    Ok(server)
}
