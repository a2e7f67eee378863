//! End-to-end tests for the webhook and status page over a SQLite store.
//!
//! The app is wired the way the server wires it: `Trace` at the top, the
//! status page, the token-guarded webhook scope, and a Diesel repository
//! behind `IncidentService`.

#[path = "support/sqlite.rs"]
mod sqlite;

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use incident_board::Trace;
use incident_board::domain::{IncidentService, TRACE_ID_HEADER};
use incident_board::inbound::http::health::{HealthState, live, ready};
use incident_board::inbound::http::incidents::{ReportResponse, configure};
use incident_board::inbound::http::state::HttpState;
use incident_board::outbound::persistence::DieselIncidentRepository;
use mockable::DefaultClock;
use rstest::rstest;
use sqlite::{TestDatabase, migrated_database};

const TOKEN: &str = "probe-secret";

async fn init_app(
    db: &TestDatabase,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    let repository = Arc::new(DieselIncidentRepository::new(db.pool.clone()));
    let service = Arc::new(IncidentService::new(
        repository.clone(),
        Arc::new(DefaultClock),
    ));
    let state = HttpState::new(service.clone(), service, "Probe Status");
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .app_data(web::Data::new(HealthState::new(repository)))
            .wrap(Trace)
            .configure(|cfg| configure(cfg, TOKEN))
            .service(ready)
            .service(live),
    )
    .await
}

fn report(token: Option<&str>, device: u64, incident_type: &str, details: &str) -> Request {
    let uri = match token {
        Some(token) => format!("/api/incident?api_token={token}"),
        None => "/api/incident".to_owned(),
    };
    TestRequest::post()
        .uri(&uri)
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload(format!(
            "incidentdeviceid={device}&incidenttype={incident_type}&incidentdate=2024-01-01\
             &incidenttime=10:00&incidentdetails={details}"
        ))
        .to_request()
}

async fn page<S>(app: &S) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let body = test::call_and_read_body(app, TestRequest::get().uri("/").to_request()).await;
    String::from_utf8(body.to_vec()).expect("utf8 page")
}

#[actix_web::test]
async fn warning_is_listed_until_ok_arrives() {
    let db = migrated_database().await;
    let app = init_app(&db).await;

    let res = test::call_service(&app, report(Some(TOKEN), 7, "Warning", "low+disk")).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key(TRACE_ID_HEADER));
    let body: ReportResponse = test::read_body_json(res).await;
    assert_eq!(body.message, "Incident created successfully");

    let listed = page(&app).await;
    assert!(listed.contains("<title>Probe Status</title>"));
    assert!(listed.contains("<td>7</td><td>Warning</td><td>2024-01-01</td>"));
    assert!(listed.contains("low disk"));

    let res = test::call_service(&app, report(Some(TOKEN), 7, "OK", "fine")).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: ReportResponse = test::read_body_json(res).await;
    assert_eq!(body.message, "Incident deleted successfully");

    let listed = page(&app).await;
    assert!(!listed.contains("<td>7</td>"));
}

#[actix_web::test]
async fn escalation_keeps_the_first_details() {
    let db = migrated_database().await;
    let app = init_app(&db).await;

    test::call_service(&app, report(Some(TOKEN), 7, "Warnung", "first")).await;
    let res = test::call_service(&app, report(Some(TOKEN), 7, "Error", "second")).await;
    assert_eq!(res.status(), StatusCode::OK);

    let listed = page(&app).await;
    assert!(listed.contains("<td>7</td><td>Error</td>"));
    assert!(listed.contains("first"));
    assert!(!listed.contains("second"));
    assert_eq!(listed.matches("<td>7</td>").count(), 1);
}

#[rstest]
#[case(None, "API token required")]
#[case(Some("wrong"), "Invalid API Token")]
#[actix_web::test]
async fn unauthenticated_reports_change_nothing(
    #[case] token: Option<&str>,
    #[case] message: &str,
) {
    let db = migrated_database().await;
    let app = init_app(&db).await;

    let res = test::call_service(&app, report(token, 7, "Error", "x")).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["error"], message);
    assert!(page(&app).await.contains("No open incidents."));
}

#[actix_web::test]
async fn unknown_types_are_rejected_without_side_effects() {
    let db = migrated_database().await;
    let app = init_app(&db).await;
    test::call_service(&app, report(Some(TOKEN), 7, "Warning", "kept")).await;

    let res = test::call_service(&app, report(Some(TOKEN), 7, "Exploded", "x")).await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["error"], "Unknown incident type Exploded");
    let listed = page(&app).await;
    assert!(listed.contains("<td>7</td><td>Warning</td>"));
}

#[actix_web::test]
async fn concurrent_reports_for_different_devices_all_succeed() {
    let db = migrated_database().await;
    let app = init_app(&db).await;

    let responses = futures_util::future::join_all(
        (1..=8).map(|device| test::call_service(&app, report(Some(TOKEN), device, "Error", "x"))),
    )
    .await;

    assert!(responses.iter().all(|res| res.status() == StatusCode::OK));
    let listed = page(&app).await;
    assert_eq!(listed.matches("<td>Error</td>").count(), 8);
}

#[actix_web::test]
async fn readiness_follows_the_database() {
    let db = migrated_database().await;
    let app = init_app(&db).await;
    let get = |uri: &str| TestRequest::get().uri(uri).to_request();

    assert_eq!(test::call_service(&app, get("/health/ready")).await.status(), StatusCode::OK);

    {
        use diesel::prelude::*;
        let mut conn = diesel::sqlite::SqliteConnection::establish(&db.url).expect("open");
        diesel::sql_query("DROP TABLE incidents")
            .execute(&mut conn)
            .expect("drop table");
    }

    assert_eq!(
        test::call_service(&app, get("/health/ready")).await.status(),
        StatusCode::SERVICE_UNAVAILABLE
    );
    assert_eq!(test::call_service(&app, get("/health/live")).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn page_reports_storage_failures() {
    let db = migrated_database().await;
    let app = init_app(&db).await;
    {
        use diesel::prelude::*;
        let mut conn = diesel::sqlite::SqliteConnection::establish(&db.url).expect("open");
        diesel::sql_query("DROP TABLE incidents")
            .execute(&mut conn)
            .expect("drop table");
    }

    let res = test::call_service(&app, TestRequest::get().uri("/").to_request()).await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert!(
        body["error"]
            .as_str()
            .is_some_and(|message| message.contains("no such table"))
    );
}
