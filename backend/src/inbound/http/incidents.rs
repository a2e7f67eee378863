//! Incident webhook and status page handlers.
//!
//! ```text
//! POST /api/incident?api_token=<token>
//!      incidentdeviceid=7&incidenttype=Warning&incidentdate=2024-01-01&incidenttime=10:00&incidentdetails=low+disk
//! GET  /
//! ```

use actix_web::{HttpResponse, get, http::header, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::IncidentEvent;
use crate::domain::ports::ReportOutcome;
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::status_page;
use crate::inbound::http::validation::{FieldName, parse_device_id, require_field};
use crate::middleware::RequireApiToken;

const DEVICE_ID_FIELD: FieldName = FieldName::new("incidentdeviceid");
const TYPE_FIELD: FieldName = FieldName::new("incidenttype");
const DATE_FIELD: FieldName = FieldName::new("incidentdate");
const TIME_FIELD: FieldName = FieldName::new("incidenttime");
const DETAILS_FIELD: FieldName = FieldName::new("incidentdetails");

const CREATED_MESSAGE: &str = "Incident created successfully";
const DELETED_MESSAGE: &str = "Incident deleted successfully";

/// Form body posted by monitoring probes.
///
/// Every field is optional at the serde level so that a missing field is
/// reported with its name instead of a generic decode failure.
#[derive(Debug, Deserialize)]
pub struct IncidentForm {
    pub incidentdeviceid: Option<String>,
    pub incidenttype: Option<String>,
    pub incidentdate: Option<String>,
    pub incidenttime: Option<String>,
    pub incidentdetails: Option<String>,
}

impl TryFrom<IncidentForm> for IncidentEvent {
    type Error = crate::domain::Error;

    fn try_from(form: IncidentForm) -> Result<Self, Self::Error> {
        Ok(Self {
            device_id: parse_device_id(form.incidentdeviceid, DEVICE_ID_FIELD)?,
            incident_type: require_field(form.incidenttype, TYPE_FIELD)?,
            date: require_field(form.incidentdate, DATE_FIELD)?,
            time: require_field(form.incidenttime, TIME_FIELD)?,
            details: require_field(form.incidentdetails, DETAILS_FIELD)?,
        })
    }
}

/// Success body for the webhook.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportResponse {
    pub message: String,
}

impl From<ReportOutcome> for ReportResponse {
    fn from(outcome: ReportOutcome) -> Self {
        let message = match outcome {
            ReportOutcome::Opened | ReportOutcome::Updated => CREATED_MESSAGE,
            ReportOutcome::Closed { .. } => DELETED_MESSAGE,
        };
        Self {
            message: message.to_owned(),
        }
    }
}

/// Form extractor configuration mapping undecodable bodies to 400.
pub fn form_config() -> web::FormConfig {
    web::FormConfig::default().error_handler(|err, _req| {
        crate::domain::Error::invalid_request(err.to_string()).into()
    })
}

/// Receive a probe event and reconcile it against the incident store.
#[post("/incident")]
pub async fn report_incident(
    state: web::Data<HttpState>,
    form: web::Form<IncidentForm>,
) -> ApiResult<web::Json<ReportResponse>> {
    let event = IncidentEvent::try_from(form.into_inner())?;
    let outcome = state.incidents.report(event).await?;
    Ok(web::Json(ReportResponse::from(outcome)))
}

/// Render every open incident as HTML.
#[get("/")]
pub async fn incident_page(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let incidents = state.incidents_query.open_incidents().await?;
    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, "text/html; charset=utf-8"))
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .body(status_page::render(&state.page_title, &incidents)))
}

/// Register the status page and the token-guarded webhook scope.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use incident_board::inbound::http::incidents::configure;
///
/// let app = App::new().configure(|cfg| configure(cfg, "secret"));
/// ```
pub fn configure(cfg: &mut web::ServiceConfig, api_token: &str) {
    cfg.service(incident_page).service(
        web::scope("/api")
            .wrap(RequireApiToken::new(api_token))
            .app_data(form_config())
            .service(report_incident),
    );
}
