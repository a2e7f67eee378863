//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{IncidentCommand, IncidentQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub incidents: Arc<dyn IncidentCommand>,
    pub incidents_query: Arc<dyn IncidentQuery>,
    /// Title rendered on the status page.
    pub page_title: String,
}

impl HttpState {
    /// Construct state from the incident ports and the page title.
    ///
    /// A single service usually implements both ports:
    ///
    /// ```
    /// # use std::sync::Arc;
    /// # use incident_board::domain::IncidentService;
    /// # use incident_board::domain::ports::InMemoryIncidentRepository;
    /// # use incident_board::inbound::http::state::HttpState;
    /// # use mockable::DefaultClock;
    /// let service = Arc::new(IncidentService::new(
    ///     Arc::new(InMemoryIncidentRepository::new()),
    ///     Arc::new(DefaultClock),
    /// ));
    /// let state = HttpState::new(service.clone(), service, "Incidents");
    /// assert_eq!(state.page_title, "Incidents");
    /// ```
    pub fn new(
        incidents: Arc<dyn IncidentCommand>,
        incidents_query: Arc<dyn IncidentQuery>,
        page_title: impl Into<String>,
    ) -> Self {
        Self {
            incidents,
            incidents_query,
            page_title: page_title.into(),
        }
    }
}
