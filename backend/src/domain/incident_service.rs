//! Incident service implementing the command and query driving ports.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{error, info};

use crate::domain::ports::{
    IncidentCommand, IncidentQuery, IncidentRepository, IncidentRepositoryError, ReportOutcome,
    UpsertOutcome,
};
use crate::domain::{Error, Incident, IncidentEvent, Reconciliation, reconcile};

/// Applies [`reconcile`] decisions to an [`IncidentRepository`].
#[derive(Clone)]
pub struct IncidentService<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> IncidentService<R> {
    /// Create a service over `repository`, stamping lifecycle times from `clock`.
    ///
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use incident_board::domain::IncidentService;
    /// # use incident_board::domain::ports::InMemoryIncidentRepository;
    /// # use mockable::DefaultClock;
    /// let service = IncidentService::new(
    ///     Arc::new(InMemoryIncidentRepository::new()),
    ///     Arc::new(DefaultClock),
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }
}

fn map_repository_error(err: IncidentRepositoryError) -> Error {
    error!(error = %err, "incident store failure");
    match err {
        IncidentRepositoryError::Connection { message }
        | IncidentRepositoryError::Query { message } => Error::storage(message),
    }
}

#[async_trait]
impl<R> IncidentCommand for IncidentService<R>
where
    R: IncidentRepository,
{
    async fn report(&self, event: IncidentEvent) -> Result<ReportOutcome, Error> {
        let now = self.clock.utc();
        match reconcile(event)? {
            Reconciliation::Open(incident) => {
                let outcome = self
                    .repository
                    .upsert_open(&incident, now)
                    .await
                    .map_err(map_repository_error)?;
                info!(
                    device_id = %incident.device_id,
                    incident_type = %incident.incident_type,
                    ?outcome,
                    "incident recorded"
                );
                Ok(match outcome {
                    UpsertOutcome::Inserted => ReportOutcome::Opened,
                    UpsertOutcome::Updated => ReportOutcome::Updated,
                })
            }
            Reconciliation::Close(device_id) => {
                // A recovery report always succeeds; a failed close only logs.
                let existed = match self.repository.close(device_id, now).await {
                    Ok(existed) => existed,
                    Err(err) => {
                        error!(%device_id, error = %err, "failed to close incident");
                        false
                    }
                };
                info!(%device_id, existed, "incident closed");
                Ok(ReportOutcome::Closed { existed })
            }
        }
    }
}

#[async_trait]
impl<R> IncidentQuery for IncidentService<R>
where
    R: IncidentRepository,
{
    async fn open_incidents(&self) -> Result<Vec<Incident>, Error> {
        self.repository
            .list_open()
            .await
            .map_err(map_repository_error)
    }
}
