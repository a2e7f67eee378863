//! Port abstraction for the incident store.
//!
//! The store holds at most one live row per device. Closed incidents are
//! soft-deleted: adapters stamp `deleted_at` instead of purging the row.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{DeviceId, Incident, NewIncident};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by incident repository adapters.
    pub enum IncidentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "incident store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "incident store query failed: {message}",
    }
}

/// What an upsert did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No live incident existed; a new row was inserted.
    Inserted,
    /// A live incident existed; only its type and `updated_at` changed.
    Updated,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IncidentRepository: Send + Sync {
    /// Insert `incident`, or refresh the type of the device's live incident.
    ///
    /// On conflict, date, time and details of `incident` are discarded.
    async fn upsert_open(
        &self,
        incident: &NewIncident,
        at: DateTime<Utc>,
    ) -> Result<UpsertOutcome, IncidentRepositoryError>;

    /// Soft-delete the device's live incident. Returns whether one existed.
    async fn close(
        &self,
        device_id: DeviceId,
        at: DateTime<Utc>,
    ) -> Result<bool, IncidentRepositoryError>;

    /// All live incidents, ordered by row id.
    async fn list_open(&self) -> Result<Vec<Incident>, IncidentRepositoryError>;
}

#[cfg(any(test, feature = "test-support"))]
pub use in_memory::InMemoryIncidentRepository;

#[cfg(any(test, feature = "test-support"))]
mod in_memory {
    use std::sync::{Mutex, MutexGuard};

    use super::*;
    use crate::domain::RecordMetadata;
    use crate::domain::ports::StoreHealth;

    #[derive(Debug, Default)]
    struct Table {
        rows: Vec<Incident>,
        next_id: i64,
    }

    /// In-memory incident store with the same semantics as the Diesel adapter.
    ///
    /// Closed rows stay in the table, so [`Self::all_rows`] exposes history.
    #[derive(Debug, Default)]
    pub struct InMemoryIncidentRepository {
        table: Mutex<Table>,
    }

    impl InMemoryIncidentRepository {
        /// Create an empty store.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Every row, live or closed, in insertion order.
        #[must_use]
        pub fn all_rows(&self) -> Vec<Incident> {
            self.lock().map(|table| table.rows.clone()).unwrap_or_default()
        }

        fn lock(&self) -> Result<MutexGuard<'_, Table>, IncidentRepositoryError> {
            self.table
                .lock()
                .map_err(|_| IncidentRepositoryError::connection("in-memory store poisoned"))
        }
    }

    #[async_trait]
    impl IncidentRepository for InMemoryIncidentRepository {
        async fn upsert_open(
            &self,
            incident: &NewIncident,
            at: DateTime<Utc>,
        ) -> Result<UpsertOutcome, IncidentRepositoryError> {
            let mut table = self.lock()?;
            if let Some(row) = table
                .rows
                .iter_mut()
                .find(|row| row.device_id == incident.device_id && row.metadata.is_live())
            {
                row.incident_type = incident.incident_type;
                row.metadata.updated_at = at;
                return Ok(UpsertOutcome::Updated);
            }

            table.next_id += 1;
            let id = table.next_id;
            table.rows.push(Incident {
                id,
                device_id: incident.device_id,
                incident_type: incident.incident_type,
                date: incident.date.clone(),
                time: incident.time.clone(),
                details: incident.details.clone(),
                metadata: RecordMetadata::created(at),
            });
            Ok(UpsertOutcome::Inserted)
        }

        async fn close(
            &self,
            device_id: DeviceId,
            at: DateTime<Utc>,
        ) -> Result<bool, IncidentRepositoryError> {
            let mut table = self.lock()?;
            let live = table
                .rows
                .iter_mut()
                .find(|row| row.device_id == device_id && row.metadata.is_live());
            Ok(live.is_some_and(|row| {
                row.metadata.deleted_at = Some(at);
                row.metadata.updated_at = at;
                true
            }))
        }

        async fn list_open(&self) -> Result<Vec<Incident>, IncidentRepositoryError> {
            let table = self.lock()?;
            Ok(table
                .rows
                .iter()
                .filter(|row| row.metadata.is_live())
                .cloned()
                .collect())
        }
    }

    #[async_trait]
    impl StoreHealth for InMemoryIncidentRepository {
        async fn check(&self) -> Result<(), IncidentRepositoryError> {
            self.lock().map(drop)
        }
    }
}
