//! SQLite-backed `IncidentRepository` implementation using Diesel ORM.
//!
//! The conflict rule is an explicit lookup inside a `BEGIN IMMEDIATE`
//! transaction: find the device's live row, then either refresh its type or
//! insert a new row. Taking the write lock up front makes concurrent writers
//! queue on `busy_timeout` instead of failing when they upgrade from a read
//! lock. The partial unique index on live rows backs the invariant.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{
    IncidentRepository, IncidentRepositoryError, StoreHealth, UpsertOutcome,
};
use crate::domain::{DeviceId, Incident, IncidentType, NewIncident, RecordMetadata};

use super::models::{IncidentClose, IncidentRow, IncidentTypeUpdate, NewIncidentRow};
use super::pool::{DbPool, PoolError};
use super::schema::incidents;

/// Diesel-backed implementation of the `IncidentRepository` port.
#[derive(Clone)]
pub struct DieselIncidentRepository {
    pool: DbPool,
}

impl DieselIncidentRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> IncidentRepositoryError {
    match error {
        PoolError::Checkout { message }
        | PoolError::Build { message }
        | PoolError::Migration { message } => IncidentRepositoryError::connection(message),
    }
}

/// Map Diesel errors to incident repository errors.
///
/// Database errors carry SQLite's message (for example "database is locked")
/// but never the SQL text.
fn map_diesel_error(error: DieselError) -> IncidentRepositoryError {
    use diesel::result::DatabaseErrorKind;

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => IncidentRepositoryError::query("record not found"),
        DieselError::QueryBuilderError(_) => IncidentRepositoryError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            IncidentRepositoryError::connection("database connection error")
        }
        DieselError::DatabaseError(_, info) => IncidentRepositoryError::query(info.message()),
        _ => IncidentRepositoryError::query("database error"),
    }
}

fn to_utc(value: NaiveDateTime) -> DateTime<Utc> {
    Utc.from_utc_datetime(&value)
}

/// Convert a database row to a domain incident.
fn row_to_incident(row: IncidentRow) -> Result<Incident, IncidentRepositoryError> {
    let device_id = u64::try_from(row.incident_device_id)
        .ok()
        .and_then(|raw| DeviceId::new(raw).ok())
        .ok_or_else(|| {
            IncidentRepositoryError::query(format!(
                "row {} has invalid device id {}",
                row.id, row.incident_device_id
            ))
        })?;
    let incident_type = IncidentType::from_label(&row.incident_type).ok_or_else(|| {
        IncidentRepositoryError::query(format!(
            "row {} has unknown incident type '{}'",
            row.id, row.incident_type
        ))
    })?;

    Ok(Incident {
        id: row.id,
        device_id,
        incident_type,
        date: row.incident_date,
        time: row.incident_time,
        details: row.incident_details,
        metadata: RecordMetadata {
            created_at: to_utc(row.created_at),
            updated_at: to_utc(row.updated_at),
            deleted_at: row.deleted_at.map(to_utc),
        },
    })
}

#[async_trait]
impl IncidentRepository for DieselIncidentRepository {
    async fn upsert_open(
        &self,
        incident: &NewIncident,
        at: DateTime<Utc>,
    ) -> Result<UpsertOutcome, IncidentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let stamp = at.naive_utc();
        let device_id = incident.device_id.as_i64();
        let incident_type = incident.incident_type.as_str();
        let new_row = NewIncidentRow {
            created_at: stamp,
            updated_at: stamp,
            incident_device_id: device_id,
            incident_type,
            incident_date: &incident.date,
            incident_time: &incident.time,
            incident_details: &incident.details,
        };
        let update = IncidentTypeUpdate {
            incident_type,
            updated_at: stamp,
        };

        conn.immediate_transaction(|conn| {
            async move {
                let live: Option<i64> = incidents::table
                    .filter(incidents::incident_device_id.eq(device_id))
                    .filter(incidents::deleted_at.is_null())
                    .select(incidents::id)
                    .first(conn)
                    .await
                    .optional()?;

                match live {
                    Some(id) => {
                        diesel::update(incidents::table.find(id))
                            .set(&update)
                            .execute(conn)
                            .await?;
                        Ok::<_, DieselError>(UpsertOutcome::Updated)
                    }
                    None => {
                        diesel::insert_into(incidents::table)
                            .values(&new_row)
                            .execute(conn)
                            .await?;
                        Ok::<_, DieselError>(UpsertOutcome::Inserted)
                    }
                }
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn close(
        &self,
        device_id: DeviceId,
        at: DateTime<Utc>,
    ) -> Result<bool, IncidentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let stamp = at.naive_utc();
        let changes = IncidentClose {
            deleted_at: Some(stamp),
            updated_at: stamp,
        };
        let affected = diesel::update(
            incidents::table
                .filter(incidents::incident_device_id.eq(device_id.as_i64()))
                .filter(incidents::deleted_at.is_null()),
        )
        .set(&changes)
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(affected > 0)
    }

    async fn list_open(&self) -> Result<Vec<Incident>, IncidentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<IncidentRow> = incidents::table
            .filter(incidents::deleted_at.is_null())
            .order_by(incidents::id)
            .select(IncidentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_incident).collect()
    }
}

#[async_trait]
impl StoreHealth for DieselIncidentRepository {
    async fn check(&self) -> Result<(), IncidentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        incidents::table
            .select(incidents::id)
            .limit(1)
            .load::<i64>(&mut conn)
            .await
            .map(drop)
            .map_err(map_diesel_error)
    }
}
