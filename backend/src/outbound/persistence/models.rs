//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use super::schema::incidents;

/// Row struct for reading from the incidents table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = incidents)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct IncidentRow {
    pub id: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
    pub incident_device_id: i64,
    pub incident_type: String,
    pub incident_date: String,
    pub incident_time: String,
    pub incident_details: String,
}

/// Insertable struct for opening a new incident.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = incidents)]
pub(crate) struct NewIncidentRow<'a> {
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub incident_device_id: i64,
    pub incident_type: &'a str,
    pub incident_date: &'a str,
    pub incident_time: &'a str,
    pub incident_details: &'a str,
}

/// Changeset applied when a live incident receives another non-OK event.
///
/// Only the type is refreshed; date, time and details keep the values of the
/// event that opened the incident.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = incidents)]
pub(crate) struct IncidentTypeUpdate<'a> {
    pub incident_type: &'a str,
    pub updated_at: NaiveDateTime,
}

/// Changeset soft-deleting a live incident.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = incidents)]
pub(crate) struct IncidentClose {
    pub deleted_at: Option<NaiveDateTime>,
    pub updated_at: NaiveDateTime,
}
