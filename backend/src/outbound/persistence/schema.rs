//! Diesel table definitions for the SQLite schema.
//!
//! These definitions must match `migrations/` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Incident records, one live row per device.
    ///
    /// Closed incidents keep their row with `deleted_at` set. A partial
    /// unique index enforces a single live row per `incident_device_id`.
    incidents (id) {
        id -> BigInt,
        created_at -> Timestamp,
        updated_at -> Timestamp,
        /// Null while the incident is open.
        deleted_at -> Nullable<Timestamp>,
        /// Probe identifier reported by the monitoring system.
        incident_device_id -> BigInt,
        incident_type -> Text,
        /// Event date as reported; not normalised.
        incident_date -> Text,
        /// Event time as reported; not normalised.
        incident_time -> Text,
        incident_details -> Text,
    }
}
