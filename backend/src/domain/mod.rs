//! Domain primitives, the reconciliation rule, and the incident service.
//!
//! Purpose: keep incident semantics independent of HTTP and SQLite. Inbound
//! adapters call the driving ports in [`ports`]; outbound adapters implement
//! [`ports::IncidentRepository`].
//!
//! Public surface:
//! - `Error` / `ErrorCode`: transport-agnostic failure payload.
//! - `DeviceId`, `IncidentType`, `EventType`, `IncidentEvent`, `Incident`:
//!   incident vocabulary.
//! - `reconcile` / `Reconciliation`: the open-or-close decision.
//! - `IncidentService`: applies decisions to a repository.
//! - `TraceId`: request correlation identifier.

pub mod error;
pub mod incident;
mod incident_service;
pub mod ports;
mod reconciler;
pub mod trace_id;

pub use self::error::{Error, ErrorCode};
pub use self::incident::{
    DeviceId, EventType, Incident, IncidentEvent, IncidentType, IncidentValidationError,
    NewIncident, OK_LABEL, RecordMetadata,
};
pub use self::incident_service::IncidentService;
pub use self::reconciler::{Reconciliation, reconcile};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
