//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod incident_command;
mod incident_query;
mod incident_repository;
mod store_health;

pub use incident_command::{IncidentCommand, ReportOutcome};
pub use incident_query::IncidentQuery;
#[cfg(test)]
pub use incident_repository::MockIncidentRepository;
#[cfg(any(test, feature = "test-support"))]
pub use incident_repository::InMemoryIncidentRepository;
pub use incident_repository::{IncidentRepository, IncidentRepositoryError, UpsertOutcome};
#[cfg(test)]
pub use store_health::MockStoreHealth;
pub use store_health::StoreHealth;
