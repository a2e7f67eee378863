//! Driven port reporting whether the incident store can serve requests.

use async_trait::async_trait;

use super::IncidentRepositoryError;

/// Readiness check for the incident store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreHealth: Send + Sync {
    /// Succeed when a connection is available and the schema is in place.
    async fn check(&self) -> Result<(), IncidentRepositoryError>;
}
