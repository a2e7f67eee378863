//! Driving port for the status page.

use async_trait::async_trait;

use crate::domain::{Error, Incident};

/// Domain use-case port listing open incidents.
#[async_trait]
pub trait IncidentQuery: Send + Sync {
    /// Every currently open incident.
    async fn open_incidents(&self) -> Result<Vec<Incident>, Error>;
}
