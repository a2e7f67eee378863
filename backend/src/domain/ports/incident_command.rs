//! Driving port for reporting probe events.

use async_trait::async_trait;

use crate::domain::{Error, IncidentEvent};

/// Result of applying a probe event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    /// A new incident was opened for the device.
    Opened,
    /// The device's open incident had its type refreshed.
    Updated,
    /// The event closed the device's incident; `existed` is false when there
    /// was nothing to close or the store failed to close it.
    Closed { existed: bool },
}

/// Domain use-case port for the webhook endpoint.
#[async_trait]
pub trait IncidentCommand: Send + Sync {
    /// Reconcile `event` against the incident store.
    async fn report(&self, event: IncidentEvent) -> Result<ReportOutcome, Error>;
}
