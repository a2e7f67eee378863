//! HTTP inbound adapter exposing the webhook, the status page and health probes.

pub mod error;
pub mod health;
pub mod incidents;
pub mod state;
mod status_page;
pub(crate) mod validation;

pub use error::ApiResult;
