//! Incident board library modules.
//!
//! A webhook receiver for monitoring probes: events open, refresh or close
//! at most one incident per device, and a status page lists what is open.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

pub use domain::TraceId;
pub use middleware::Trace;
