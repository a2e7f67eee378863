//! Request middleware.
//!
//! Purpose: Define middleware components for request lifecycle concerns such as
//! tracing and authentication.

pub mod api_token;
pub mod trace;

pub use api_token::RequireApiToken;
pub use trace::Trace;
