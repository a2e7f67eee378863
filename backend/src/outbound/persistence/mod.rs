//! SQLite persistence adapters using Diesel ORM.
//!
//! This module provides the concrete implementation of the domain's
//! incident repository port, backed by SQLite via Diesel with async support
//! through `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: the repository only translates between Diesel rows
//!   and domain types. The reconciliation rule lives in the domain.
//! - **Internal models**: row structs (`models.rs`) and the schema
//!   (`schema.rs`) never leave this module.
//! - **Migrations first**: [`run_migrations`] applies the embedded schema
//!   before [`DbPool`] is built.
//!
//! # Example
//!
//! ```ignore
//! use incident_board::outbound::persistence::{
//!     run_migrations, DbPool, DieselIncidentRepository, PoolConfig,
//! };
//!
//! run_migrations("incidents.db").await?;
//! let pool = DbPool::new(PoolConfig::new("incidents.db")).await?;
//! let repo = DieselIncidentRepository::new(pool);
//! ```

mod diesel_incident_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_incident_repository::DieselIncidentRepository;
pub use migrations::run_migrations;
pub use pool::{DbPool, PoolConfig, PoolError, SqliteAsyncConnection};
