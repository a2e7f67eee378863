//! Embedded schema migrations applied at startup.

use diesel::Connection;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use super::pool::PoolError;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Apply pending migrations to the SQLite database at `database_url`.
///
/// Migrations run on a dedicated blocking connection before the pool is
/// built, so the pool never hands out a connection to an unmigrated schema.
///
/// # Errors
///
/// Returns `PoolError::Migration` when the database cannot be opened or a
/// migration fails.
pub async fn run_migrations(database_url: &str) -> Result<(), PoolError> {
    let url = database_url.to_owned();
    tokio::task::spawn_blocking(move || {
        let mut conn = SqliteConnection::establish(&url)
            .map_err(|err| PoolError::migration(err.to_string()))?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| PoolError::migration(err.to_string()))?;
        info!(count = applied.len(), database = %url, "database migrations applied");
        Ok::<(), PoolError>(())
    })
    .await
    .map_err(|err| PoolError::migration(err.to_string()))?
}
