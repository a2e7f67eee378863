//! Temporary SQLite databases for integration tests.
//!
//! Each database lives in its own temporary directory, which is removed when
//! the [`TestDatabase`] is dropped.

use incident_board::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use tempfile::TempDir;

/// A migrated SQLite file with a connection pool over it.
pub struct TestDatabase {
    pub pool: DbPool,
    pub url: String,
    _dir: TempDir,
}

/// Create and migrate a fresh database.
pub async fn migrated_database() -> TestDatabase {
    let dir = tempfile::tempdir().expect("temp dir");
    let url = dir
        .path()
        .join("incidents.db")
        .to_string_lossy()
        .into_owned();
    run_migrations(&url).await.expect("migrations apply");
    let pool = DbPool::new(PoolConfig::new(url.clone()).with_max_size(4))
        .await
        .expect("pool builds");
    TestDatabase {
        pool,
        url,
        _dir: dir,
    }
}
