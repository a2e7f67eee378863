//! Incident board entry-point: loads `.env`, reads settings, migrates the
//! database, and serves the webhook and status page.

mod server;

use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use incident_board::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use incident_board::settings::{load_env_file, settings_from_env};
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let env_file = load_env_file().map_err(std::io::Error::other)?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    match env_file {
        Some(path) => info!(path = %path.display(), "loaded environment file"),
        None => info!("no .env file found; using the process environment"),
    }
    let settings = settings_from_env(&DefaultEnv::new()).map_err(std::io::Error::other)?;

    run_migrations(&settings.database_url)
        .await
        .map_err(std::io::Error::other)?;
    let db_pool = DbPool::new(PoolConfig::new(settings.database_url.clone()))
        .await
        .map_err(std::io::Error::other)?;

    let bind_addr = settings.bind_addr;
    let config = ServerConfig::new(bind_addr, settings.api_token, settings.page_title, db_pool);
    let server = create_server(config)?;

    info!(%bind_addr, "server started");
    server.await
}
