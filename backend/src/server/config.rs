//! HTTP server configuration object.

use std::net::SocketAddr;

use incident_board::outbound::persistence::DbPool;

/// Everything `create_server` needs once settings are validated and the
/// database is migrated.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) api_token: String,
    pub(crate) page_title: String,
    pub(crate) db_pool: DbPool,
}

impl ServerConfig {
    /// Construct a server configuration.
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        api_token: String,
        page_title: String,
        db_pool: DbPool,
    ) -> Self {
        Self {
            bind_addr,
            api_token,
            page_title,
            db_pool,
        }
    }
}
