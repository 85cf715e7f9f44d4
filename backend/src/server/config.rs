//! HTTP server configuration object and helpers.

use aircraft_backend::outbound::persistence::DbPool;
use std::net::SocketAddr;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) secret: String,
    pub(crate) token_exp_hours: i64,
    pub(crate) cookie_secure: bool,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a configuration with no database attached.
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        secret: impl Into<String>,
        token_exp_hours: i64,
        cookie_secure: bool,
    ) -> Self {
        Self {
            bind_addr,
            secret: secret.into(),
            token_exp_hours,
            cookie_secure,
            db_pool: None,
        }
    }

    /// Attach a database connection pool for the Diesel repositories.
    ///
    /// Without one every store-backed port answers `service_unavailable`.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[cfg_attr(
        not(test),
        expect(dead_code, reason = "Read by the server bootstrap tests")
    )]
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
