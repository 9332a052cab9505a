//! Shared PostgreSQL handle: a `bb8` pool of `diesel-async` connections.
//!
//! The pool is opened once during startup through [`DbPool::connect`], which
//! refuses to return until the server has answered `SELECT 1`. Adapters hold
//! clones and check out one connection per operation.

use std::time::Duration;

use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use diesel_async::{AsyncPgConnection, RunQueryDsl};

const DEFAULT_MAX_SIZE: u32 = 10;
const CHECKOUT_TIMEOUT: Duration = Duration::from_secs(30);

/// Failures while opening the pool or checking out a connection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// bb8 rejected the manager or could not open its first connections.
    #[error("failed to build connection pool: {message}")]
    Build { message: String },

    /// No connection became available within the checkout timeout.
    #[error("failed to get connection from pool: {message}")]
    Checkout { message: String },

    /// The server did not answer the liveness query.
    #[error("database liveness check failed: {message}")]
    Ping { message: String },
}

impl PoolError {
    /// Build failure carrying the driver message.
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }

    /// Checkout failure carrying the bb8 message.
    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }

    /// Liveness failure carrying the driver message.
    pub fn ping(message: impl Into<String>) -> Self {
        Self::Ping {
            message: message.into(),
        }
    }
}

/// Where to connect and how many connections to keep.
///
/// `conninfo` is a libpq key/value string or a `postgres://` URL. It carries
/// the password, so `Debug` leaves it out.
#[derive(Clone)]
pub struct PoolConfig {
    conninfo: String,
    max_size: u32,
}

impl PoolConfig {
    /// Configuration with up to ten pooled connections.
    pub fn new(conninfo: impl Into<String>) -> Self {
        Self {
            conninfo: conninfo.into(),
            max_size: DEFAULT_MAX_SIZE,
        }
    }

    /// Cap the number of open connections.
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }
}

impl std::fmt::Debug for PoolConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolConfig")
            .field("max_size", &self.max_size)
            .finish_non_exhaustive()
    }
}

/// Cloneable handle to the process-wide connection pool.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Open the pool and verify the database answers a trivial query.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Build`] when the pool cannot be built,
    /// [`PoolError::Checkout`] when no connection can be obtained, and
    /// [`PoolError::Ping`] when the liveness query fails.
    pub async fn connect(config: PoolConfig) -> Result<Self, PoolError> {
        let PoolConfig { conninfo, max_size } = config;
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(conninfo);
        let inner = Pool::builder()
            .max_size(max_size)
            .connection_timeout(CHECKOUT_TIMEOUT)
            .build(manager)
            .await
            .map_err(|err| PoolError::build(err.to_string()))?;

        let pool = Self { inner };
        pool.ping().await?;
        Ok(pool)
    }

    async fn ping(&self) -> Result<(), PoolError> {
        let mut conn = self.get().await?;
        diesel::sql_query("SELECT 1")
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| PoolError::ping(err.to_string()))
    }

    /// Check out a connection.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Checkout`] when none frees up within 30 seconds.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::checkout(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn new_config_keeps_ten_connections() {
        let config = PoolConfig::new("postgres://localhost/fitpass");

        assert_eq!(config.conninfo, "postgres://localhost/fitpass");
        assert_eq!(config.max_size, DEFAULT_MAX_SIZE);
        assert_eq!(config.with_max_size(2).max_size, 2);
    }

    #[rstest]
    fn debug_output_omits_conninfo() {
        let config = PoolConfig::new("host=db password=hunter2");
        let rendered = format!("{config:?}");

        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("max_size"));
    }

    #[rstest]
    #[case(PoolError::build("invalid connection string"), "failed to build connection pool")]
    #[case(PoolError::checkout("timed out"), "failed to get connection from pool")]
    #[case(PoolError::ping("server closed the connection"), "database liveness check failed")]
    fn errors_keep_driver_message(#[case] error: PoolError, #[case] prefix: &str) {
        let rendered = error.to_string();

        assert!(rendered.starts_with(prefix), "{rendered}");
    }
}
