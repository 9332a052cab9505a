//! Startup phase: configuration, database connection, and schema.
//!
//! Every failure here is fatal for the process. The functions return
//! [`StartupError`] so the binary decides how to report and exit, and tests
//! can exercise the phase without terminating.

use std::ffi::OsString;

use ortho_config::OrthoConfig;
use thiserror::Error;
use tracing::{debug, info};

use crate::outbound::persistence::{DbPool, PoolError, SchemaError, ensure_schema};
use crate::settings::{DatabaseSettings, HttpSettings};

/// Errors that abort startup before the server accepts traffic.
#[derive(Debug, Error)]
pub enum StartupError {
    /// Required configuration was missing or malformed.
    #[error("invalid configuration: {message}")]
    Settings {
        /// Loader diagnostics.
        message: String,
    },
    /// The database could not be reached or failed its liveness check.
    #[error("database connection failed: {0}")]
    Connect(#[from] PoolError),
    /// The schema could not be created.
    #[error("database schema setup failed: {0}")]
    Schema(#[from] SchemaError),
}

/// Configuration needed to start the service.
#[derive(Debug, Clone)]
pub struct AppSettings {
    /// PostgreSQL connection settings.
    pub database: DatabaseSettings,
    /// HTTP listener settings.
    pub http: HttpSettings,
}

/// Load `.env` when present, then read settings from the environment.
///
/// # Errors
///
/// Returns [`StartupError::Settings`] when a required `DB_*` variable is
/// missing, any value fails to parse, or `DB_SSLMODE` is unsupported.
pub fn load_settings() -> Result<AppSettings, StartupError> {
    match dotenvy::dotenv() {
        Ok(path) => debug!(path = %path.display(), "loaded environment file"),
        Err(error) if error.not_found() => debug!("no .env file found"),
        Err(error) => {
            return Err(StartupError::Settings {
                message: format!("failed to read .env: {error}"),
            });
        }
    }

    // Settings come from the environment only; command-line flags are not part
    // of the service's interface.
    let args = || [OsString::from(env!("CARGO_PKG_NAME"))];
    let database = DatabaseSettings::load_from_iter(args()).map_err(|error| {
        StartupError::Settings {
            message: format!("database settings: {error}"),
        }
    })?;
    database.validate().map_err(|error| StartupError::Settings {
        message: error.to_string(),
    })?;
    let http = HttpSettings::load_from_iter(args()).map_err(|error| StartupError::Settings {
        message: format!("http settings: {error}"),
    })?;

    Ok(AppSettings { database, http })
}

/// Open the shared database handle and make sure the schema exists.
///
/// # Errors
///
/// Returns [`StartupError::Connect`] when the pool cannot be built or the
/// liveness query fails, and [`StartupError::Schema`] when DDL fails.
pub async fn initialise_storage(settings: &DatabaseSettings) -> Result<DbPool, StartupError> {
    let pool = DbPool::connect(settings.pool_config()).await?;
    info!(host = %settings.host, database = %settings.name, "database connected successfully");

    ensure_schema(&pool).await?;
    Ok(pool)
}
