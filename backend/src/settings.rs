//! Process configuration loaded via OrthoConfig.
//!
//! Database settings are required and read from `DB_*` environment
//! variables; the HTTP listener address defaults to `0.0.0.0:8080`.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::persistence::PoolConfig;

const DEFAULT_BIND_PORT: u16 = 8080;

/// `sslmode` values the plaintext connector can honour.
pub const SUPPORTED_SSL_MODES: [&str; 2] = ["disable", "prefer"];

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_BIND_PORT))
}

/// Rejected database configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DatabaseSettingsError {
    /// `DB_SSLMODE` names a mode that needs TLS or is unknown.
    #[error("unsupported DB_SSLMODE {value:?}; expected one of: disable, prefer")]
    UnsupportedSslMode { value: String },
}

/// Connection settings for PostgreSQL (`DB_HOST`, `DB_PORT`, `DB_USER`,
/// `DB_PASS`, `DB_NAME`, `DB_SSLMODE`).
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DB")]
pub struct DatabaseSettings {
    /// Database server host name or address.
    pub host: String,
    /// Database server port.
    pub port: u16,
    /// Role used to log in.
    pub user: String,
    /// Password for `user`.
    pub pass: String,
    /// Database name.
    pub name: String,
    /// libpq `sslmode` value; see [`SUPPORTED_SSL_MODES`].
    pub sslmode: String,
}

impl DatabaseSettings {
    /// Check values the loader cannot type-check.
    ///
    /// Connections are plaintext, so modes that demand TLS would only fail
    /// later, at connect time.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseSettingsError::UnsupportedSslMode`] when `sslmode`
    /// is not in [`SUPPORTED_SSL_MODES`].
    pub fn validate(&self) -> Result<(), DatabaseSettingsError> {
        if SUPPORTED_SSL_MODES.contains(&self.sslmode.as_str()) {
            Ok(())
        } else {
            Err(DatabaseSettingsError::UnsupportedSslMode {
                value: self.sslmode.clone(),
            })
        }
    }

    /// Assemble a libpq key/value connection string.
    ///
    /// # Examples
    /// ```
    /// use fitpass::settings::DatabaseSettings;
    ///
    /// let settings = DatabaseSettings {
    ///     host: "localhost".into(),
    ///     port: 5432,
    ///     user: "fitpass".into(),
    ///     pass: "s3cret".into(),
    ///     name: "fitpass".into(),
    ///     sslmode: "disable".into(),
    /// };
    /// assert_eq!(
    ///     settings.connection_string(),
    ///     "host=localhost port=5432 user=fitpass password=s3cret dbname=fitpass sslmode=disable"
    /// );
    /// ```
    pub fn connection_string(&self) -> String {
        let port = self.port.to_string();
        [
            ("host", self.host.as_str()),
            ("port", port.as_str()),
            ("user", self.user.as_str()),
            ("password", self.pass.as_str()),
            ("dbname", self.name.as_str()),
            ("sslmode", self.sslmode.as_str()),
        ]
        .iter()
        .map(|(key, value)| format!("{key}={}", quote_conninfo_value(value)))
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// Pool configuration pointing at this database.
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::new(self.connection_string())
    }
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("name", &self.name)
            .field("sslmode", &self.sslmode)
            .finish_non_exhaustive()
    }
}

/// Quote a libpq connection value when it is empty or contains whitespace,
/// quotes, or backslashes.
fn quote_conninfo_value(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || c == '\'' || c == '\\');
    if !needs_quotes {
        return value.to_owned();
    }
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

/// HTTP listener settings (`HTTP_BIND_ADDR`).
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "HTTP")]
pub struct HttpSettings {
    /// Socket address to listen on.
    #[ortho_config(default = default_bind_addr())]
    pub bind_addr: SocketAddr,
}
