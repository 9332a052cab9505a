//! Backend entry-point: loads configuration, prepares storage, and serves
//! the account endpoints.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use fitpass::inbound::http::health::HealthState;
use fitpass::startup::{initialise_storage, load_settings};
use server::{ServerConfig, create_server, spawn_shutdown_watcher};

/// Application bootstrap.
///
/// Configuration, connection, and schema failures abort the process before
/// the listener is bound.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = load_settings()?;
    let pool = initialise_storage(&settings.database).await?;

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(settings.http.bind_addr, pool);
    let server =
        create_server(health_state.clone(), config).wrap_err("failed to start HTTP server")?;
    spawn_shutdown_watcher(health_state, server.handle());

    server.await.wrap_err("HTTP server terminated with an error")
}
