//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServerHandle, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::{error, info};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use fitpass::RequestTrace;
#[cfg(debug_assertions)]
use fitpass::doc::ApiDoc;
use fitpass::domain::{ProfileRegistrationService, UserRegistrationService};
use fitpass::inbound::http::health::{HealthState, live, ready};
use fitpass::inbound::http::json_config;
use fitpass::inbound::http::profiles::create_profile;
use fitpass::inbound::http::state::HttpState;
use fitpass::inbound::http::users::create_user;
use fitpass::outbound::persistence::{DbPool, DieselProfileRepository, DieselUserRepository};

fn build_http_state(pool: &DbPool) -> web::Data<HttpState> {
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let profiles = Arc::new(DieselProfileRepository::new(pool.clone()));
    web::Data::new(HttpState::new(
        Arc::new(UserRegistrationService::new(users)),
        Arc::new(ProfileRegistrationService::new(profiles)),
    ))
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(json_config())
        .wrap(RequestTrace)
        .service(create_user)
        .service(create_profile)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server bound to the configured address.
///
/// Readiness is flipped once the listener is bound. Actix's own signal
/// handling is disabled; pair this with [`spawn_shutdown_watcher`].
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig { bind_addr, db_pool } = config;
    let http_state = build_http_state(&db_pool);
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || build_app(server_health_state.clone(), http_state.clone()))
        .disable_signals()
        .bind(bind_addr)?
        .run();

    info!(%bind_addr, "server listening");
    health_state.mark_ready();
    Ok(server)
}

/// Resolve once the process receives SIGINT or, on Unix, SIGTERM.
async fn shutdown_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result,
            _ = terminate.recv() => Ok(()),
        }
    }
    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await
    }
}

/// Fail liveness, then stop the server once in-flight requests finish.
async fn drain(health_state: &HealthState, handle: ServerHandle) {
    info!("shutdown requested, draining");
    health_state.mark_unhealthy();
    handle.stop(true).await;
}

/// Drain the server when a shutdown signal arrives.
pub fn spawn_shutdown_watcher(health_state: web::Data<HealthState>, handle: ServerHandle) {
    actix_web::rt::spawn(async move {
        match shutdown_signal().await {
            Ok(()) => drain(&health_state, handle).await,
            Err(e) => error!(error = %e, "failed to listen for shutdown signals"),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::HttpResponse;

    #[actix_web::test]
    async fn drain_fails_liveness_and_stops_server() {
        let health_state = web::Data::new(HealthState::new());
        let server = HttpServer::new(|| {
            App::new().route("/", web::get().to(|| async { HttpResponse::Ok().finish() }))
        })
        .workers(1)
        .disable_signals()
        .bind(("127.0.0.1", 0))
        .expect("bind ephemeral port")
        .run();
        let handle = server.handle();
        let running = actix_web::rt::spawn(server);

        drain(&health_state, handle).await;

        assert!(!health_state.is_alive());
        running
            .await
            .expect("server task joins")
            .expect("server exits cleanly");
    }
}
