//! API Gateway Library
//!
//! HTTP surface for account registration: decodes sign-up requests, runs the
//! registration pipeline and turns issued tokens into session cookies.

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod session;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use auth_service_lib::{AuthServiceConfig, Registrar};
use common::{ConfigError, DatabaseConfig};
use tracing::info;
use user_service_lib::infra::Database;
use user_service_lib::repository::UserStore;

use crate::config::GatewayConfig;
use crate::routes::create_router;
use crate::session::SessionEstablisher;
use crate::state::AppState;

/// Wire the repository, registration pipeline and session cookies.
pub fn build_state(
    database: Database,
    auth: &AuthServiceConfig,
    config: &GatewayConfig,
) -> Result<AppState, ConfigError> {
    let users = Arc::new(UserStore::new(database.get_connection()));
    let registrar = Registrar::from_config(auth, users)?;

    Ok(AppState::new(
        Arc::new(registrar),
        SessionEstablisher::new(config.cookie_domain.clone()),
        database,
    ))
}

/// Connect, migrate and serve HTTP until the process is stopped.
pub async fn run_server(
    config: GatewayConfig,
    database: DatabaseConfig,
    auth: AuthServiceConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect(&database).await?;
    let state = build_state(db, &auth, &config)?;
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
