//! Main Entrypoint for the Synthetic Patients API Service
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Loading the persona and scenario catalogs.
//! 3. Constructing the Axum router and applying middleware.
//! 4. Starting the session sweeper, the web server and graceful shutdown.

use anyhow::Context;
use std::{net::SocketAddr, sync::Arc};
use synthetic_patients_api::{
    config::Config,
    router::create_router,
    state::{AppState, spawn_session_sweeper},
};
use synthetic_patients_core::{PersonaStore, ScenarioCatalog};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

/// Listens for the `Ctrl+C` signal to gracefully shut down the server.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal. Shutting down gracefully...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();
    info!("Configuration loaded. Loading catalogs...");

    // --- 3. Load Catalogs ---
    let scenarios = ScenarioCatalog::builtin();
    let personas = match &config.personas_path {
        Some(path) => PersonaStore::from_json_file(path, &scenarios)
            .with_context(|| format!("Failed to load personas from {}", path.display()))?,
        None => PersonaStore::builtin(),
    };
    info!(
        personas = personas.len(),
        scenarios = scenarios.len(),
        "Catalogs ready."
    );
    if !config.static_dir.is_dir() {
        warn!(
            static_dir = %config.static_dir.display(),
            "Static directory does not exist; only the API will be served."
        );
    }

    let app_state = Arc::new(AppState::new(config.clone(), personas, scenarios));
    spawn_session_sweeper(app_state.clone());

    // --- 4. Create Router and Apply Middleware ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(app_state).layer(cors);

    // --- 5. Start Server ---
    info!(
        environment = %config.environment,
        static_dir = %config.static_dir.display(),
        thinking_delay_ms = config.thinking_delay.as_millis() as u64,
        session_idle_ttl_secs = config.session_idle_ttl.as_secs(),
        ended_session_ttl_secs = config.ended_session_ttl.as_secs(),
        bind_address = %config.bind_address,
        "Service configured. Starting server..."
    );
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server has shut down.");
    Ok(())
}
