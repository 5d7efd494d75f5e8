//! Cardfolio catalog server.
//!
//! This binary serves the trading-card catalog REST API on port 8080.
//!
//! # Architecture
//!
//! - Axum web framework with JSON request/response bodies
//! - MongoDB document store (`pokemon_db`) holding the `pokemon_cards` and
//!   `card_owners` collections
//! - Startup schema provisioning (collections and indexes) in a background
//!   task, so a slow or missing store never blocks boot
//! - Startup index report logged for operational verification

#![cfg_attr(not(test), forbid(unsafe_code))]

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Json, Router, routing::get};
use mongodb::bson::doc;
use tower_http::trace::TraceLayer;

mod config;
mod db;
mod error;
mod models;
mod routes;
mod seed;
mod services;
mod state;

use chrono::Utc;
use config::ServerConfig;
use state::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load configuration from environment
    let config = ServerConfig::from_env().expect("Failed to load configuration");

    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cardfolio_server=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Connect to the document store
    let database = db::connect(&config.mongodb_url, &config.database)
        .await
        .expect("Failed to create MongoDB client");
    tracing::info!(database = %config.database, "MongoDB client created");

    // Build application state
    let state = AppState::new(config, database);

    spawn_startup_tasks(&state);

    let addr = state.config().socket_addr();

    // Build router
    let app = Router::new()
        .route("/health", get(health))
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .merge(routes::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    tracing::info!("cardfolio listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Spawn the configured startup tasks (provision, verify, seed) as
/// fire-and-forget background work.
///
/// Returns immediately. Readiness is pure process liveness: none of these
/// tasks is awaited, so an unreachable store delays nothing and each task
/// logs its own outcome.
fn spawn_startup_tasks(state: &AppState) {
    // Provision collections and indexes in the background so startup is not
    // gated on the store being reachable.
    if state.config().init_db {
        let provision_db = state.database().clone();
        tokio::spawn(async move {
            match db::schema::provision_schema(&provision_db).await {
                Ok(()) => tracing::info!("schema provisioning complete"),
                Err(err) => tracing::error!(error = %err, "schema provisioning failed"),
            }
        });
    }

    if state.config().verify_indexes {
        let inspector = state.inspector().clone();
        tokio::spawn(async move {
            inspector.log_report().await;
        });
    }

    if state.config().seed_data {
        let seed_state = state.clone();
        tokio::spawn(async move {
            seed::run(&seed_state).await;
        });
    }
}

/// Service health summary. Does not check dependencies.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "UP",
        "service": "cardfolio-server",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now(),
    }))
}

/// Liveness probe. Returns OK if the process is running.
async fn liveness() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ALIVE" }))
}

/// Readiness probe. Verifies store connectivity before returning OK.
///
/// Returns 503 Service Unavailable if the store is not reachable.
async fn readiness(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    match state.database().run_command(doc! { "ping": 1 }).await {
        Ok(_) => Ok(Json(serde_json::json!({ "status": "READY" }))),
        Err(err) => {
            tracing::warn!(error = %err, "readiness check failed");
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use std::time::Duration;

    #[tokio::test]
    async fn test_startup_tasks_do_not_block_boot() {
        // Unreachable store: the driver blocks on server selection for any
        // actual operation, so inline-awaiting any startup task here would
        // trip the timeout.
        let config = ServerConfig {
            mongodb_url: SecretString::from("mongodb://127.0.0.1:1"),
            database: "pokemon_db".to_string(),
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            init_db: true,
            verify_indexes: true,
            seed_data: true,
        };
        let database = db::connect(&config.mongodb_url, &config.database)
            .await
            .unwrap();
        let state = AppState::new(config, database);

        tokio::time::timeout(Duration::from_secs(1), async {
            spawn_startup_tasks(&state);
            tokio::task::yield_now().await;
        })
        .await
        .expect("startup tasks must not block boot");
    }
}
