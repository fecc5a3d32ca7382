//! Mock Meter Backend
//!
//! HTTP API serving the simulated combat feed over the same wire contract
//! as the real meter backend, built with Axum.
//!
//! # Endpoints
//!
//! ## Meter
//! - `GET /api/data` - Current statistics per player
//! - `GET /api/clear` - Clear statistics
//!
//! ## Players
//! - `GET /api/players` - List tracked players
//! - `POST /api/players` - Add a player
//! - `DELETE /api/players/:uid` - Remove a player
//! - `POST /api/reset` - Fresh roster, immediately
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use meterboard::api::{serve, ApiConfig, AppState};
//! use meterboard::simulator::{Simulator, SimulatorConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let simulator = Arc::new(Simulator::new(SimulatorConfig::default()));
//!     simulator.start().await;
//!
//!     let config = ApiConfig::default();
//!     serve(AppState::new(simulator), &config).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::{ApiConfig, AppState};

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Meter routes
        .route("/data", get(routes::data::get_data))
        .route("/clear", get(routes::data::clear_data))
        // Player routes
        .route(
            "/players",
            get(routes::players::list_players).post(routes::players::add_player),
        )
        .route("/players/:uid", delete(routes::players::remove_player))
        .route("/reset", post(routes::players::reset));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/", get(routes::health::full_health));

    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        // The dashboard is served from another origin during development
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Meter API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Meter API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
