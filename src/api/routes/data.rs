//! Meter Data Routes
//!
//! The two endpoints the dashboard polls.
//!
//! - GET /api/data - Current statistics per player
//! - GET /api/clear - Clear statistics; a fresh roster appears after the restart delay

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::state::AppState;
use crate::meter::{ClearResponse, DataResponse};

/// GET /api/data
pub async fn get_data(State(state): State<Arc<AppState>>) -> Json<DataResponse> {
    Json(state.simulator.snapshot().await)
}

/// GET /api/clear
pub async fn clear_data(State(state): State<Arc<AppState>>) -> Json<ClearResponse> {
    Json(state.simulator.clear_and_restart().await)
}
