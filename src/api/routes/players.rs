//! Player Routes
//!
//! Test hooks for shaping the simulated population.
//!
//! - GET /api/players - List tracked players
//! - POST /api/players - Add a player (random pool identifier if none given)
//! - DELETE /api/players/:uid - Remove a player
//! - POST /api/reset - Replace the population with a fresh roster now

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::dto::{AddPlayerRequest, AddPlayerResponse, PlayerListResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::meter::CODE_OK;

/// GET /api/players
pub async fn list_players(State(state): State<Arc<AppState>>) -> Json<PlayerListResponse> {
    let mut players = state.simulator.list_players().await;
    players.sort();

    Json(PlayerListResponse {
        code: CODE_OK,
        players,
    })
}

/// POST /api/players
///
/// An empty body picks a random pool identifier. Returns 201 when a record
/// was created and 200 when the player was already tracked (the existing
/// record is left untouched).
pub async fn add_player(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<AddPlayerResponse>)> {
    let req = parse_add_request(&body)?;

    if let Some(uid) = &req.uid {
        if uid.trim().is_empty() {
            return Err(ApiError::Validation("uid cannot be empty".to_string()));
        }
    }

    let (uid, created) = state.simulator.add_player(req.uid.as_deref()).await;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(AddPlayerResponse {
            code: CODE_OK,
            uid,
            created,
        }),
    ))
}

fn parse_add_request(body: &[u8]) -> ApiResult<AddPlayerRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(AddPlayerRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| ApiError::Validation(format!("Invalid request body: {}", e)))
}

/// DELETE /api/players/:uid
pub async fn remove_player(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
) -> ApiResult<StatusCode> {
    if state.simulator.remove_player(&uid).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("Player {} is not tracked", uid)))
    }
}

/// POST /api/reset
pub async fn reset(State(state): State<Arc<AppState>>) -> Json<PlayerListResponse> {
    state.simulator.reset().await;
    list_players(State(state)).await
}
