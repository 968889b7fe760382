use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;

use crate::api::models::{PlayerListItem, SetRatingPayload};

use super::{ApiError, AppState};

/// Direct rating override; the change lands in the player's history like
/// any other rating movement.
pub async fn set_rating(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<i64>,
    Json(payload): Json<SetRatingPayload>,
) -> Result<Json<PlayerListItem>, ApiError> {
    let player = state.service.set_player_rating(player_id, payload.rating)?;

    Ok(Json(PlayerListItem {
        rank: 0,
        player_id: player.id,
        username: player.username,
        display_name: player.display_name,
        rating: player.rating,
        is_admin: player.is_admin,
    }))
}

pub async fn delete_player(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.service.delete_player(player_id)?;
    Ok(StatusCode::NO_CONTENT)
}
